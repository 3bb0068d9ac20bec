// src/utils/id.rs

use uuid::Uuid;

use crate::error::AppError;

/// Parses a path identifier in canonical UUID text form.
///
/// `entity` names the kind of id in the error message, e.g. "quiz".
pub fn parse_id(raw: &str, entity: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {} id", entity)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "quiz").unwrap(), id);
    }

    #[test]
    fn rejects_garbage_with_entity_name() {
        match parse_id("not-a-uuid", "attempt") {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "Invalid attempt id"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
