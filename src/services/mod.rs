// src/services/mod.rs

pub mod attempts;
pub mod catalog;

pub use attempts::AttemptEngine;
pub use catalog::QuizCatalog;

use crate::error::AppError;

/// Maps a storage failure to a 500, keeping the context for the log line
/// written when the error is turned into a response.
fn storage_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::InternalServerError(format!("{}: {:?}", context, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_keeps_context_in_the_variant() {
        let err = storage_error("Failed to lock quiz")(sqlx::Error::RowNotFound);
        match err {
            AppError::InternalServerError(msg) => {
                assert!(msg.starts_with("Failed to lock quiz: "));
                assert!(msg.contains("RowNotFound"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }
}
