// src/handlers/mod.rs

pub mod docs;
pub mod health;
pub mod question;
pub mod quiz;
pub mod submission;
