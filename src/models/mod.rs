// src/models/mod.rs

pub mod answer;
pub mod question;
pub mod quiz;
pub mod submission;
