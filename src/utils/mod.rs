// src/utils/mod.rs

pub mod id;
pub mod json;
pub mod time;
