// src/status/mod.rs
//
// Diagnostic ping records. Created and listed only; never updated or deleted.

pub mod models;
pub mod service;

pub use models::{StatusCheck, StatusCheckCreate};
pub use service::StatusCheckRepository;
