//! Gym Manager Shared Library
//!
//! This crate contains the entity models, strict schema validation, and
//! wire types shared by the backend and its tests.

pub mod dates;
pub mod errors;
pub mod models;
pub mod schema;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::{ValidationIssue, ValidationIssues};
pub use schema::{parse_strict, StrictModel};
pub use types::Document;
