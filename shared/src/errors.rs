//! Error types shared across the Gym Manager crates

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single validation failure, addressed by dotted field path.
///
/// The `{path, message}` shape is part of the wire contract: validation
/// error responses carry these objects verbatim in their `details` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// The result of a failed strict parse: an ordered list of issues.
///
/// Callers branch on this as a tagged error variant rather than probing
/// error shape; the backend maps it to a 400 `ValidationError` response.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("invalid payload ({} issue(s))", issues.len())]
pub struct ValidationIssues {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationIssues {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// Convenience constructor for a single-issue failure.
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![ValidationIssue::new(path, message)],
        }
    }
}
