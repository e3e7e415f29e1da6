//! Field constraint checks
//!
//! Small validation helpers used by the entity models. Each helper pushes a
//! `ValidationIssue` with the field's dotted path on failure so a single
//! parse collects every problem in the payload, mirroring the strict-schema
//! contract of the write endpoints.

use crate::errors::ValidationIssue;
use validator::ValidateEmail;

/// Join a path prefix and a field name into a dotted path.
pub fn field_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// Require a non-empty string (values are trimmed at deserialization time).
pub fn require_non_empty(
    issues: &mut Vec<ValidationIssue>,
    path: String,
    value: &str,
    message: &str,
) {
    if value.is_empty() {
        issues.push(ValidationIssue::new(path, message));
    }
}

/// Reject strings longer than `max` characters.
pub fn check_max_len(issues: &mut Vec<ValidationIssue>, path: String, value: &str, max: usize) {
    if value.chars().count() > max {
        issues.push(ValidationIssue::new(
            path,
            format!("must be at most {max} characters"),
        ));
    }
}

/// Reject negative or non-finite numbers.
pub fn check_non_negative(issues: &mut Vec<ValidationIssue>, path: String, value: f64) {
    if !value.is_finite() || value < 0.0 {
        issues.push(ValidationIssue::new(path, "must be a non-negative number"));
    }
}

/// Require a number of at least `min`, with a caller-supplied message.
pub fn check_at_least(
    issues: &mut Vec<ValidationIssue>,
    path: String,
    value: f64,
    min: f64,
    message: &str,
) {
    if !value.is_finite() || value < min {
        issues.push(ValidationIssue::new(path, message));
    }
}

/// Validate email format.
pub fn check_email(issues: &mut Vec<ValidationIssue>, path: String, value: &str) {
    if !value.validate_email() {
        issues.push(ValidationIssue::new(path, "Email must be a valid email"));
    }
}

/// Validate a phone-like field: digits, `+`, `-`, parentheses and spaces,
/// 7 to 20 characters.
pub fn check_phone(issues: &mut Vec<ValidationIssue>, path: String, value: &str, message: &str) {
    let pattern = regex_lite::Regex::new(r"^[\d+\-() ]{7,20}$").unwrap();
    if !pattern.is_match(value) {
        issues.push(ValidationIssue::new(path, message));
    }
}
