//! Error types shared by the simulator and the HTTP client.
//!
//! "Not found" is deliberately absent from this enum: retrieve and update
//! return `Ok(None)` and delete is a silent no-op, so callers compose
//! missing-record handling without error control flow.

use serde_json::Value;
use thiserror::Error;

/// Errors raised by admin operations
#[derive(Debug, Error)]
pub enum KongError {
    /// A create collided with one or more uniqueness-constrained fields.
    /// Carries every offending field together with the value already held
    /// by an existing record.
    #[error("conflict: {}", format_conflict_fields(.fields))]
    Conflict { fields: Vec<(String, Value)> },

    /// A required field combination was missing or a precondition was
    /// violated (e.g. a caller-supplied id, an unknown pagination offset).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The remote admin API answered with an unexpected status code.
    #[error("admin API request failed: {status}")]
    Http { status: u16 },

    /// The request never produced a response (connect/read failure after
    /// retries were exhausted).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be parsed as the expected JSON shape.
    #[error("invalid response body: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

impl KongError {
    /// Build a Conflict from the colliding `field: value` pairs.
    pub fn conflict(fields: Vec<(String, Value)>) -> Self {
        Self::Conflict { fields }
    }

    /// True if this error is a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

fn format_conflict_fields(fields: &[(String, Value)]) -> String {
    if fields.is_empty() {
        return "duplicate record".to_string();
    }
    fields
        .iter()
        .map(|(field, value)| format!("{field}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn conflict_message_enumerates_all_fields() {
        let err = KongError::conflict(vec![
            ("name".to_string(), json!("Mockbin")),
            ("target_url".to_string(), json!("http://mockbin.com/")),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("name=\"Mockbin\""));
        assert!(msg.contains("target_url=\"http://mockbin.com/\""));
    }

    #[test]
    fn is_conflict_distinguishes_from_validation() {
        assert!(KongError::conflict(vec![]).is_conflict());
        assert!(!KongError::Validation("missing username".into()).is_conflict());
    }
}
