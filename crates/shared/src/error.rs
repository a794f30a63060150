use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Category;

pub const VALIDATION_ERRORS_PREFIX: &str = "Please fix the following issues: ";
pub const GENERIC_REJECTION_MESSAGE: &str = "Failed to generate meditation";

/// Error payload the backend may attach to a non-2xx response. Every field
/// is optional; a body that does not parse at all is tolerated by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorBody {
    /// Picks the text to show: `validation_errors`, then `error`, then
    /// `message`, then a generic fallback. Empty values count as absent.
    pub fn user_message(&self) -> String {
        if let Some(errors) = self.validation_errors.as_ref().filter(|e| !e.is_empty()) {
            return format!("{VALIDATION_ERRORS_PREFIX}{}", errors.join(" "));
        }
        non_empty(&self.error)
            .or_else(|| non_empty(&self.message))
            .unwrap_or(GENERIC_REJECTION_MESSAGE)
            .to_string()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Derives the user-facing message for a rejected request from its raw body.
pub fn rejection_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => parsed.user_message(),
        Err(_) => GENERIC_REJECTION_MESSAGE.to_string(),
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("unknown {kind} '{label}'; expected one of: {allowed}", kind = .category.noun())]
    UnknownLabel {
        category: Category,
        label: String,
        allowed: String,
    },
    #[error("Please select at least one emotion, goal, and outcome.")]
    Incomplete { missing: Vec<Category> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_take_precedence() {
        let body = br#"{"error":"bad","message":"worse","validation_errors":["pick at least one goal"]}"#;
        assert_eq!(
            rejection_message(body),
            "Please fix the following issues: pick at least one goal"
        );
    }

    #[test]
    fn joins_multiple_validation_errors_with_a_space() {
        let body = ErrorBody {
            validation_errors: Some(vec![
                "Please provide at least one goal.".to_string(),
                "Please provide at least one desired outcome.".to_string(),
            ]),
            ..ErrorBody::default()
        };
        assert_eq!(
            body.user_message(),
            "Please fix the following issues: Please provide at least one goal. Please provide at least one desired outcome."
        );
    }

    #[test]
    fn error_field_beats_message_field() {
        let body = br#"{"error":"An unexpected error occurred.","message":"Our servers encountered an issue."}"#;
        assert_eq!(rejection_message(body), "An unexpected error occurred.");
    }

    #[test]
    fn falls_back_to_message_then_generic() {
        assert_eq!(rejection_message(br#"{"message":"service down"}"#), "service down");
        assert_eq!(rejection_message(br#"{"error":""}"#), GENERIC_REJECTION_MESSAGE);
        assert_eq!(rejection_message(br#"{"validation_errors":[]}"#), GENERIC_REJECTION_MESSAGE);
    }

    #[test]
    fn tolerates_unparsable_bodies() {
        assert_eq!(rejection_message(b"<html>502 Bad Gateway</html>"), GENERIC_REJECTION_MESSAGE);
        assert_eq!(rejection_message(b""), GENERIC_REJECTION_MESSAGE);
    }
}
