//! Domain error types
//!
//! These errors are transport-agnostic and represent failures of the
//! records-editor collaborators.

use std::fmt;

/// Error code the backend returns when a fixed-length control field has the wrong size
pub const ILLEGAL_FIXED_LENGTH_CONTROL_FIELD: &str = "ILLEGAL_FIXED_LENGTH_CONTROL_FIELD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Resource not found
    NotFound,
    /// Local validation error with message
    Validation(String),
    /// The backend refused a save; `code` comes from the error body when present
    Rejected { status: u16, code: Option<String> },
    /// Transport or decoding failure talking to the backend
    External(String),
    /// Generic internal error
    Internal(String),
}

impl DomainError {
    /// True when the backend flagged a control field with an illegal length
    pub fn is_illegal_fixed_length(&self) -> bool {
        matches!(
            self,
            DomainError::Rejected { code: Some(code), .. } if code == ILLEGAL_FIXED_LENGTH_CONTROL_FIELD
        )
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Rejected { status, code } => match code {
                Some(code) => write!(f, "Rejected by backend ({}): {}", status, code),
                None => write!(f, "Rejected by backend ({})", status),
            },
            DomainError::External(msg) => write!(f, "External service error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        DomainError::External(e.to_string())
    }
}

impl From<url::ParseError> for DomainError {
    fn from(e: url::ParseError) -> Self {
        DomainError::Internal(format!("invalid URL: {}", e))
    }
}
