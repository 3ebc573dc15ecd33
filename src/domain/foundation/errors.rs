//! Field-level validation failures and the stable error codes carried in
//! API responses and per-record failures.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// A value that could not become a domain type. Always names the field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' must be one of [{allowed}], got '{actual}'")]
    NotAllowed {
        field: String,
        allowed: String,
        actual: String,
    },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::EmptyField { field: field.into() }
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, actual: f64) -> Self {
        Self::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// `allowed` is rendered comma-separated in the message.
    pub fn not_allowed(field: impl Into<String>, allowed: &[&str], actual: impl Into<String>) -> Self {
        Self::NotAllowed {
            field: field.into(),
            allowed: allowed.join(", "),
            actual: actual.into(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::EmptyField { field }
            | Self::OutOfRange { field, .. }
            | Self::InvalidFormat { field, .. }
            | Self::NotAllowed { field, .. } => field,
        }
    }
}

/// Wire codes. Clients branch on these, so the strings never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationFailed,

    SessionNotFound,
    ProviderUnavailable,
    DraftIncomplete,

    InvalidDocument,
    ReferenceAmbiguous,
    ReferenceNotFound,
    BusinessRuleViolated,
    CommitFailed,
    DeadlineExceeded,
    Cancelled,

    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            Self::DraftIncomplete => "DRAFT_INCOMPLETE",
            Self::InvalidDocument => "INVALID_DOCUMENT",
            Self::ReferenceAmbiguous => "REFERENCE_AMBIGUOUS",
            Self::ReferenceNotFound => "REFERENCE_NOT_FOUND",
            Self::BusinessRuleViolated => "BUSINESS_RULE_VIOLATED",
            Self::CommitFailed => "COMMIT_FAILED",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::Cancelled => "CANCELLED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_prints_bounds_without_trailing_zeroes() {
        let err = ValidationError::out_of_range("capacity", 1.0, 99.0, 150.0);
        assert_eq!(
            err.to_string(),
            "Field 'capacity' must be between 1 and 99, got 150"
        );
    }

    #[test]
    fn not_allowed_lists_choices_and_keeps_field() {
        let err = ValidationError::not_allowed("payment_method", &["CASH", "CARD"], "BITCOIN");
        assert_eq!(
            err.to_string(),
            "Field 'payment_method' must be one of [CASH, CARD], got 'BITCOIN'"
        );
        assert_eq!(err.field(), "payment_method");
    }

    #[test]
    fn display_and_serde_agree() {
        for code in [
            ErrorCode::ReferenceAmbiguous,
            ErrorCode::ProviderUnavailable,
            ErrorCode::BusinessRuleViolated,
            ErrorCode::DatabaseError,
        ] {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, code.to_string());
        }
    }
}
