//! Import error types.
//!
//! [`ImportError`] aborts a whole batch. [`RecordError`] fails one record and
//! is accumulated into the outcome while its siblings continue.

use thiserror::Error;

use super::kind::ImportPhase;
use crate::domain::foundation::{ErrorCode, ValidationError};

/// Batch-level failure; nothing after the failing phase runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportError {
    /// The document shape is wrong before any record is looked at.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A record failed PARSE; the batch is rejected before any side effect.
    #[error("Record {index}: {source}")]
    Validation {
        index: usize,
        #[source]
        source: ValidationError,
    },

    /// The draft cannot be imported yet.
    #[error("Draft is not complete")]
    DraftIncomplete,

    #[error("Phase {0} exceeded its deadline")]
    DeadlineExceeded(ImportPhase),

    #[error("Import cancelled during {0}")]
    Cancelled(ImportPhase),

    /// The backing store failed outside of a per-record write.
    #[error("Store error: {0}")]
    Store(String),
}

impl ImportError {
    pub fn invalid_document(message: impl Into<String>) -> Self {
        ImportError::InvalidDocument(message.into())
    }

    pub fn validation(index: usize, source: ValidationError) -> Self {
        ImportError::Validation { index, source }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ImportError::InvalidDocument(_) => ErrorCode::InvalidDocument,
            ImportError::Validation { .. } => ErrorCode::ValidationFailed,
            ImportError::DraftIncomplete => ErrorCode::DraftIncomplete,
            ImportError::DeadlineExceeded(_) => ErrorCode::DeadlineExceeded,
            ImportError::Cancelled(_) => ErrorCode::Cancelled,
            ImportError::Store(_) => ErrorCode::DatabaseError,
        }
    }
}

/// Failure of a single record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("Ambiguous reference {key}: {matches} candidates")]
    ReferenceAmbiguous { key: String, matches: usize },

    #[error("Reference not found: {0}")]
    ReferenceNotFound(String),

    #[error("Business rule violated: {0}")]
    RuleViolated(String),

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Deadline exceeded before commit")]
    DeadlineExceeded,

    #[error("Cancelled before commit")]
    Cancelled,
}

impl RecordError {
    pub fn rule(message: impl Into<String>) -> Self {
        RecordError::RuleViolated(message.into())
    }

    pub fn commit(message: impl Into<String>) -> Self {
        RecordError::Commit(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            RecordError::ReferenceAmbiguous { .. } => ErrorCode::ReferenceAmbiguous,
            RecordError::ReferenceNotFound(_) => ErrorCode::ReferenceNotFound,
            RecordError::RuleViolated(_) => ErrorCode::BusinessRuleViolated,
            RecordError::Commit(_) => ErrorCode::CommitFailed,
            RecordError::DeadlineExceeded => ErrorCode::DeadlineExceeded,
            RecordError::Cancelled => ErrorCode::Cancelled,
        }
    }
}
