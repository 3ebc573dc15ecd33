//! Reconciliation importer configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_deadline")]
    pub parse_deadline_secs: u64,

    #[serde(default = "default_deadline")]
    pub resolve_deadline_secs: u64,

    #[serde(default = "default_deadline")]
    pub validate_deadline_secs: u64,

    #[serde(default = "default_deadline")]
    pub duplicates_deadline_secs: u64,

    #[serde(default = "default_deadline")]
    pub commit_deadline_secs: u64,

    /// Entry type code every imported balance is booked under
    #[serde(default = "default_balance_entry_type")]
    pub balance_entry_type_code: String,
}

/// Per-phase deadlines as durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDeadlines {
    pub parse: Duration,
    pub resolve: Duration,
    pub validate: Duration,
    pub duplicates: Duration,
    pub commit: Duration,
}

impl PhaseDeadlines {
    /// The same deadline for every phase.
    pub fn uniform(deadline: Duration) -> Self {
        Self {
            parse: deadline,
            resolve: deadline,
            validate: deadline,
            duplicates: deadline,
            commit: deadline,
        }
    }
}

impl Default for PhaseDeadlines {
    fn default() -> Self {
        Self::uniform(Duration::from_secs(default_deadline()))
    }
}

impl ImportConfig {
    pub fn deadlines(&self) -> PhaseDeadlines {
        PhaseDeadlines {
            parse: Duration::from_secs(self.parse_deadline_secs),
            resolve: Duration::from_secs(self.resolve_deadline_secs),
            validate: Duration::from_secs(self.validate_deadline_secs),
            duplicates: Duration::from_secs(self.duplicates_deadline_secs),
            commit: Duration::from_secs(self.commit_deadline_secs),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            (self.parse_deadline_secs, "IMPORT__PARSE_DEADLINE_SECS"),
            (self.resolve_deadline_secs, "IMPORT__RESOLVE_DEADLINE_SECS"),
            (self.validate_deadline_secs, "IMPORT__VALIDATE_DEADLINE_SECS"),
            (self.duplicates_deadline_secs, "IMPORT__DUPLICATES_DEADLINE_SECS"),
            (self.commit_deadline_secs, "IMPORT__COMMIT_DEADLINE_SECS"),
        ];
        if let Some((_, name)) = checks.iter().find(|(secs, _)| *secs == 0) {
            return Err(ValidationError::InvalidDeadline(name));
        }
        if self.balance_entry_type_code.trim().is_empty() {
            return Err(ValidationError::MissingRequired("IMPORT__BALANCE_ENTRY_TYPE_CODE"));
        }
        Ok(())
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            parse_deadline_secs: default_deadline(),
            resolve_deadline_secs: default_deadline(),
            validate_deadline_secs: default_deadline(),
            duplicates_deadline_secs: default_deadline(),
            commit_deadline_secs: default_deadline(),
            balance_entry_type_code: default_balance_entry_type(),
        }
    }
}

fn default_deadline() -> u64 {
    30
}

fn default_balance_entry_type() -> String {
    "BALANCE".to_string()
}
