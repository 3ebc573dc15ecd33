//! Record kinds, duplicate policy and pipeline phases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Selects the document field, PARSE rules, references and duplicate key of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    AccountingEntries,
    Flights,
    MemberContributions,
    Balances,
    Fleet,
    Members,
    EntryTypes,
    FlightTypes,
    /// A completed onboarding draft reshaped into records.
    Draft,
}

impl RecordKind {
    pub const ALLOWED: [&'static str; 9] = [
        "accounting_entries",
        "flights",
        "member_contributions",
        "balances",
        "fleet",
        "members",
        "account_entry_types",
        "flight_types",
        "draft",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::AccountingEntries => "accounting_entries",
            RecordKind::Flights => "flights",
            RecordKind::MemberContributions => "member_contributions",
            RecordKind::Balances => "balances",
            RecordKind::Fleet => "fleet",
            RecordKind::Members => "members",
            RecordKind::EntryTypes => "account_entry_types",
            RecordKind::FlightTypes => "flight_types",
            RecordKind::Draft => "draft",
        }
    }

    /// Top-level field names a bulk document of this kind may use for its list.
    pub fn list_fields(&self) -> &'static [&'static str] {
        match self {
            RecordKind::AccountingEntries => &["accounting_entries", "entries"],
            RecordKind::Flights => &["flights"],
            RecordKind::MemberContributions => &["member_contributions"],
            RecordKind::Balances => &["balances"],
            RecordKind::Fleet => &["aircraft", "aircrafts", "fleet_items"],
            RecordKind::Members => &["members", "users"],
            RecordKind::EntryTypes => &["account_entry_types", "entry_types"],
            RecordKind::FlightTypes => &["flight_types"],
            RecordKind::Draft => &[],
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "accounting_entries" => Ok(RecordKind::AccountingEntries),
            "flights" => Ok(RecordKind::Flights),
            "member_contributions" => Ok(RecordKind::MemberContributions),
            "balances" => Ok(RecordKind::Balances),
            "fleet" => Ok(RecordKind::Fleet),
            "members" => Ok(RecordKind::Members),
            "account_entry_types" => Ok(RecordKind::EntryTypes),
            "flight_types" => Ok(RecordKind::FlightTypes),
            "draft" => Ok(RecordKind::Draft),
            _ => Err(ValidationError::not_allowed("kind", &Self::ALLOWED, s)),
        }
    }
}

/// What to do with a record that matches an existing row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    Skip,
    Replace,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::Skip => "skip",
            DuplicatePolicy::Replace => "replace",
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DuplicatePolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(DuplicatePolicy::Skip),
            "replace" => Ok(DuplicatePolicy::Replace),
            _ => Err(ValidationError::not_allowed("policy", &["skip", "replace"], s)),
        }
    }
}

/// The five reconciliation phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPhase {
    Parse,
    Resolve,
    Validate,
    Duplicates,
    Commit,
}

impl ImportPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportPhase::Parse => "parse",
            ImportPhase::Resolve => "resolve",
            ImportPhase::Validate => "validate",
            ImportPhase::Duplicates => "duplicates",
            ImportPhase::Commit => "commit",
        }
    }
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
