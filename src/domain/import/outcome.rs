//! Import outcome reporting.

use serde::Serialize;
use serde_json::Value;

use super::batch::RawRecord;
use super::errors::RecordError;
use super::kind::{DuplicatePolicy, RecordKind};
use crate::domain::foundation::RowId;

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Inserted,
    Updated,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResult {
    pub index: usize,
    pub status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<RowId>,
}

/// A failed record with the submitted fields and a readable reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFailure {
    pub index: usize,
    pub record: Value,
    pub reason: String,
    pub code: String,
}

/// Final report of one pipeline run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    kind: RecordKind,
    policy: DuplicatePolicy,
    committed: usize,
    skipped: usize,
    failed: usize,
    failures: Vec<RecordFailure>,
    results: Vec<RecordResult>,
}

impl ImportOutcome {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Inserted plus updated.
    pub fn committed(&self) -> usize {
        self.committed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn failures(&self) -> &[RecordFailure] {
        &self.failures
    }

    pub fn results(&self) -> &[RecordResult] {
        &self.results
    }

    /// `(committed, skipped, failed)`.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.committed, self.skipped, self.failed)
    }
}

/// Accumulates per-record results while the pipeline runs.
#[derive(Debug)]
pub struct OutcomeBuilder {
    kind: RecordKind,
    policy: DuplicatePolicy,
    failures: Vec<RecordFailure>,
    results: Vec<RecordResult>,
}

impl OutcomeBuilder {
    pub fn new(kind: RecordKind, policy: DuplicatePolicy) -> Self {
        Self {
            kind,
            policy,
            failures: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn inserted(&mut self, index: usize, row_id: RowId) {
        self.push(index, RecordStatus::Inserted, Some(row_id));
    }

    pub fn updated(&mut self, index: usize, row_id: RowId) {
        self.push(index, RecordStatus::Updated, Some(row_id));
    }

    pub fn skipped(&mut self, index: usize) {
        self.push(index, RecordStatus::Skipped, None);
    }

    pub fn failed(&mut self, index: usize, record: &RawRecord, error: &RecordError) {
        self.push(index, RecordStatus::Failed, None);
        self.failures.push(RecordFailure {
            index,
            record: record.clone().into_value(),
            reason: error.to_string(),
            code: error.code().to_string(),
        });
    }

    fn push(&mut self, index: usize, status: RecordStatus, row_id: Option<RowId>) {
        self.results.push(RecordResult {
            index,
            status,
            row_id,
        });
    }

    pub fn finish(mut self) -> ImportOutcome {
        self.results.sort_by_key(|r| r.index);
        self.failures.sort_by_key(|f| f.index);
        let count = |status| self.results.iter().filter(|r| r.status == status).count();
        let committed = count(RecordStatus::Inserted) + count(RecordStatus::Updated);
        let skipped = count(RecordStatus::Skipped);
        let failed = count(RecordStatus::Failed);
        ImportOutcome {
            kind: self.kind,
            policy: self.policy,
            committed,
            skipped,
            failed,
            failures: self.failures,
            results: self.results,
        }
    }
}
