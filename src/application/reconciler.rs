//! Reconciliation pipeline.
//!
//! Runs a batch through PARSE, RESOLVE, VALIDATE, DUPLICATES and COMMIT,
//! each phase finishing for every record before the next starts. Only COMMIT
//! writes. The first four phases run under their own deadline and abort the
//! batch when it passes or the token is cancelled. COMMIT checks both between
//! records and fails whatever it has not written yet.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::PhaseDeadlines;
use crate::domain::foundation::{RowId, TenantId};
use crate::domain::import::{
    prepare, require_editable, DuplicatePolicy, ImportBatch, ImportError, ImportOutcome,
    ImportPhase, NaturalKey, OutcomeBuilder, ParsedRecord, PreparedWrite, RawRecord, RecordError,
    RecordKind, ResolvedRefs, Resolution, Row, WriteMode,
};
use crate::ports::{RecordStore, StoreError};

impl From<StoreError> for ImportError {
    fn from(err: StoreError) -> Self {
        ImportError::Store(err.to_string())
    }
}

/// What COMMIT will do with a record that survived the earlier phases.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Action {
    Insert,
    Replace(RowId),
    Skip,
}

/// One record as it moves through the phases.
struct Work {
    index: usize,
    raw: RawRecord,
    parsed: ParsedRecord,
    refs: ResolvedRefs,
    write: Option<PreparedWrite>,
    action: Action,
    failure: Option<RecordError>,
}

impl Work {
    fn is_live(&self) -> bool {
        self.failure.is_none()
    }
}

pub struct Reconciler {
    store: Arc<dyn RecordStore>,
    deadlines: PhaseDeadlines,
    balance_type_code: String,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn RecordStore>,
        deadlines: PhaseDeadlines,
        balance_type_code: impl Into<String>,
    ) -> Self {
        Self {
            store,
            deadlines,
            balance_type_code: balance_type_code.into(),
        }
    }

    pub async fn run(
        &self,
        tenant: &TenantId,
        batch: ImportBatch,
        cancel: &CancellationToken,
    ) -> Result<ImportOutcome, ImportError> {
        let ImportBatch {
            kind,
            records,
            policy,
        } = batch;
        let total = records.len();

        let mut works = self
            .phase(ImportPhase::Parse, self.deadlines.parse, cancel, async {
                self.parse(kind, records)
            })
            .await?;

        self.phase(ImportPhase::Resolve, self.deadlines.resolve, cancel, async {
            self.resolve(tenant, &mut works).await
        })
        .await?;

        self.phase(ImportPhase::Validate, self.deadlines.validate, cancel, async {
            validate(&mut works);
            Ok(())
        })
        .await?;

        self.phase(ImportPhase::Duplicates, self.deadlines.duplicates, cancel, async {
            self.find_duplicates(tenant, &mut works, policy).await
        })
        .await?;

        let mut outcome = OutcomeBuilder::new(kind, policy);
        self.commit(tenant, works, &mut outcome, cancel).await;
        let outcome = outcome.finish();

        info!(
            tenant_id = %tenant,
            kind = %kind,
            policy = %policy,
            records = total,
            committed = outcome.committed(),
            skipped = outcome.skipped(),
            failed = outcome.failed(),
            "Import finished"
        );
        Ok(outcome)
    }

    async fn phase<T, F>(
        &self,
        phase: ImportPhase,
        deadline: Duration,
        cancel: &CancellationToken,
        work: F,
    ) -> Result<T, ImportError>
    where
        F: Future<Output = Result<T, ImportError>>,
    {
        debug!(phase = %phase, "Import phase started");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ImportError::Cancelled(phase)),
            result = timeout(deadline, work) => match result {
                Ok(result) => result,
                Err(_) => Err(ImportError::DeadlineExceeded(phase)),
            },
        }
    }

    /// Any structural error rejects the whole batch.
    fn parse(&self, kind: RecordKind, records: Vec<RawRecord>) -> Result<Vec<Work>, ImportError> {
        records
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                let parsed = ParsedRecord::parse(kind, &raw)
                    .map_err(|e| ImportError::validation(index, e))?;
                Ok(Work {
                    index,
                    raw,
                    parsed,
                    refs: ResolvedRefs::new(),
                    write: None,
                    action: Action::Insert,
                    failure: None,
                })
            })
            .collect()
    }

    /// One store lookup per distinct natural key across the batch.
    async fn resolve(&self, tenant: &TenantId, works: &mut [Work]) -> Result<(), ImportError> {
        let mut cache: HashMap<NaturalKey, Resolution<Row>> = HashMap::new();

        for work in works.iter_mut() {
            for (slot, key) in work.parsed.references(&self.balance_type_code) {
                let resolution = match cache.get(&key) {
                    Some(resolution) => resolution.clone(),
                    None => {
                        let (table, filter) = key.lookup();
                        let rows = self.store.select(tenant, table, &filter).await?;
                        let resolution = Resolution::from_matches(rows);
                        cache.insert(key.clone(), resolution.clone());
                        resolution
                    }
                };

                match resolution.to_result(&key) {
                    Ok(row) => {
                        work.refs.insert(slot, row);
                    }
                    Err(err) => {
                        work.failure = Some(err);
                        break;
                    }
                }
            }
        }

        debug!(lookups = cache.len(), "References resolved");
        Ok(())
    }

    /// Checks earlier records of this batch, then the store.
    ///
    /// A repeat inside the batch is skipped under either policy.
    async fn find_duplicates(
        &self,
        tenant: &TenantId,
        works: &mut [Work],
        policy: DuplicatePolicy,
    ) -> Result<(), ImportError> {
        let mut accepted: Vec<usize> = Vec::new();

        for i in 0..works.len() {
            let Some(write) = works[i].write.as_ref().filter(|_| works[i].is_live()) else {
                continue;
            };

            let repeats_batch = accepted.iter().any(|&j| {
                works[j].write.as_ref().is_some_and(|earlier| {
                    earlier.table == write.table && write.duplicate_key.matches(&earlier.values)
                })
            });
            if repeats_batch {
                works[i].action = Action::Skip;
                continue;
            }

            let existing = self
                .store
                .select(tenant, write.table, &write.duplicate_key)
                .await?;

            let refused = match existing.first() {
                Some(row) if write.guards_system_rows => require_editable(row).err(),
                _ => None,
            };
            let action = match (existing.first(), &write.mode, policy) {
                (None, _, _) => Action::Insert,
                (Some(row), WriteMode::Upsert(_), _) => Action::Replace(row.id),
                (Some(_), WriteMode::Insert, DuplicatePolicy::Skip) => Action::Skip,
                (Some(row), WriteMode::Insert, DuplicatePolicy::Replace) => Action::Replace(row.id),
            };

            if let Some(err) = refused {
                works[i].failure = Some(err);
                continue;
            }
            works[i].action = action;
            if action != Action::Skip {
                accepted.push(i);
            }
        }
        Ok(())
    }

    async fn commit(
        &self,
        tenant: &TenantId,
        works: Vec<Work>,
        outcome: &mut OutcomeBuilder,
        cancel: &CancellationToken,
    ) {
        debug!(phase = %ImportPhase::Commit, "Import phase started");
        let deadline = Instant::now() + self.deadlines.commit;
        let mut halted: Option<RecordError> = None;

        for work in works {
            if let Some(err) = &work.failure {
                outcome.failed(work.index, &work.raw, err);
                continue;
            }
            let Some(write) = work.write.as_ref() else {
                continue;
            };
            if work.action == Action::Skip {
                outcome.skipped(work.index);
                continue;
            }

            if halted.is_none() {
                if cancel.is_cancelled() {
                    halted = Some(RecordError::Cancelled);
                } else if Instant::now() >= deadline {
                    halted = Some(RecordError::DeadlineExceeded);
                }
            }
            if let Some(err) = &halted {
                outcome.failed(work.index, &work.raw, err);
                continue;
            }

            match self.write(tenant, write, work.action).await {
                Ok(row) if work.action == Action::Insert => outcome.inserted(work.index, row.id),
                Ok(row) => outcome.updated(work.index, row.id),
                Err(err) => {
                    error!(
                        tenant_id = %tenant,
                        table = %write.table,
                        index = work.index,
                        error = %err,
                        "Record commit failed"
                    );
                    outcome.failed(work.index, &work.raw, &err);
                }
            }
        }
    }

    /// Writes one record. A linked row is written first and deleted again
    /// when the main write fails.
    async fn write(
        &self,
        tenant: &TenantId,
        write: &PreparedWrite,
        action: Action,
    ) -> Result<Row, RecordError> {
        let commit_err = |e: StoreError| RecordError::commit(e.to_string());

        if let Action::Replace(id) = action {
            return match write.mode {
                WriteMode::Upsert(keys) => self
                    .store
                    .upsert(tenant, write.table, write.values.clone(), keys)
                    .await
                    .map_err(commit_err),
                WriteMode::Insert => self
                    .store
                    .update(tenant, write.table, id, write.replacement_values())
                    .await
                    .map_err(commit_err),
            };
        }

        let mut values = write.values.clone();
        let linked = match &write.linked {
            Some(linked) => {
                let row = self
                    .store
                    .insert(tenant, linked.table, linked.values.clone())
                    .await
                    .map_err(commit_err)?;
                values.insert(linked.link_field.to_string(), json!(row.id.to_string()));
                Some((linked.table, row.id))
            }
            None => None,
        };

        let result = match write.mode {
            WriteMode::Insert => self.store.insert(tenant, write.table, values).await,
            WriteMode::Upsert(keys) => self.store.upsert(tenant, write.table, values, keys).await,
        };

        match result {
            Ok(row) => Ok(row),
            Err(err) => {
                if let Some((table, id)) = linked {
                    if let Err(undo) = self.store.delete(tenant, table, id).await {
                        error!(
                            tenant_id = %tenant,
                            table = %table,
                            row_id = %id,
                            error = %undo,
                            "Failed to remove linked row after commit failure"
                        );
                    }
                }
                Err(commit_err(err))
            }
        }
    }
}

/// Applies business rules against resolved references.
fn validate(works: &mut [Work]) {
    for work in works.iter_mut().filter(|w| w.is_live()) {
        match prepare(&work.parsed, &work.refs) {
            Ok(write) => work.write = Some(write),
            Err(err) => work.failure = Some(err),
        }
    }
}
