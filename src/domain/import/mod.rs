//! Reconciliation import domain.
//!
//! A batch runs through five phases in order: PARSE, RESOLVE, VALIDATE,
//! DUPLICATES and COMMIT. Everything here is pure; the pipeline that talks
//! to the record store lives in the application layer.

mod batch;
mod errors;
mod fields;
mod kind;
mod outcome;
mod plan;
mod query;
mod records;
mod resolve;
mod rules;

pub use batch::{ImportBatch, RawRecord};
pub use errors::{ImportError, RecordError};
pub use kind::{DuplicatePolicy, ImportPhase, RecordKind};
pub use outcome::{ImportOutcome, OutcomeBuilder, RecordFailure, RecordResult, RecordStatus};
pub use plan::{prepare, LinkedWrite, PreparedWrite, ResolvedRefs, WriteMode};
pub use query::{Condition, Filter, Row, Table};
pub use records::{AccountingCategory, ParsedRecord, PaymentMethod, RefSlot};
pub use resolve::{NaturalKey, OwnerRef, Resolution};
pub use rules::{apply_polarity, require_editable, Polarity};
