//! Bulk import command handlers.

mod run_import;

pub use run_import::{RunImportCommand, RunImportHandler};
