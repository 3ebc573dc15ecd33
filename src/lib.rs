//! Club Onboarding - conversational tenant setup and record reconciliation.
//!
//! An aviation club administrator describes their club to a language model;
//! configuration fragments in the replies build up a draft that is finally
//! reconciled into the tenant's record store, alongside operator-submitted
//! bulk imports of accounting entries, flights, balances and more.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
