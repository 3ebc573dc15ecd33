//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, patterns)
//! - `onboarding` - Conversation session, draft, fragment extraction and completion
//! - `import` - Reconciliation import: batches, PARSE rules, natural keys, outcomes

pub mod foundation;
pub mod import;
pub mod onboarding;
