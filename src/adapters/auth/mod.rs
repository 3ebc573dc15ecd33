//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `StaticTokenValidator` - tokens listed in configuration
//! - `MockSessionValidator` - test double with error injection

mod mock;
mod static_tokens;

pub use mock::MockSessionValidator;
pub use static_tokens::StaticTokenValidator;
