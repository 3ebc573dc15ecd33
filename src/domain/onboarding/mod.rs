//! Onboarding dialogue domain.
//!
//! A club administrator describes their club to an assistant. Each assistant
//! turn may carry a `<config>` fragment that is validated and merged into the
//! running [`ClubConfigDraft`]; the draft is complete once it lists aircraft
//! and at least one non-administrator member.

mod completion;
mod draft;
mod errors;
pub mod extractor;
mod fragment;
mod prompt;
mod seed;
mod session;
mod station;

pub use completion::{is_complete, OnboardingStep};
pub use draft::{
    ClubConfigDraft, Coordinates, FleetItem, FleetKind, FleetStatus, Member, MemberRole,
    StationRef,
};
pub use errors::OnboardingError;
pub use extractor::{extract, Extraction};
pub use fragment::{ConfigFragment, FragmentError};
pub use prompt::ONBOARDING_SYSTEM_PROMPT;
pub use seed::{AdminContact, SeedContext};
pub use session::{ConversationSession, Turn, TurnRole};
pub use station::{haversine_km, rank_nearest, Station};
