//! Completion predicate and lifecycle step of the onboarding dialogue.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::draft::{ClubConfigDraft, MemberRole};

/// True once the draft lists at least one aircraft and one member who is not
/// an administrator.
///
/// Monotonic: `members` only grows and a fragment can never empty the fleet,
/// so a complete draft stays complete under further merges.
pub fn is_complete(draft: &ClubConfigDraft) -> bool {
    !draft.fleet_items.is_empty() && draft.members.iter().any(|m| m.role != MemberRole::Admin)
}

/// Topic the dialogue is currently collecting.
///
/// Steps only move forward: `Fleet` → `Members` → `Settings` → `Complete`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    #[default]
    Fleet,
    Members,
    Settings,
    Complete,
}

impl OnboardingStep {
    /// The step a draft has reached on its own.
    pub fn for_draft(draft: &ClubConfigDraft) -> Self {
        if draft.fleet_items.is_empty() {
            OnboardingStep::Fleet
        } else if !is_complete(draft) {
            OnboardingStep::Members
        } else if draft.settings.is_empty() {
            OnboardingStep::Settings
        } else {
            OnboardingStep::Complete
        }
    }

    /// Advances to the draft's step, never backwards.
    pub fn advance(self, draft: &ClubConfigDraft) -> Self {
        self.max(Self::for_draft(draft))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingStep::Fleet => "fleet",
            OnboardingStep::Members => "members",
            OnboardingStep::Settings => "settings",
            OnboardingStep::Complete => "complete",
        }
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::onboarding::draft::{FleetItem, FleetKind, Member};
    use crate::domain::onboarding::fragment::ConfigFragment;
    use proptest::prelude::*;
    use serde_json::json;

    fn admin_only_draft() -> ClubConfigDraft {
        let mut draft = ClubConfigDraft::new();
        draft.members.push(
            Member::new(MemberRole::Admin)
                .with_name("Claire", "Martin")
                .with_email("claire@club.example"),
        );
        draft
    }

    #[test]
    fn empty_draft_is_incomplete() {
        assert!(!is_complete(&ClubConfigDraft::new()));
    }

    #[test]
    fn admin_and_fleet_is_not_enough() {
        let mut draft = admin_only_draft();
        draft.fleet_items.push(FleetItem::new(FleetKind::Plane, "F-ABCD"));
        assert!(!is_complete(&draft));
    }

    #[test]
    fn fleet_and_pilot_is_complete() {
        let mut draft = admin_only_draft();
        draft.fleet_items.push(FleetItem::new(FleetKind::Plane, "F-ABCD"));
        draft.members.push(Member::new(MemberRole::Pilot));
        assert!(is_complete(&draft));
    }

    #[test]
    fn role_only_member_satisfies_completion() {
        let mut draft = admin_only_draft();
        draft.fleet_items.push(FleetItem::new(FleetKind::Ulm, "F-JXYZ"));
        let fragment = ConfigFragment::parse(r#"{"members":[{"role":"PILOT"}]}"#).unwrap();
        draft.merge(&fragment);
        assert!(is_complete(&draft));
    }

    #[test]
    fn step_follows_draft_and_never_regresses() {
        let mut draft = admin_only_draft();
        assert_eq!(OnboardingStep::for_draft(&draft), OnboardingStep::Fleet);

        draft.fleet_items.push(FleetItem::new(FleetKind::Plane, "F-ABCD"));
        assert_eq!(OnboardingStep::for_draft(&draft), OnboardingStep::Members);

        draft.members.push(Member::new(MemberRole::Instructor));
        assert_eq!(OnboardingStep::for_draft(&draft), OnboardingStep::Settings);

        draft.settings.insert("currency".into(), json!("EUR"));
        assert_eq!(OnboardingStep::for_draft(&draft), OnboardingStep::Complete);

        assert_eq!(
            OnboardingStep::Complete.advance(&ClubConfigDraft::new()),
            OnboardingStep::Complete
        );
    }

    #[test]
    fn step_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&OnboardingStep::Fleet).unwrap(),
            "\"fleet\""
        );
    }

    fn arb_fragment() -> impl Strategy<Value = ConfigFragment> {
        let role = prop_oneof![
            Just("ADMIN"),
            Just("INSTRUCTOR"),
            Just("PILOT"),
            Just("MECHANIC")
        ];
        let kind = prop_oneof![Just("PLANE"), Just("ULM")];
        (
            prop::collection::vec(role, 0..3),
            prop::option::of(prop::collection::vec(kind, 1..3)),
            any::<bool>(),
        )
            .prop_map(|(roles, fleet, with_settings)| {
                let mut value = serde_json::Map::new();
                if !roles.is_empty() {
                    let members: Vec<_> = roles.iter().map(|r| json!({"role": r})).collect();
                    value.insert("members".into(), json!(members));
                }
                if let Some(kinds) = fleet {
                    let items: Vec<_> = kinds.iter().map(|k| json!({"kind": k})).collect();
                    value.insert("fleetItems".into(), json!(items));
                }
                if with_settings {
                    value.insert("settings".into(), json!({"currency": "EUR"}));
                }
                ConfigFragment::from_value(serde_json::Value::Object(value))
                    .expect("generated fragment is valid")
            })
    }

    proptest! {
        #[test]
        fn completion_is_monotonic(fragments in prop::collection::vec(arb_fragment(), 1..8)) {
            let mut draft = admin_only_draft();
            let mut was_complete = false;
            for fragment in &fragments {
                draft.merge(fragment);
                let now_complete = is_complete(&draft);
                prop_assert!(!was_complete || now_complete);
                was_complete = now_complete;
            }
        }

        #[test]
        fn members_length_is_additive(a in arb_fragment(), b in arb_fragment()) {
            let mut draft = ClubConfigDraft::new();
            draft.merge(&a);
            draft.merge(&b);
            let expected = a.members.as_ref().map_or(0, Vec::len) + b.members.as_ref().map_or(0, Vec::len);
            prop_assert_eq!(draft.members.len(), expected);
        }
    }
}
