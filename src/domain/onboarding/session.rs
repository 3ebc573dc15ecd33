//! Conversation session aggregate.
//!
//! One live session exists per actor. It owns the turn history, the draft
//! built from assistant fragments, and the lifecycle step.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::completion::OnboardingStep;
use super::draft::ClubConfigDraft;
use super::extractor::{self, Extraction};
use super::fragment::ConfigFragment;
use crate::domain::foundation::{ActorId, Timestamp, TurnId};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    Actor,
    Assistant,
}

/// One exchange in the dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: TurnId,
    pub role: TurnRole,
    /// Exactly what the model sees on later turns.
    pub content: String,
    /// What the actor sees: delimited blocks removed.
    pub display_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment: Option<ConfigFragment>,
    pub created_at: Timestamp,
}

impl Turn {
    /// Creates an actor turn. Injected context blocks are hidden from display.
    pub fn actor(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: TurnId::new(),
            role: TurnRole::Actor,
            display_text: extractor::display_text(&content),
            content,
            fragment: None,
            created_at: Timestamp::now(),
        }
    }

    /// Creates an assistant turn from raw model output and its extraction.
    pub fn assistant(content: impl Into<String>, extraction: Extraction) -> Self {
        Self {
            id: TurnId::new(),
            role: TurnRole::Assistant,
            content: content.into(),
            display_text: extraction.display_text,
            fragment: extraction.fragment,
            created_at: Timestamp::now(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == TurnRole::Assistant
    }
}

/// Per-actor dialogue state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSession {
    actor_id: ActorId,
    turns: Vec<Turn>,
    draft: ClubConfigDraft,
    step: OnboardingStep,
    created_at: Timestamp,
    last_active_at: Timestamp,
}

impl ConversationSession {
    /// Starts a session seeded with an initial draft.
    pub fn new(actor_id: ActorId, draft: ClubConfigDraft) -> Self {
        let now = Timestamp::now();
        let step = OnboardingStep::for_draft(&draft);
        Self {
            actor_id,
            turns: Vec::new(),
            draft,
            step,
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn draft(&self) -> &ClubConfigDraft {
        &self.draft
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn last_active_at(&self) -> Timestamp {
        self.last_active_at
    }

    /// Appends a turn and refreshes activity.
    pub fn append_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.touch();
    }

    /// Merges a fragment into the draft and advances the step.
    pub fn merge_fragment(&mut self, fragment: &ConfigFragment) {
        self.draft.merge(fragment);
        self.step = self.step.advance(&self.draft);
        self.touch();
    }

    /// The most recent assistant turn, if any.
    pub fn last_assistant_turn(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.is_assistant())
    }

    /// True when this session was created less than `window` before `now`.
    pub fn started_within(&self, window: Duration, now: &Timestamp) -> bool {
        self.created_at.is_within(window, now)
    }

    /// True when the session has been idle for at least `ttl`.
    pub fn is_expired(&self, ttl: Duration, now: &Timestamp) -> bool {
        !self.last_active_at.is_within(ttl, now)
    }

    fn touch(&mut self) {
        self.last_active_at = Timestamp::now();
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, secs: u64) {
        self.created_at = self.created_at.minus_secs(secs);
        self.last_active_at = self.last_active_at.minus_secs(secs);
    }
}
