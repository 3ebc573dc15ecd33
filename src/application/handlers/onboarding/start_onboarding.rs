//! StartOnboardingHandler - opens (or replays) an actor's dialogue.

use std::sync::Arc;

use tracing::{debug, info};

use super::assistant_turn::take_assistant_turn;
use crate::application::{ProviderGateway, SessionStore, StationEnricher};
use crate::domain::foundation::{ActorId, TurnId};
use crate::domain::onboarding::{OnboardingError, SeedContext, Turn};

#[derive(Debug, Clone)]
pub struct StartOnboardingCommand {
    pub actor_id: ActorId,
    pub seed: SeedContext,
}

#[derive(Debug, Clone)]
pub struct StartOnboardingResult {
    pub turn_id: TurnId,
    pub display_text: String,
    /// True when a recent start was replayed instead of opening a session.
    pub replayed: bool,
}

impl StartOnboardingResult {
    fn from_turn(turn: &Turn, replayed: bool) -> Self {
        Self {
            turn_id: turn.id,
            display_text: turn.display_text.clone(),
            replayed,
        }
    }
}

pub struct StartOnboardingHandler {
    sessions: Arc<SessionStore>,
    gateway: Arc<ProviderGateway>,
    enricher: Arc<StationEnricher>,
}

impl StartOnboardingHandler {
    pub fn new(
        sessions: Arc<SessionStore>,
        gateway: Arc<ProviderGateway>,
        enricher: Arc<StationEnricher>,
    ) -> Self {
        Self {
            sessions,
            gateway,
            enricher,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartOnboardingCommand,
    ) -> Result<StartOnboardingResult, OnboardingError> {
        let _guard = self.sessions.lock(&cmd.actor_id).await;

        if let Some(turn) = self.sessions.recent_start(&cmd.actor_id).await? {
            debug!(actor_id = %cmd.actor_id, turn_id = %turn.id, "Replaying recent start");
            return Ok(StartOnboardingResult::from_turn(&turn, true));
        }

        let stations = self.enricher.nearby(cmd.seed.usable_coordinates()).await;
        let opening = Turn::actor(cmd.seed.opening_message(&stations));

        self.sessions
            .create(cmd.actor_id.clone(), cmd.seed.initial_draft())
            .await?;
        let session = self.sessions.append_turn(&cmd.actor_id, opening).await?;
        info!(
            actor_id = %cmd.actor_id,
            stations = stations.len(),
            "Onboarding session started"
        );

        let (turn, _) = take_assistant_turn(&self.sessions, &self.gateway, &session).await?;
        Ok(StartOnboardingResult::from_turn(&turn, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::ports::AIError;
    use crate::adapters::stations::InMemoryStationDirectory;
    use crate::application::handlers::onboarding::test_support::{actor, gateway, sessions};
    use crate::domain::onboarding::{AdminContact, Coordinates, MemberRole, Station};
    use std::time::Duration;

    fn seed() -> SeedContext {
        SeedContext {
            club_name: Some("Aéroclub du Lac".to_string()),
            icao_code: Some("LFXX".to_string()),
            admin: Some(AdminContact {
                first_name: "Marie".to_string(),
                last_name: "Curie".to_string(),
                email: "marie@club.test".to_string(),
            }),
            coordinates: Some(Coordinates::new(45.0, 6.0)),
            ..SeedContext::default()
        }
    }

    fn handler(
        provider: Arc<MockAIProvider>,
        sessions: Arc<SessionStore>,
        enricher: StationEnricher,
    ) -> StartOnboardingHandler {
        StartOnboardingHandler::new(sessions, gateway(provider), Arc::new(enricher))
    }

    #[tokio::test]
    async fn start_seeds_admin_and_strips_config_from_display() {
        let provider = Arc::new(MockAIProvider::new().with_response(
            "Welcome!<config>{\"settings\":{\"currency\":\"EUR\"}}</config>",
        ));
        let sessions = sessions(Duration::from_secs(5));
        let handler = handler(provider, sessions.clone(), StationEnricher::disabled());

        let result = handler
            .handle(StartOnboardingCommand {
                actor_id: actor(),
                seed: seed(),
            })
            .await
            .unwrap();

        assert_eq!(result.display_text, "Welcome!");
        assert!(!result.replayed);
        let draft = sessions.get_draft(&actor()).await.unwrap();
        assert_eq!(draft.members[0].role, MemberRole::Admin);
        assert_eq!(draft.settings["currency"], "EUR");
    }

    #[tokio::test]
    async fn double_start_within_debounce_returns_same_turn() {
        let provider = Arc::new(MockAIProvider::new().with_response("Welcome!"));
        let handler = handler(
            provider.clone(),
            sessions(Duration::from_secs(5)),
            StationEnricher::disabled(),
        );
        let cmd = StartOnboardingCommand {
            actor_id: actor(),
            seed: seed(),
        };

        let first = handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();

        assert_eq!(first.turn_id, second.turn_id);
        assert_eq!(first.display_text, second.display_text);
        assert!(second.replayed);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn stations_are_injected_but_hidden() {
        let provider = Arc::new(MockAIProvider::new());
        let directory = Arc::new(InMemoryStationDirectory::new(vec![Station {
            id: "07591".to_string(),
            name: "Embrun".to_string(),
            latitude: 44.56,
            longitude: 6.5,
            distance_km: None,
        }]));
        let sessions = sessions(Duration::from_secs(5));
        let handler = handler(
            provider.clone(),
            sessions.clone(),
            StationEnricher::new(Some(directory), 3),
        );

        handler
            .handle(StartOnboardingCommand {
                actor_id: actor(),
                seed: seed(),
            })
            .await
            .unwrap();

        let sent = &provider.requests()[0].messages[0].content;
        assert!(sent.contains("<stations>"));
        assert!(sent.contains("Embrun"));
        let session = sessions.get(&actor()).await.unwrap();
        assert!(!session.turns()[0].display_text.contains("<stations>"));
    }

    #[tokio::test]
    async fn provider_failure_keeps_opening_turn() {
        let provider = Arc::new(MockAIProvider::new().with_error(AIError::unavailable("down")));
        let sessions = sessions(Duration::from_secs(5));
        let handler = handler(provider, sessions.clone(), StationEnricher::disabled());

        let err = handler
            .handle(StartOnboardingCommand {
                actor_id: actor(),
                seed: seed(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, OnboardingError::ProviderUnavailable(_)));
        assert_eq!(sessions.get(&actor()).await.unwrap().turns().len(), 1);
    }
}
