//! Integration tests for the onboarding HTTP flow.
//!
//! Drives the full router the binary serves: static token auth, dialogue
//! start and chat against a scripted provider, draft inspection, and the
//! final commit into an in-memory record store.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use club_onboarding::adapters::ai::MockAIProvider;
use club_onboarding::adapters::auth::StaticTokenValidator;
use club_onboarding::adapters::http::import::ImportHandlers;
use club_onboarding::adapters::http::onboarding::OnboardingHandlers;
use club_onboarding::adapters::http::api_router;
use club_onboarding::adapters::stations::InMemoryStationDirectory;
use club_onboarding::adapters::storage::{InMemoryRecordStore, InMemorySessionRepository};
use club_onboarding::application::handlers::{
    CommitDraftHandler, GetConfigHandler, RunImportHandler, SendMessageHandler,
    StartOnboardingHandler,
};
use club_onboarding::application::{
    GenerationSettings, ProviderGateway, Reconciler, SessionStore, StationEnricher,
};
use club_onboarding::config::{AuthConfig, PhaseDeadlines};
use club_onboarding::domain::foundation::TenantId;
use club_onboarding::domain::import::Table;
use club_onboarding::domain::onboarding::Station;
use club_onboarding::ports::StationDirectory;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    provider: Arc<MockAIProvider>,
    store: Arc<InMemoryRecordStore>,
}

fn build_app(provider: MockAIProvider, stations: Vec<Station>) -> TestApp {
    let provider = Arc::new(provider);
    let store = Arc::new(InMemoryRecordStore::new());

    let sessions = Arc::new(SessionStore::new(
        Arc::new(InMemorySessionRepository::new(Duration::from_secs(3600))),
        Duration::from_secs(5),
    ));
    let gateway = Arc::new(ProviderGateway::new(
        provider.clone(),
        GenerationSettings::default(),
    ));
    let directory: Arc<dyn StationDirectory> = Arc::new(InMemoryStationDirectory::new(stations));
    let enricher = Arc::new(StationEnricher::new(Some(directory), 3));
    let reconciler = Arc::new(Reconciler::new(
        store.clone(),
        PhaseDeadlines::default(),
        "BALANCE",
    ));

    let onboarding = OnboardingHandlers::new(
        Arc::new(StartOnboardingHandler::new(
            sessions.clone(),
            gateway.clone(),
            enricher,
        )),
        Arc::new(SendMessageHandler::new(sessions.clone(), gateway)),
        Arc::new(GetConfigHandler::new(sessions.clone())),
        Arc::new(CommitDraftHandler::new(sessions, reconciler.clone())),
    );
    let imports = ImportHandlers::new(Arc::new(RunImportHandler::new(reconciler)));

    let auth = AuthConfig {
        static_tokens: Some("tok-alice:alice:club-1:alice@club.test".to_string()),
    };
    let validator =
        Arc::new(StaticTokenValidator::from_entries(&auth.entries().unwrap()).unwrap());

    TestApp {
        router: api_router(onboarding, imports, validator),
        provider,
        store,
    }
}

fn tenant() -> TenantId {
    TenantId::new("club-1").unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", "Bearer tok-alice")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("Authorization", "Bearer tok-alice")
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn station(id: &str, latitude: f64, longitude: f64) -> Station {
    Station {
        id: id.to_string(),
        name: format!("Station {id}"),
        latitude,
        longitude,
        distance_km: None,
    }
}

fn seed() -> Value {
    json!({
        "clubName": "Aéroclub du Lac",
        "icaoCode": "LFLA",
        "admin": {"firstName": "Marie", "lastName": "Curie", "email": "marie@club.test"},
        "coordinates": {"latitude": 45.0, "longitude": 5.0}
    })
}

// =============================================================================
// Dialogue
// =============================================================================

#[tokio::test]
async fn full_dialogue_reaches_a_committable_draft() {
    let provider = MockAIProvider::new()
        .with_response("Bienvenue ! Parlons de votre flotte.")
        .with_response(
            "Parfait.<config>{\"fleetItems\":[{\"kind\":\"PLANE\",\"tailNumber\":\"f-gabc\",\"rate\":150}]}</config>",
        )
        .with_response(
            "Merci.<config>{\"members\":[{\"role\":\"PILOT\",\"firstName\":\"Jean\",\"lastName\":\"Dupont\",\"email\":\"jean@club.test\"}],\"settings\":{\"currency\":\"EUR\"}}</config>",
        );
    let app = build_app(provider, Vec::new());

    let (status, start) = send(&app, post("/api/onboarding/start", seed())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(start["displayText"], "Bienvenue ! Parlons de votre flotte.");

    let (_, config) = send(&app, get("/api/onboarding/config")).await;
    assert_eq!(config["step"], "fleet");
    assert_eq!(config["draft"]["members"][0]["role"], "ADMIN");

    let (status, fleet) = send(
        &app,
        post("/api/onboarding/chat", json!({"message": "Un DR400 F-GABC"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fleet["displayText"], "Parfait.");
    assert_eq!(fleet["complete"], false);
    assert_eq!(fleet["draft"]["fleetItems"][0]["capacity"], 4);

    let (_, members) = send(
        &app,
        post("/api/onboarding/chat", json!({"message": "Jean Dupont, pilote"})),
    )
    .await;
    assert_eq!(members["complete"], true);
    assert_eq!(members["draft"]["members"].as_array().unwrap().len(), 2);

    let (status, outcome) = send(&app, post("/api/onboarding/commit", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["committed"], 4);
    assert_eq!(outcome["failed"], 0);

    let users = app.store.rows(&tenant(), Table::Users).await;
    assert_eq!(users.len(), 2);
    let aircraft = app.store.rows(&tenant(), Table::Aircraft).await;
    assert_eq!(aircraft[0].str_field("registration"), Some("F-GABC"));
}

#[tokio::test]
async fn second_start_within_debounce_replays_the_reply() {
    let provider = MockAIProvider::new()
        .with_response("Bonjour !")
        .with_response("Should not be requested");
    let app = build_app(provider, Vec::new());

    let (_, first) = send(&app, post("/api/onboarding/start", seed())).await;
    let (status, second) = send(&app, post("/api/onboarding/start", seed())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["turnId"], second["turnId"]);
    assert_eq!(second["displayText"], "Bonjour !");
    assert_eq!(app.provider.call_count(), 1);
}

#[tokio::test]
async fn nearby_stations_reach_the_provider_but_not_the_client() {
    let stations = vec![station("LFLY", 45.72, 4.94), station("LFLS", 45.36, 5.33)];
    let app = build_app(MockAIProvider::new().with_response("Bonjour !"), stations);

    let (status, start) = send(&app, post("/api/onboarding/start", seed())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(start["displayText"], "Bonjour !");

    let calls = app.provider.requests();
    let sent = &calls[0].messages[0].content;
    assert!(sent.contains("LFLS"));
    assert!(sent.contains("LFLY"));
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let app = build_app(MockAIProvider::new(), Vec::new());
    let request = Request::builder()
        .method("POST")
        .uri("/api/onboarding/start")
        .header("Authorization", "Bearer forged")
        .header("Content-Type", "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTH_ERROR");
}

fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Authorization", "Bearer tok-alice")
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn malformed_seed_body_is_400_and_reaches_no_provider() {
    let app = build_app(MockAIProvider::new().with_response("Bonjour !"), Vec::new());

    let (status, body) = send(&app, post_raw("/api/onboarding/start", r#"{"clubName": "#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(app.provider.call_count(), 0);
}

#[tokio::test]
async fn empty_start_body_opens_an_unseeded_dialogue() {
    let app = build_app(MockAIProvider::new().with_response("Bonjour !"), Vec::new());

    let (status, body) = send(&app, post_raw("/api/onboarding/start", "")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["displayText"], "Bonjour !");
}

#[tokio::test]
async fn blank_chat_message_is_422() {
    let app = build_app(MockAIProvider::new(), Vec::new());
    send(&app, post("/api/onboarding/start", json!({}))).await;

    let (status, _) = send(&app, post("/api/onboarding/chat", json!({"message": "   "}))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// =============================================================================
// Import endpoint
// =============================================================================

#[tokio::test]
async fn member_import_then_resubmission_is_skipped() {
    let app = build_app(MockAIProvider::new(), Vec::new());
    let document = json!({"members": [
        {"first_name": "Jean", "last_name": "Dupont", "email": "jdupont@club.test"}
    ]});

    let (status, first) = send(&app, post("/api/imports/members", document.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["committed"], 1);

    let (_, second) = send(&app, post("/api/imports/members", document)).await;
    assert_eq!(second["committed"], 0);
    assert_eq!(second["skipped"], 1);
    assert_eq!(app.store.rows(&tenant(), Table::Users).await.len(), 1);
}

#[tokio::test]
async fn invalid_policy_is_400() {
    let app = build_app(MockAIProvider::new(), Vec::new());

    let (status, body) = send(
        &app,
        post("/api/imports/members?policy=merge", json!({"members": []})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn reference_types_are_importable_kinds() {
    let app = build_app(MockAIProvider::new(), Vec::new());

    let (status, body) = send(
        &app,
        post(
            "/api/imports/account-entry-types",
            json!({"account_entry_types": [{"code": "FUEL", "name": "Fuel", "is_credit": false}]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["committed"], 1);

    let (status, _) = send(
        &app,
        post("/api/imports/flight_types", json!({"flight_types": [{"code": "LOCAL"}]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.rows(&tenant(), Table::FlightTypes).await.len(), 1);

    let (status, _) = send(&app, post("/api/imports/invoices", json!({"invoices": []}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
