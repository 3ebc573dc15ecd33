//! Club onboarding service entry point.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use club_onboarding::adapters::ai::select_provider;
use club_onboarding::adapters::auth::StaticTokenValidator;
use club_onboarding::adapters::http::import::ImportHandlers;
use club_onboarding::adapters::http::onboarding::OnboardingHandlers;
use club_onboarding::adapters::http::api_router;
use club_onboarding::adapters::postgres::PostgresRecordStore;
use club_onboarding::adapters::stations::HttpStationDirectory;
use club_onboarding::adapters::storage::{InMemoryRecordStore, InMemorySessionRepository};
use club_onboarding::application::handlers::{
    CommitDraftHandler, GetConfigHandler, RunImportHandler, SendMessageHandler,
    StartOnboardingHandler,
};
use club_onboarding::application::{
    GenerationSettings, ProviderGateway, Reconciler, SessionStore, StationEnricher,
};
use club_onboarding::config::{AppConfig, DatabaseConfig};
use club_onboarding::ports::{RecordStore, StationDirectory};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let provider = select_provider(&config.ai)?;
    let gateway = Arc::new(ProviderGateway::new(
        provider,
        GenerationSettings {
            max_tokens: config.ai.max_tokens,
            temperature: config.ai.temperature,
        },
    ));

    let repository = Arc::new(InMemorySessionRepository::new(
        config.onboarding.session_ttl(),
    ));
    let sessions = Arc::new(SessionStore::new(repository, config.onboarding.debounce()));

    let enricher = Arc::new(match config.onboarding.stations_base_url.as_deref() {
        Some(url) if !url.is_empty() => {
            let directory: Arc<dyn StationDirectory> = Arc::new(HttpStationDirectory::new(
                url,
                config.onboarding.stations_timeout(),
            )?);
            StationEnricher::new(Some(directory), config.onboarding.station_limit)
        }
        _ => {
            info!("No station directory configured, opening turns carry no stations");
            StationEnricher::disabled()
        }
    });

    let store = record_store(&config.database).await?;
    let reconciler = Arc::new(Reconciler::new(
        store,
        config.import.deadlines(),
        config.import.balance_entry_type_code.clone(),
    ));

    let validator = Arc::new(StaticTokenValidator::from_entries(
        &config.auth.entries()?,
    )?);
    if validator.is_empty() {
        warn!("No static tokens configured, every API call will be rejected");
    }

    let onboarding = OnboardingHandlers::new(
        Arc::new(StartOnboardingHandler::new(
            sessions.clone(),
            gateway.clone(),
            enricher,
        )),
        Arc::new(SendMessageHandler::new(sessions.clone(), gateway)),
        Arc::new(GetConfigHandler::new(sessions.clone())),
        Arc::new(CommitDraftHandler::new(sessions.clone(), reconciler.clone())),
    );
    let imports = ImportHandlers::new(Arc::new(RunImportHandler::new(reconciler)));

    let shutdown = CancellationToken::new();
    spawn_eviction(
        sessions,
        config.onboarding.eviction_interval(),
        shutdown.clone(),
    );

    let app = api_router(onboarding, imports, validator)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, environment = ?config.server.environment, "Club onboarding service listening");

    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.cancel();
        }
    });

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .into_future();
    let grace = config.server.shutdown_grace();
    let drain_deadline = async {
        shutdown.cancelled().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        served = server => served?,
        _ = drain_deadline => {
            warn!(grace_secs = grace.as_secs(), "Requests still in flight after grace period, exiting");
        }
    }

    info!("Club onboarding service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Could not listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received, draining requests");
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .pretty()
            .init();
    }
}

async fn record_store(config: &DatabaseConfig) -> Result<Arc<dyn RecordStore>, BoxError> {
    let Some(url) = config.url() else {
        warn!("No database configured, imported records are kept in memory");
        return Ok(Arc::new(InMemoryRecordStore::new()));
    };

    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(url)
        .await?;

    let store = PostgresRecordStore::new(pool);
    if config.ensure_schema {
        store.ensure_schema().await?;
        info!("Record table ensured");
    }
    Ok(Arc::new(store))
}

fn spawn_eviction(sessions: Arc<SessionStore>, period: Duration, shutdown: CancellationToken) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }
            match sessions.evict_expired().await {
                Ok(0) => {}
                Ok(evicted) => info!(evicted, "Expired onboarding sessions evicted"),
                Err(e) => error!(error = %e, "Session eviction failed"),
            }
        }
    });
}
