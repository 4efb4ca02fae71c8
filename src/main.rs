use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use casedesk::api::router;
use casedesk::assistant::Assistant;
use casedesk::backend::{AuthProvider, CaseRepository, GuestOnlyAuth, MemoryRepository, SupabaseClient, SupabaseConfig};
use casedesk::config::{AppConfig, DataSource};
use casedesk::db::SqliteStore;
use casedesk::sample::{sample_cases, sample_events};
use casedesk::services::{SessionReaper, SessionStore, seed_sample_data};
use casedesk::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "casedesk=debug,tower_http=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;

    let (repo, auth): (Arc<dyn CaseRepository>, Arc<dyn AuthProvider>) = match &config.data_source {
        DataSource::Sqlite { database_url } => {
            let store = SqliteStore::connect(database_url).await?;
            if config.seed_sample_data {
                seed_sample_data(&store, Utc::now()).await?;
            }
            let store = Arc::new(store);
            (store.clone() as Arc<dyn CaseRepository>, store as Arc<dyn AuthProvider>)
        }
        DataSource::Supabase => {
            let client = Arc::new(SupabaseClient::new(SupabaseConfig::new_from_env()?)?);
            (client.clone() as Arc<dyn CaseRepository>, client as Arc<dyn AuthProvider>)
        }
        DataSource::Memory => {
            let repo = if config.seed_sample_data {
                let now = Utc::now();
                MemoryRepository::with_records(sample_cases(now), sample_events(now))
            } else {
                MemoryRepository::new()
            };
            warn!("using in-memory store; records are lost on restart");
            (
                Arc::new(repo) as Arc<dyn CaseRepository>,
                Arc::new(GuestOnlyAuth) as Arc<dyn AuthProvider>,
            )
        }
    };

    let assistant = match &config.assistant_rules_path {
        Some(path) => Assistant::from_json_file(path)?,
        None => Assistant::default(),
    };

    let sessions = SessionStore::new(config.session_ttl).with_guest_limit(config.max_guest_sessions);
    let reaper = SessionReaper::new(sessions.clone(), config.session_reap_interval_secs);
    tokio::spawn(reaper.start());

    let state = AppState {
        repo,
        auth,
        sessions,
        assistant: Arc::new(assistant),
    };

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
