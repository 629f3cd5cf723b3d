mod config;
mod errors;
mod external;
mod import;
mod models;
mod registry;
mod reorder;
mod routes;
mod state;
mod sync;
mod template;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::external::memory::{
    InMemoryDocumentStore, InMemoryObjectStorage, InMemoryTimelineStore,
};
use crate::external::{TracingNotifier, UuidGenerator};
use crate::registry::CustomBlockRegistry;
use crate::routes::build_router;
use crate::state::AppState;
use crate::sync::SessionMap;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume engine API v{}", env!("CARGO_PKG_VERSION"));

    // Collaborators. In-memory backends are the default wiring; a real
    // deployment swaps these trait objects for persistent implementations.
    let timeline = Arc::new(InMemoryTimelineStore::new());
    let store = Arc::new(InMemoryDocumentStore::new());
    let storage = Arc::new(InMemoryObjectStorage::new());
    let notifier = Arc::new(TracingNotifier);
    let ids = Arc::new(UuidGenerator);
    info!("Collaborator backends initialized (in-memory)");

    let sessions = Arc::new(SessionMap::new(
        store.clone(),
        notifier.clone(),
        Duration::from_millis(config.debounce_ms),
        Duration::from_secs(config.autosave_interval_secs),
    ));
    info!(
        debounce_ms = config.debounce_ms,
        autosave_secs = config.autosave_interval_secs,
        "Edit-sync engine configured"
    );

    let state = AppState {
        config: config.clone(),
        timeline,
        store,
        storage,
        notifier,
        ids,
        blocks: Arc::new(CustomBlockRegistry::new()),
        sessions,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
