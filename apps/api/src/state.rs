use std::sync::Arc;

use crate::config::Config;
use crate::external::{DocumentStore, IdGenerator, Notifier, ObjectStorage, TimelineStore};
use crate::registry::CustomBlockRegistry;
use crate::sync::SessionMap;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Collaborators are trait objects so backends swap without touching
/// handler or engine code; the in-memory set is the default wiring.
#[derive(Clone)]
pub struct AppState {
    #[allow(dead_code)]
    pub config: Config,
    pub timeline: Arc<dyn TimelineStore>,
    pub store: Arc<dyn DocumentStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub notifier: Arc<dyn Notifier>,
    pub ids: Arc<dyn IdGenerator>,
    /// Process-wide registry of user-defined section kinds.
    pub blocks: Arc<CustomBlockRegistry>,
    /// Open editor sessions, one per document.
    pub sessions: Arc<SessionMap>,
}
