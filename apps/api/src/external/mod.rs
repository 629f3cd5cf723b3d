//! Collaborator seams: everything the engine depends on but does not own.
//!
//! Each collaborator is an object-safe trait carried in `AppState` as
//! `Arc<dyn …>`, so backends swap without touching handler or engine code.
//! The in-memory implementations in [`memory`] are the server default and
//! double as test fixtures.

pub mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::ResumeDocument;

/// Raw timeline records, owner-scoped, keyed by domain ("education",
/// "work", …). The importer copies these; it never mutates the store.
#[async_trait]
pub trait TimelineStore: Send + Sync {
    async fn list(&self, domain: &str, owner_id: Uuid) -> Result<Vec<Value>, AppError>;
}

/// The document persistence collaborator. All operations are owner-scoped
/// on the far side; the engine never checks ownership itself.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<ResumeDocument, AppError>;
    async fn save(&self, id: Uuid, doc: &ResumeDocument) -> Result<(), AppError>;
    /// Assigns identity and timestamps; returns the stored document.
    async fn create(&self, doc: ResumeDocument) -> Result<ResumeDocument, AppError>;
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
    async fn list(&self) -> Result<Vec<ResumeDocument>, AppError>;
}

/// Upload progress callback: (bytes_sent, bytes_total).
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Object storage for photos/avatars/thumbnails. Returned URLs are opaque
/// strings; the engine stores and forwards them without interpretation.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(
        &self,
        data: Bytes,
        directory: &str,
        progress: Option<ProgressFn>,
    ) -> Result<String, AppError>;
}

/// User-facing toasts. Fire-and-forget; the engine never consumes a result,
/// so a sink failure can never break a sync cycle.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn failure(&self, message: &str);
}

/// Globally-unique ids for new section items, custom fields and blocks.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// Default generator: random v4 UUIDs.
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Notifier backend that routes toasts into the tracing pipeline.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(toast = "success", "{message}");
    }

    fn failure(&self, message: &str) {
        tracing::warn!(toast = "failure", "{message}");
    }
}
