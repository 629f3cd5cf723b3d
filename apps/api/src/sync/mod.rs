//! Edit-sync engine: local buffers, debounce, canonical state and autosave.
//!
//! The canonical `ResumeDocument` is a single shared structure. Its only
//! writers are the debounced section commit ([`session::EditorSession`])
//! and explicit bulk replace on load. Persistence runs through the
//! autosave loop ([`autosave`]) with deep-equality dirty detection.

pub mod autosave;
pub mod scheduler;
pub mod session;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::errors::AppError;
use crate::external::{DocumentStore, Notifier};
use crate::models::document::ResumeDocument;
use crate::models::section::SectionSlot;
use crate::sync::autosave::SaveOutcome;
use crate::sync::session::EditorSession;

/// Canonical state of one open document plus its save bookkeeping.
pub struct DocumentState {
    id: Uuid,
    doc: RwLock<ResumeDocument>,
    /// Snapshot of the last successful save; the dirty check compares
    /// against this by deep equality.
    last_saved: Mutex<ResumeDocument>,
    save_in_flight: AtomicBool,
}

impl DocumentState {
    pub fn new(id: Uuid, doc: ResumeDocument) -> Self {
        DocumentState {
            id,
            last_saved: Mutex::new(doc.clone()),
            doc: RwLock::new(doc),
            save_in_flight: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn snapshot(&self) -> ResumeDocument {
        self.doc.read().await.clone()
    }

    /// Bulk replace on load, the one canonical writer besides the
    /// debounced section commit. The document keeps its identity.
    pub async fn replace(&self, mut doc: ResumeDocument) {
        doc.id = Some(self.id);
        *self.doc.write().await = doc;
    }

    pub async fn section_value(&self, slot: SectionSlot) -> Value {
        self.doc.read().await.section_value(slot)
    }

    /// Replaces one section slot wholesale. A shape mismatch comes back as
    /// a `Validation` error; the document is untouched in that case.
    pub async fn replace_section(&self, slot: SectionSlot, value: Value) -> Result<(), AppError> {
        self.doc
            .write()
            .await
            .replace_section_value(slot, value)
            .map_err(|e| {
                AppError::Validation(format!("section '{slot}' has an unexpected shape: {e}"))
            })
    }

    pub async fn is_dirty(&self) -> bool {
        *self.doc.read().await != *self.last_saved.lock().await
    }

    pub async fn mark_saved(&self, snapshot: ResumeDocument) {
        *self.last_saved.lock().await = snapshot;
    }

    /// Claims the save slot. Returns false when a save is already in
    /// flight; the caller drops its request rather than queueing.
    pub fn begin_save(&self) -> bool {
        !self.save_in_flight.swap(true, Ordering::SeqCst)
    }

    pub fn end_save(&self) {
        self.save_in_flight.store(false, Ordering::SeqCst);
    }
}

struct SessionEntry {
    session: Arc<EditorSession>,
    state: Arc<DocumentState>,
    autosave: JoinHandle<()>,
}

/// Registry of open editor sessions, one per document. Owned by the
/// application shell (`AppState`), never a global, so tests can build
/// isolated instances.
pub struct SessionMap {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
    debounce: Duration,
    autosave_every: Duration,
    inner: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl SessionMap {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
        debounce: Duration,
        autosave_every: Duration,
    ) -> Self {
        SessionMap {
            store,
            notifier,
            debounce,
            autosave_every,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the open session for `id`, loading the document and
    /// starting its autosave loop on first access.
    pub async fn open(&self, id: Uuid) -> Result<Arc<EditorSession>, AppError> {
        if let Some(entry) = self.inner.lock().await.get(&id) {
            return Ok(Arc::clone(&entry.session));
        }

        // Load outside the map lock so one slow backend load never stalls
        // session operations on other documents.
        let doc = self.store.load(id).await?;

        let mut inner = self.inner.lock().await;
        // A racing open may have inserted while we were loading.
        if let Some(entry) = inner.get(&id) {
            return Ok(Arc::clone(&entry.session));
        }
        let state = Arc::new(DocumentState::new(id, doc));
        let session = EditorSession::new(
            Arc::clone(&state),
            Arc::clone(&self.notifier),
            self.debounce,
        );
        let autosave = autosave::spawn_autosave(
            Arc::clone(&state),
            Arc::clone(&self.store),
            Arc::clone(&self.notifier),
            self.autosave_every,
        );
        inner.insert(
            id,
            SessionEntry {
                session: Arc::clone(&session),
                state,
                autosave,
            },
        );
        Ok(session)
    }

    pub async fn state(&self, id: Uuid) -> Option<Arc<DocumentState>> {
        self.inner.lock().await.get(&id).map(|e| Arc::clone(&e.state))
    }

    /// Bulk-replaces canonical state from a freshly loaded document.
    /// Pending buffers and timers are dropped so editing surfaces re-seed
    /// from the new state.
    pub async fn replace(&self, id: Uuid, doc: ResumeDocument) -> bool {
        let entry = {
            let inner = self.inner.lock().await;
            inner
                .get(&id)
                .map(|e| (Arc::clone(&e.session), Arc::clone(&e.state)))
        };
        match entry {
            Some((session, state)) => {
                session.reset().await;
                state.replace(doc).await;
                true
            }
            None => false,
        }
    }

    /// Best-effort save of one open document (window-close and explicit
    /// flush path). A no-op `Clean` when the document is not open or not
    /// dirty.
    pub async fn flush(&self, id: Uuid) -> SaveOutcome {
        match self.state(id).await {
            Some(state) => {
                autosave::save_if_dirty(&state, self.store.as_ref(), self.notifier.as_ref()).await
            }
            None => SaveOutcome::Clean,
        }
    }

    /// Closes a document's editing surface: pending debounce timers are
    /// cancelled without flushing, the autosave loop stops, and when
    /// `flush` is set a final best-effort save of canonical state runs.
    pub async fn close(&self, id: Uuid, flush: bool) {
        let entry = self.inner.lock().await.remove(&id);
        let Some(entry) = entry else {
            return;
        };
        entry.session.close().await;
        entry.autosave.abort();
        let _ = entry.autosave.await;
        // A loop cancelled mid-save leaves the in-flight guard claimed;
        // the final flush below must be able to take it.
        entry.state.end_save();
        if flush {
            autosave::save_if_dirty(&entry.state, self.store.as_ref(), self.notifier.as_ref())
                .await;
        }
    }
}
