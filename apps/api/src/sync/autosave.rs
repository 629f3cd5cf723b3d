//! Document autosave: a periodic, dirty-gated, serialized persistence loop.
//!
//! Every tick compares canonical state against the last-saved snapshot by
//! deep equality and saves only when they differ. A save request issued
//! while one is outstanding is dropped, not queued; the next dirty-driven
//! tick retries with the latest state. A failed save leaves the dirty state
//! untouched (the snapshot is not refreshed) and surfaces only as a
//! notification, never as an error inside the loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::external::{DocumentStore, Notifier};
use crate::sync::DocumentState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing to do: canonical state matches the last-saved snapshot.
    Clean,
    Saved,
    /// Dropped because another save was in flight.
    Skipped,
    Failed,
}

/// One save attempt: dirty check, in-flight guard, persist, snapshot refresh.
pub async fn save_if_dirty(
    state: &DocumentState,
    store: &dyn DocumentStore,
    notifier: &dyn Notifier,
) -> SaveOutcome {
    if !state.is_dirty().await {
        return SaveOutcome::Clean;
    }
    if !state.begin_save() {
        return SaveOutcome::Skipped;
    }

    let snapshot = state.snapshot().await;
    let outcome = match store.save(state.id(), &snapshot).await {
        Ok(()) => {
            state.mark_saved(snapshot).await;
            debug!(doc = %state.id(), "autosave persisted");
            SaveOutcome::Saved
        }
        Err(e) => {
            warn!(doc = %state.id(), error = %e, "autosave failed; will retry on next tick");
            notifier.failure("Saving failed; your edits are kept and will be retried");
            SaveOutcome::Failed
        }
    };
    state.end_save();
    outcome
}

/// Spawns the per-document autosave loop. The returned handle is aborted
/// when the document's session closes.
pub fn spawn_autosave(
    state: Arc<DocumentState>,
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick of a tokio interval completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            save_if_dirty(&state, store.as_ref(), notifier.as_ref()).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::external::memory::InMemoryDocumentStore;
    use crate::models::document::ResumeDocument;
    use crate::models::section::SectionSlot;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use uuid::Uuid;

    struct RecordingNotifier {
        failures: StdMutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            RecordingNotifier {
                failures: StdMutex::new(Vec::new()),
            }
        }
        fn failure_count(&self) -> usize {
            self.failures.lock().unwrap().len()
        }
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, _message: &str) {}
        fn failure(&self, message: &str) {
            self.failures.lock().unwrap().push(message.to_string());
        }
    }

    /// Store whose saves fail while the switch is on.
    struct FlakyStore {
        inner: InMemoryDocumentStore,
        failing: AtomicBool,
        saves: AtomicUsize,
    }

    impl FlakyStore {
        fn new() -> Self {
            FlakyStore {
                inner: InMemoryDocumentStore::new(),
                failing: AtomicBool::new(false),
                saves: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl DocumentStore for FlakyStore {
        async fn load(&self, id: Uuid) -> Result<ResumeDocument, AppError> {
            self.inner.load(id).await
        }
        async fn save(&self, id: Uuid, doc: &ResumeDocument) -> Result<(), AppError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::Storage("injected failure".to_string()));
            }
            self.inner.save(id, doc).await
        }
        async fn create(&self, doc: ResumeDocument) -> Result<ResumeDocument, AppError> {
            self.inner.create(doc).await
        }
        async fn delete(&self, id: Uuid) -> Result<(), AppError> {
            self.inner.delete(id).await
        }
        async fn list(&self) -> Result<Vec<ResumeDocument>, AppError> {
            self.inner.list().await
        }
    }

    /// Store whose save blocks until released, for in-flight coalescing tests.
    struct SlowStore {
        inner: InMemoryDocumentStore,
        release: tokio::sync::Notify,
    }

    impl SlowStore {
        fn new() -> Self {
            SlowStore {
                inner: InMemoryDocumentStore::new(),
                release: tokio::sync::Notify::new(),
            }
        }
    }

    #[async_trait]
    impl DocumentStore for SlowStore {
        async fn load(&self, id: Uuid) -> Result<ResumeDocument, AppError> {
            self.inner.load(id).await
        }
        async fn save(&self, id: Uuid, doc: &ResumeDocument) -> Result<(), AppError> {
            self.release.notified().await;
            self.inner.save(id, doc).await
        }
        async fn create(&self, doc: ResumeDocument) -> Result<ResumeDocument, AppError> {
            self.inner.create(doc).await
        }
        async fn delete(&self, id: Uuid) -> Result<(), AppError> {
            self.inner.delete(id).await
        }
        async fn list(&self) -> Result<Vec<ResumeDocument>, AppError> {
            self.inner.list().await
        }
    }

    async fn dirty_state(store: &dyn DocumentStore) -> Arc<DocumentState> {
        let doc = store.create(ResumeDocument::new("r")).await.unwrap();
        let id = doc.id.unwrap();
        let state = Arc::new(DocumentState::new(id, doc));
        state
            .replace_section(
                SectionSlot::Hobby,
                json!({
                    "sectionConfig": { "title": "Hobbies", "isShow": true },
                    "items": [{ "id": Uuid::new_v4(), "name": "chess" }]
                }),
            )
            .await
            .unwrap();
        state
    }

    #[tokio::test]
    async fn test_clean_document_does_not_save() {
        let store = InMemoryDocumentStore::new();
        let doc = store.create(ResumeDocument::new("r")).await.unwrap();
        let state = DocumentState::new(doc.id.unwrap(), doc);
        let notifier = RecordingNotifier::new();

        let outcome = save_if_dirty(&state, &store, &notifier).await;
        assert_eq!(outcome, SaveOutcome::Clean);
    }

    #[tokio::test]
    async fn test_save_then_immediate_resave_is_clean() {
        let store = FlakyStore::new();
        let state = dirty_state(&store).await;
        let notifier = RecordingNotifier::new();

        assert_eq!(save_if_dirty(&state, &store, &notifier).await, SaveOutcome::Saved);
        // Dirty check is reflexive: no redundant save fires.
        assert_eq!(save_if_dirty(&state, &store, &notifier).await, SaveOutcome::Clean);
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_save_stays_dirty_and_retries() {
        let store = FlakyStore::new();
        let state = dirty_state(&store).await;
        let notifier = RecordingNotifier::new();

        store.failing.store(true, Ordering::SeqCst);
        assert_eq!(save_if_dirty(&state, &store, &notifier).await, SaveOutcome::Failed);
        assert_eq!(notifier.failure_count(), 1);
        assert!(state.is_dirty().await, "failed save must not refresh the snapshot");

        store.failing.store(false, Ordering::SeqCst);
        assert_eq!(save_if_dirty(&state, &store, &notifier).await, SaveOutcome::Saved);
        assert!(!state.is_dirty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_save_request_is_dropped() {
        let store = Arc::new(SlowStore::new());
        let state = dirty_state(store.as_ref()).await;
        let notifier = Arc::new(RecordingNotifier::new());

        let first = {
            let state = Arc::clone(&state);
            let store = Arc::clone(&store);
            let notifier = Arc::clone(&notifier);
            tokio::spawn(async move {
                save_if_dirty(&state, store.as_ref(), notifier.as_ref()).await
            })
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        // Second request while the first is blocked inside the store.
        let second = save_if_dirty(&state, store.as_ref(), notifier.as_ref()).await;
        assert_eq!(second, SaveOutcome::Skipped);

        store.release.notify_one();
        assert_eq!(first.await.unwrap(), SaveOutcome::Saved);
        assert!(!state.is_dirty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autosave_loop_waits_a_full_interval() {
        let store = Arc::new(FlakyStore::new());
        let state = dirty_state(store.as_ref()).await;
        let notifier: Arc<dyn Notifier> = Arc::new(RecordingNotifier::new());

        let store_dyn: Arc<dyn DocumentStore> = store.clone();
        let handle = spawn_autosave(Arc::clone(&state), store_dyn, notifier, Duration::from_secs(30));
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        tokio::time::advance(Duration::from_secs(29)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(store.saves.load(Ordering::SeqCst), 0, "no save before the interval");

        tokio::time::advance(Duration::from_secs(2)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        assert!(!state.is_dirty().await);

        handle.abort();
    }
}
