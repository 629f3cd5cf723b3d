//! Per-document editor session: the local edit buffers and their debounced
//! reconciliation into the canonical document.
//!
//! Each section slot owns at most one buffer at a time. An `update` merges a
//! partial shallowly into that slot's buffer and re-arms the slot's debounce
//! timer; when the timer fires, the buffer as of that moment replaces the
//! canonical section wholesale. Last writer wins; there is no version check
//! against canonical divergence (revisit if multi-editor concurrency ever
//! becomes a requirement).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::external::Notifier;
use crate::models::section::SectionSlot;
use crate::sync::scheduler::DebounceScheduler;
use crate::sync::DocumentState;

/// Merges `partial`'s top-level keys into `target`, replacing values
/// wholesale. Deliberately not deep: a nested object such as
/// `sectionConfig` clobbers the previous one, so callers must spread
/// sibling keys themselves.
pub fn merge_shallow(target: &mut Value, partial: &Value) {
    match (target, partial) {
        (Value::Object(target), Value::Object(partial)) => {
            for (key, value) in partial {
                target.insert(key.clone(), value.clone());
            }
        }
        (target, partial) => *target = partial.clone(),
    }
}

type SectionBuffers = Arc<Mutex<HashMap<SectionSlot, Value>>>;

pub struct EditorSession {
    state: Arc<DocumentState>,
    notifier: Arc<dyn Notifier>,
    debounce: Duration,
    buffers: SectionBuffers,
    scheduler: DebounceScheduler,
}

impl EditorSession {
    pub fn new(
        state: Arc<DocumentState>,
        notifier: Arc<dyn Notifier>,
        debounce: Duration,
    ) -> Arc<Self> {
        Arc::new(EditorSession {
            state,
            notifier,
            debounce,
            buffers: Arc::new(Mutex::new(HashMap::new())),
            scheduler: DebounceScheduler::new(),
        })
    }

    pub fn doc_id(&self) -> Uuid {
        self.state.id()
    }

    /// Merges a partial section update into the slot's local buffer and
    /// (re)arms the slot's debounce timer. Rapid updates within one window
    /// coalesce: only the final buffer state is ever committed.
    pub async fn update(&self, slot: SectionSlot, partial: Value) -> Result<(), AppError> {
        if !partial.is_object() {
            return Err(AppError::Validation(format!(
                "section update for '{slot}' must be a JSON object"
            )));
        }

        {
            let mut buffers = self.buffers.lock().await;
            if !buffers.contains_key(&slot) {
                // First edit since the last commit: seed the buffer from
                // the canonical section.
                let seed = self.state.section_value(slot).await;
                buffers.insert(slot, seed);
            }
            if let Some(buffer) = buffers.get_mut(&slot) {
                merge_shallow(buffer, &partial);
            }
        }

        let state = Arc::clone(&self.state);
        let notifier = Arc::clone(&self.notifier);
        let buffers = Arc::clone(&self.buffers);
        self.scheduler
            .arm(slot.as_str(), self.debounce, async move {
                commit(state, notifier, buffers, slot).await;
            })
            .await;
        Ok(())
    }

    /// The slot as the editing surface currently sees it: the local buffer
    /// when one is pending, otherwise the canonical section.
    pub async fn section_value(&self, slot: SectionSlot) -> Value {
        if let Some(buffer) = self.buffers.lock().await.get(&slot) {
            return buffer.clone();
        }
        self.state.section_value(slot).await
    }

    /// Drops all local buffers and pending timers. Used when canonical
    /// state is replaced from outside (fresh load), so surfaces re-seed
    /// from the new document.
    pub async fn reset(&self) {
        self.scheduler.cancel_all().await;
        self.buffers.lock().await.clear();
    }

    /// Closes the editing surface: pending debounce timers are cancelled
    /// without flushing. Any buffered-but-uncommitted edit inside the
    /// window is lost, which is the documented close semantics.
    pub async fn close(&self) {
        self.scheduler.cancel_all().await;
    }
}

/// Debounce-fire path. Failures are absorbed into a notification and the
/// buffer is retained, so no user input is ever lost and the next update
/// cycle retries naturally.
async fn commit(
    state: Arc<DocumentState>,
    notifier: Arc<dyn Notifier>,
    buffers: SectionBuffers,
    slot: SectionSlot,
) {
    let buffer = buffers.lock().await.get(&slot).cloned();
    let Some(value) = buffer else {
        return;
    };

    match state.replace_section(slot, value.clone()).await {
        Ok(()) => {
            clear_committed(&mut *buffers.lock().await, slot, &value);
            debug!(doc = %state.id(), section = %slot, "section committed");
        }
        Err(e) => {
            warn!(doc = %state.id(), section = %slot, error = %e, "section commit failed");
            notifier.failure("Couldn't apply your latest change; it is kept locally");
        }
    }
}

/// Removes the slot's buffer only when it still holds exactly what was
/// committed. A merge that landed while the commit was in flight stays
/// buffered for the next window instead of being silently dropped.
fn clear_committed(buffers: &mut HashMap<SectionSlot, Value>, slot: SectionSlot, committed: &Value) {
    if buffers.get(&slot) == Some(committed) {
        buffers.remove(&slot);
    }
}
