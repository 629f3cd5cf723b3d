//! Debounce scheduler: one timer slot per key.
//!
//! `arm` (re)starts a key's timer; the previous pending timer for that key
//! is aborted, so only the callback armed last ever fires ("settle then
//! commit"). Keys are independent: arming one never delays another.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Default)]
pub struct DebounceScheduler {
    slots: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl DebounceScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms (or re-arms) the timer for `key`. After `delay` of quiet,
    /// `callback` runs once on the runtime.
    pub async fn arm<F>(&self, key: &str, delay: Duration, callback: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback.await;
        });
        if let Some(previous) = self.slots.lock().await.insert(key.to_string(), handle) {
            previous.abort();
        }
    }

    /// Cancels a pending timer without running its callback. Cancelling a
    /// key that is not armed (or already fired) is a no-op.
    pub async fn cancel(&self, key: &str) {
        if let Some(handle) = self.slots.lock().await.remove(key) {
            handle.abort();
        }
    }

    /// Cancels every pending timer. Buffered-but-uncommitted work behind
    /// those timers is dropped, which is the documented close semantics.
    pub async fn cancel_all(&self) {
        for (_, handle) in self.slots.lock().await.drain() {
            handle.abort();
        }
    }
}
