//! In-memory collaborator backends.
//!
//! These are the server's default wiring (the persistence engine proper is
//! out of scope) and the fixtures the engine tests run against.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::external::{DocumentStore, ObjectStorage, ProgressFn, TimelineStore};
use crate::models::document::ResumeDocument;

/// Timeline records held in a map keyed by (domain, owner).
#[derive(Default)]
pub struct InMemoryTimelineStore {
    records: Mutex<HashMap<(String, Uuid), Vec<Value>>>,
}

impl InMemoryTimelineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, domain: &str, owner_id: Uuid, records: Vec<Value>) {
        self.records
            .lock()
            .expect("timeline store lock poisoned")
            .insert((domain.to_string(), owner_id), records);
    }
}

#[async_trait]
impl TimelineStore for InMemoryTimelineStore {
    async fn list(&self, domain: &str, owner_id: Uuid) -> Result<Vec<Value>, AppError> {
        let records = self
            .records
            .lock()
            .expect("timeline store lock poisoned")
            .get(&(domain.to_string(), owner_id))
            .cloned()
            .unwrap_or_default();
        Ok(records)
    }
}

/// Document store over a plain map. `create` assigns identity and timestamps,
/// exactly the contract the engine relies on.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    docs: Mutex<HashMap<Uuid, ResumeDocument>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self, id: Uuid) -> Result<ResumeDocument, AppError> {
        self.docs
            .lock()
            .expect("document store lock poisoned")
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("resume {id}")))
    }

    async fn save(&self, id: Uuid, doc: &ResumeDocument) -> Result<(), AppError> {
        let mut docs = self.docs.lock().expect("document store lock poisoned");
        if !docs.contains_key(&id) {
            return Err(AppError::NotFound(format!("resume {id}")));
        }
        let mut stored = doc.clone();
        stored.id = Some(id);
        stored.updated_at = Some(Utc::now());
        docs.insert(id, stored);
        Ok(())
    }

    async fn create(&self, mut doc: ResumeDocument) -> Result<ResumeDocument, AppError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        doc.id = Some(id);
        doc.created_at = Some(now);
        doc.updated_at = Some(now);
        self.docs
            .lock()
            .expect("document store lock poisoned")
            .insert(id, doc.clone());
        Ok(doc)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.docs
            .lock()
            .expect("document store lock poisoned")
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("resume {id}")))
    }

    async fn list(&self) -> Result<Vec<ResumeDocument>, AppError> {
        let mut docs: Vec<ResumeDocument> = self
            .docs
            .lock()
            .expect("document store lock poisoned")
            .values()
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(docs)
    }
}

/// Object storage that keeps blobs in memory and hands back `mem://` URLs.
/// Reports a single completed progress tick, since the write is atomic.
#[derive(Default)]
pub struct InMemoryObjectStorage {
    blobs: Mutex<HashMap<String, Bytes>>,
}

impl InMemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(
        &self,
        data: Bytes,
        directory: &str,
        progress: Option<ProgressFn>,
    ) -> Result<String, AppError> {
        let total = data.len() as u64;
        let url = format!("mem://{}/{}", directory.trim_matches('/'), Uuid::new_v4());
        self.blobs
            .lock()
            .expect("object storage lock poisoned")
            .insert(url.clone(), data);
        if let Some(progress) = progress {
            progress(total, total);
        }
        Ok(url)
    }
}
