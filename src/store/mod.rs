//! In-memory mock persistence.
//!
//! Components are stored by an opaque 9-character id. Each operation locks
//! the map once, so single-key updates are atomic; there is no durability.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use thiserror::Error;

use crate::utils::{date::DateTimeUtc, hash};

/// Length of generated component ids.
const ID_LEN: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("component `{0}` not found")]
    NotFound(String),

    #[error("store unavailable")]
    Unavailable,
}

/// A stored component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub code: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Saved {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileSaved {
    pub success: bool,
}

#[derive(Debug, Default)]
pub struct MockStore {
    components: Mutex<FxHashMap<String, Record>>,
    /// File name → last content handed to `save_file_content`
    files: Mutex<FxHashMap<String, String>>,
    counter: AtomicU64,
    offline: AtomicBool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with `Unavailable` (for exercising error paths).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }

    fn next_id(&self, code: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let seed = format!("{n}:{}:{code}", DateTimeUtc::now().to_rfc3339());
        hash::short_hex(&seed, ID_LEN)
    }

    pub fn save_component(&self, code: &str) -> Result<Saved, StoreError> {
        self.check()?;
        let id = self.next_id(code);
        let now = DateTimeUtc::now().to_rfc3339();
        let record = Record {
            id: id.clone(),
            code: code.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.components.lock().insert(id.clone(), record);
        crate::debug!("store"; "saved component {}", id);
        Ok(Saved { id })
    }

    pub fn get_component(&self, id: &str) -> Result<Record, StoreError> {
        self.check()?;
        self.components
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn update_component(&self, id: &str, code: &str) -> Result<Record, StoreError> {
        self.check()?;
        let mut components = self.components.lock();
        let record = components
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.code = code.to_string();
        record.updated_at = DateTimeUtc::now().to_rfc3339();
        Ok(record.clone())
    }

    pub fn save_file_content(&self, name: &str, content: &str) -> Result<FileSaved, StoreError> {
        self.check()?;
        crate::debug!("store"; "file {} ({} bytes)", name, content.len());
        self.files.lock().insert(name.to_string(), content.to_string());
        Ok(FileSaved { success: true })
    }

    /// Last content saved under `name`.
    pub fn file_content(&self, name: &str) -> Option<String> {
        self.files.lock().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.components.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_get() {
        let store = MockStore::new();
        let Saved { id } = store.save_component("code").unwrap();
        assert_eq!(id.len(), ID_LEN);

        let record = store.get_component(&id).unwrap();
        assert_eq!(record.code, "code");
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_ids_unique() {
        let store = MockStore::new();
        let a = store.save_component("same").unwrap();
        let b = store.save_component("same").unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_update_missing() {
        let store = MockStore::new();
        assert_eq!(
            store.update_component("nope", "x"),
            Err(StoreError::NotFound("nope".into()))
        );
        assert!(matches!(store.get_component("nope"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_update_keeps_created() {
        let store = MockStore::new();
        let Saved { id } = store.save_component("v1").unwrap();
        let created = store.get_component(&id).unwrap().created_at;
        let updated = store.update_component(&id, "v2").unwrap();
        assert_eq!(updated.code, "v2");
        assert_eq!(updated.created_at, created);
    }

    #[test]
    fn test_offline() {
        let store = MockStore::new();
        store.set_offline(true);
        assert_eq!(store.save_component("x"), Err(StoreError::Unavailable));
        store.set_offline(false);
        assert_eq!(store.save_file_content("a.tsx", "x"), Ok(FileSaved { success: true }));
        assert_eq!(store.file_content("a.tsx").as_deref(), Some("x"));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let store = MockStore::new();
        let Saved { id } = store.save_component("c").unwrap();
        let json = serde_json::to_string(&store.get_component(&id).unwrap()).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
    }
}
