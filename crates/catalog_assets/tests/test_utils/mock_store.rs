//! Recording object store.

use async_trait::async_trait;
use catalog_error::{CatalogResult, StorageError, StorageErrorKind};
use catalog_storage::{AssetKeyCodec, ObjectPath, ObjectStore, StoredObject};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Base URL of every reference the mock issues.
pub const MOCK_BASE_URL: &str = "https://store.test/v0/b/shop/o";

/// One observable call, in the order it completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Object written (`folder/key`)
    Stored(String),
    /// Object removed (`folder/key`)
    Deleted(String),
    /// Delete called for a path holding nothing (`folder/key`)
    DeleteMissing(String),
    /// Document committed (`id`)
    Commit(String),
}

/// Call log shared between the store and repository doubles.
pub type EventLog = Arc<Mutex<Vec<Event>>>;

/// In-memory store that records every call.
///
/// Uploads can be given an artificial latency, or made to fail on store or
/// delete. Both are selected by upload name, i.e. the key prefix in front of
/// the generated `-{uuid}-{millis}.jpg` suffix.
pub struct MockStore {
    codec: AssetKeyCodec,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    events: EventLog,
    delays: HashMap<String, Duration>,
    fail_store: HashSet<String>,
    fail_delete: HashSet<String>,
}

impl MockStore {
    /// Create an empty store with its own event log.
    pub fn new() -> Self {
        Self::with_log(Arc::new(Mutex::new(Vec::new())))
    }

    /// Create an empty store appending to `events`.
    pub fn with_log(events: EventLog) -> Self {
        Self {
            codec: AssetKeyCodec::new(MOCK_BASE_URL, "uploads"),
            objects: Mutex::new(HashMap::new()),
            events,
            delays: HashMap::new(),
            fail_store: HashSet::new(),
            fail_delete: HashSet::new(),
        }
    }

    /// Delay uploads named `name` by `delay`.
    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    /// Make uploads named `name` fail.
    pub fn failing_store(mut self, name: &str) -> Self {
        self.fail_store.insert(name.to_string());
        self
    }

    /// Make deletes of objects named `name` fail with a non-"not found" error.
    pub fn failing_delete(mut self, name: &str) -> Self {
        self.fail_delete.insert(name.to_string());
        self
    }

    /// Upload name a generated `folder/key` path was built from.
    pub fn name_of(path: &str) -> String {
        let key = path.rsplit('/').next().unwrap_or(path);
        let stem = key.strip_suffix(".jpg").unwrap_or(key);
        // uuid (5 dash-separated groups) + millis
        stem.rsplitn(7, '-').last().unwrap_or(stem).to_string()
    }

    /// Paths of stored objects in `folder` whose upload name is `name`.
    pub fn paths_named(&self, folder: &str, name: &str) -> Vec<String> {
        let mut paths: Vec<String> = self
            .objects
            .lock()
            .expect("objects poisoned")
            .keys()
            .filter(|path| path.starts_with(&format!("{}/", folder)) && Self::name_of(path) == name)
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    /// Whether an object named `name` exists in `folder`.
    pub fn has_named(&self, folder: &str, name: &str) -> bool {
        !self.paths_named(folder, name).is_empty()
    }

    /// Shared call log.
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("event log poisoned").clone()
    }

    /// Number of objects currently held.
    pub fn object_count(&self) -> usize {
        self.objects.lock().expect("objects poisoned").len()
    }

    /// Bytes stored at `folder/key`.
    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.lock().expect("objects poisoned").get(path).cloned()
    }

    /// Number of store calls that completed.
    pub fn store_calls(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::Stored(_)))
            .count()
    }

    /// Number of delete calls, whether or not the object existed.
    pub fn delete_calls(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::Deleted(_) | Event::DeleteMissing(_)))
            .count()
    }

    fn record(&self, event: Event) {
        self.events.lock().expect("event log poisoned").push(event);
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn store(
        &self,
        path: &ObjectPath,
        data: &[u8],
        content_type: &str,
    ) -> CatalogResult<StoredObject> {
        let name = Self::name_of(&path.to_string());
        if let Some(delay) = self.delays.get(&name) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_store.contains(&name) {
            return Err(StorageError::new(StorageErrorKind::Unavailable(format!(
                "injected upload failure for {}",
                path
            )))
            .into());
        }

        self.objects
            .lock()
            .expect("objects poisoned")
            .insert(path.to_string(), data.to_vec());
        self.record(Event::Stored(path.to_string()));
        Ok(StoredObject::describe(
            path.clone(),
            data,
            content_type,
            Some(format!("token-{}", path.key())),
        ))
    }

    async fn delete(&self, path: &ObjectPath) -> CatalogResult<()> {
        if self.fail_delete.contains(&Self::name_of(&path.to_string())) {
            return Err(StorageError::new(StorageErrorKind::PermissionDenied(format!(
                "injected delete failure for {}",
                path
            )))
            .into());
        }

        let removed = self
            .objects
            .lock()
            .expect("objects poisoned")
            .remove(&path.to_string());
        match removed {
            Some(_) => {
                self.record(Event::Deleted(path.to_string()));
                Ok(())
            }
            None => {
                self.record(Event::DeleteMissing(path.to_string()));
                Err(StorageError::new(StorageErrorKind::NotFound(path.to_string())).into())
            }
        }
    }

    fn codec(&self) -> &AssetKeyCodec {
        &self.codec
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
