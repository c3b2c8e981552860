//! Recording document repository.

use super::{Event, EventLog};
use async_trait::async_trait;
use catalog_assets::{DocumentRepository, ImageOwner};
use catalog_error::{CatalogResult, DocumentError, DocumentErrorKind};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory repository that logs each successful commit.
pub struct MockRepository<D> {
    documents: Mutex<HashMap<String, D>>,
    events: EventLog,
    fail_saves: AtomicBool,
}

impl<D: Clone> MockRepository<D> {
    /// Create an empty repository appending to `events`.
    pub fn new(events: EventLog) -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            events,
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Make every following save fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Stored copy of a document.
    pub fn get(&self, id: &str) -> Option<D> {
        self.documents
            .lock()
            .expect("documents poisoned")
            .get(id)
            .cloned()
    }
}

#[async_trait]
impl<D> DocumentRepository<D> for MockRepository<D>
where
    D: ImageOwner + Clone + 'static,
{
    async fn save(&self, document: &D) -> CatalogResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DocumentError::new(DocumentErrorKind::Persist(
                "injected save failure".to_string(),
            ))
            .into());
        }
        self.documents
            .lock()
            .expect("documents poisoned")
            .insert(document.id().to_string(), document.clone());
        self.events
            .lock()
            .expect("event log poisoned")
            .push(Event::Commit(document.id().to_string()));
        Ok(())
    }

    async fn delete(&self, id: &str) -> CatalogResult<Option<D>> {
        let removed = self.documents.lock().expect("documents poisoned").remove(id);
        if removed.is_some() {
            self.events
                .lock()
                .expect("event log poisoned")
                .push(Event::Commit(id.to_string()));
        }
        Ok(removed)
    }
}
