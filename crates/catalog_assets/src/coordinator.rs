//! Asset lifecycle coordinator.
//!
//! Sequences transcode -> store -> URL for new files, and URL -> key -> delete
//! for superseded ones. The one hard rule: a superseded asset is never deleted
//! until the document no longer referencing it has been committed. Cleanup
//! failures after that point are reported, never propagated.

use crate::{AssetsConfig, ImageTranscoder, ImageUpload};
use catalog_error::{CatalogResult, CleanupError, CleanupErrorKind};
use catalog_storage::{AssetFolder, ObjectPath, ObjectStore};
use derive_getters::Getters;
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Result of deleting one reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteOutcome {
    /// Object existed and was removed
    Deleted,
    /// Object was already gone
    AlreadyAbsent,
    /// Reference was not issued by this store (or belongs to another folder); nothing done
    NotManaged,
}

/// Per-reference outcomes of a cleanup pass.
#[derive(Debug, Clone, Default, Getters)]
pub struct CleanupReport {
    /// Objects removed
    deleted: usize,
    /// Objects that were already gone
    already_absent: usize,
    /// References skipped as not store-managed
    skipped: usize,
    /// References whose objects are now orphaned
    failures: Vec<CleanupError>,
}

impl CleanupReport {
    /// Whether every reference was resolved without error.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of references attempted.
    pub fn attempted(&self) -> usize {
        self.deleted + self.already_absent + self.skipped + self.failures.len()
    }

    fn record(&mut self, reference: String, outcome: CatalogResult<DeleteOutcome>) {
        match outcome {
            Ok(DeleteOutcome::Deleted) => self.deleted += 1,
            Ok(DeleteOutcome::AlreadyAbsent) => self.already_absent += 1,
            Ok(DeleteOutcome::NotManaged) => self.skipped += 1,
            Err(e) => {
                let failure = CleanupError::new(CleanupErrorKind::OrphanCleanup {
                    reference,
                    reason: e.to_string(),
                });
                warn!(error = %failure, "Orphan cleanup failed");
                self.failures.push(failure);
            }
        }
    }
}

/// Turns uploaded bytes into store-backed URLs and retires superseded ones.
///
/// Built once at startup around the process-wide store handle and shared by
/// every request.
#[derive(Clone)]
pub struct AssetCoordinator {
    store: Arc<dyn ObjectStore>,
    transcoder: ImageTranscoder,
    gallery_concurrency: usize,
    cleanup_concurrency: usize,
}

impl std::fmt::Debug for AssetCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCoordinator")
            .field("backend", &self.store.backend_name())
            .field("transcoder", &self.transcoder)
            .field("gallery_concurrency", &self.gallery_concurrency)
            .field("cleanup_concurrency", &self.cleanup_concurrency)
            .finish()
    }
}

impl AssetCoordinator {
    /// Default number of gallery files processed at once.
    pub const DEFAULT_GALLERY_CONCURRENCY: usize = 4;
    /// Default number of deletions in flight during cleanup.
    pub const DEFAULT_CLEANUP_CONCURRENCY: usize = 4;

    /// Create a coordinator with default fan-out limits.
    pub fn new(store: Arc<dyn ObjectStore>, transcoder: ImageTranscoder) -> Self {
        Self {
            store,
            transcoder,
            gallery_concurrency: Self::DEFAULT_GALLERY_CONCURRENCY,
            cleanup_concurrency: Self::DEFAULT_CLEANUP_CONCURRENCY,
        }
    }

    /// Create a coordinator from the `[assets]` settings.
    pub fn with_config(store: Arc<dyn ObjectStore>, config: &AssetsConfig) -> Self {
        Self::new(store, config.transcoder())
            .with_gallery_concurrency(*config.gallery_concurrency())
            .with_cleanup_concurrency(*config.cleanup_concurrency())
    }

    /// Limit concurrent gallery uploads (minimum 1).
    pub fn with_gallery_concurrency(mut self, limit: usize) -> Self {
        self.gallery_concurrency = limit.max(1);
        self
    }

    /// Limit concurrent cleanup deletions (minimum 1).
    pub fn with_cleanup_concurrency(mut self, limit: usize) -> Self {
        self.cleanup_concurrency = limit.max(1);
        self
    }

    /// Shared store handle.
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Transcoder in use.
    pub fn transcoder(&self) -> &ImageTranscoder {
        &self.transcoder
    }

    async fn upload(&self, folder: AssetFolder, upload: &ImageUpload) -> CatalogResult<String> {
        // Never store under an existing key: a live document may reference it
        let path = ObjectPath::generate(folder, upload.stem(), self.transcoder.extension())?;
        let data = self
            .transcoder
            .transcode_blocking(Arc::clone(upload.data()))
            .await?;
        let object = self
            .store
            .store(&path, &data, self.transcoder.content_type())
            .await?;
        self.store.resolve_url(&object).await
    }

    /// Transcode and store one file for a single-image field.
    ///
    /// The object gets a fresh key built from the upload's name, so it never
    /// replaces an object that is already referenced.
    ///
    /// # Errors
    ///
    /// Invalid key, transcode or store failure. Nothing is stored on error.
    #[instrument(skip(self, upload), fields(name = upload.name(), size = upload.data().len()))]
    pub async fn upload_single(
        &self,
        folder: AssetFolder,
        upload: &ImageUpload,
    ) -> CatalogResult<String> {
        self.upload(folder, upload).await
    }

    /// Transcode and store a product cover image.
    #[instrument(skip(self, upload), fields(name = upload.name(), size = upload.data().len()))]
    pub async fn upload_cover(
        &self,
        folder: AssetFolder,
        upload: &ImageUpload,
    ) -> CatalogResult<String> {
        self.upload(folder, upload).await
    }

    /// Transcode and store a gallery concurrently.
    ///
    /// The returned URLs line up index-for-index with `uploads`, whatever order
    /// the individual uploads finish in. If any file fails, the error of the
    /// lowest failing index is returned, no URLs are handed out, and the files
    /// that did get stored are removed again.
    #[instrument(skip(self, uploads), fields(count = uploads.len()))]
    pub async fn upload_gallery(
        &self,
        folder: AssetFolder,
        uploads: &[ImageUpload],
    ) -> CatalogResult<Vec<String>> {
        let mut slots: Vec<Option<CatalogResult<String>>> =
            std::iter::repeat_with(|| None).take(uploads.len()).collect();

        let mut completions = stream::iter(uploads.iter().enumerate())
            .map(|(index, upload)| async move { (index, self.upload(folder, upload).await) })
            .buffer_unordered(self.gallery_concurrency);

        while let Some((index, result)) = completions.next().await {
            debug!(index, ok = result.is_ok(), "Gallery upload finished");
            slots[index] = Some(result);
        }

        let mut urls = Vec::with_capacity(uploads.len());
        let mut first_error = None;
        for result in slots.into_iter().flatten() {
            match result {
                Ok(url) => urls.push(url),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(error) = first_error {
            warn!(
                error = %error,
                stored = urls.len(),
                "Gallery upload failed; discarding stored files"
            );
            self.cleanup(folder, &urls).await;
            return Err(error);
        }

        info!(count = urls.len(), "Gallery uploaded");
        Ok(urls)
    }

    /// Delete the asset behind a previously issued reference.
    ///
    /// Deleting an object that is already gone succeeds with
    /// [`DeleteOutcome::AlreadyAbsent`]. References this store did not issue,
    /// including ones for a different folder, are skipped with
    /// [`DeleteOutcome::NotManaged`] and the store is not called.
    ///
    /// # Errors
    ///
    /// Store failures other than "not found".
    #[instrument(skip(self))]
    pub async fn delete_by_ref(
        &self,
        folder: AssetFolder,
        reference: &str,
    ) -> CatalogResult<DeleteOutcome> {
        let path = match self.store.codec().derive_key(reference) {
            Ok(path) => path,
            Err(e) => {
                debug!(error = %e, "Skipping delete of unmanaged reference");
                return Ok(DeleteOutcome::NotManaged);
            }
        };
        if path.folder() != folder {
            debug!(path = %path, "Skipping delete of reference from another folder");
            return Ok(DeleteOutcome::NotManaged);
        }

        match self.store.delete(&path).await {
            Ok(()) => Ok(DeleteOutcome::Deleted),
            Err(e) if e.is_not_found() => {
                debug!(path = %path, "Object already absent");
                Ok(DeleteOutcome::AlreadyAbsent)
            }
            Err(e) => Err(e),
        }
    }

    /// Delete every reference, independently and with bounded concurrency.
    ///
    /// One failure never stops the others. Failures are logged and collected
    /// into the report; nothing is returned as an error.
    #[instrument(skip(self, references), fields(count = references.len()))]
    pub async fn cleanup<S>(&self, folder: AssetFolder, references: &[S]) -> CleanupReport
    where
        S: AsRef<str> + Sync,
    {
        let outcomes: Vec<_> = stream::iter(references)
            .map(|reference| async move {
                let reference = reference.as_ref();
                (
                    reference.to_string(),
                    self.delete_by_ref(folder, reference).await,
                )
            })
            .buffer_unordered(self.cleanup_concurrency)
            .collect()
            .await;

        let mut report = CleanupReport::default();
        for (reference, outcome) in outcomes {
            report.record(reference, outcome);
        }

        if !references.is_empty() {
            info!(
                deleted = report.deleted,
                already_absent = report.already_absent,
                skipped = report.skipped,
                failed = report.failures.len(),
                "Cleanup finished"
            );
        }
        report
    }

    /// Run `commit`, then retire `superseded` only if it succeeded.
    ///
    /// `commit` is the caller's durable document write. Deletion starts strictly
    /// after it resolves `Ok`; a failed commit deletes nothing and its error is
    /// returned unchanged.
    pub async fn replace_with<T, F, Fut>(
        &self,
        folder: AssetFolder,
        superseded: &[String],
        commit: F,
    ) -> CatalogResult<(T, CleanupReport)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CatalogResult<T>>,
    {
        let committed = commit().await?;
        let report = self.cleanup(folder, superseded).await;
        Ok((committed, report))
    }
}
