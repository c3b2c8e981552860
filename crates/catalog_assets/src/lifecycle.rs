//! Document-level image flows: create, update (replace) and delete.

use crate::{
    AssetCoordinator, CleanupReport, DocumentRepository, ImageField, ImageOwner, ImageRefs,
    ImageUploads,
};
use catalog_error::{CatalogResult, DocumentError, DocumentErrorKind};
use catalog_storage::{AssetFolder, AssetKeyCodec, ObjectPath};
use tracing::{debug, info, instrument, warn};

/// Freshly stored references whose document write has not resolved yet.
///
/// Dropped before [`disarm`](Self::disarm), i.e. when the request future is
/// cancelled between store and persist, it logs them as orphans.
struct OrphanGuard {
    folder: AssetFolder,
    references: Vec<String>,
}

impl OrphanGuard {
    fn new(folder: AssetFolder, references: Vec<String>) -> Self {
        Self { folder, references }
    }

    fn disarm(mut self) {
        self.references.clear();
    }
}

impl Drop for OrphanGuard {
    fn drop(&mut self) {
        if !self.references.is_empty() {
            warn!(
                folder = %self.folder,
                orphaned = ?self.references,
                "Request dropped before save; assets orphaned"
            );
        }
    }
}

/// References produced by one request's uploads.
#[derive(Debug, Default)]
struct FreshRefs {
    image: Option<String>,
    image_cover: Option<String>,
    images: Vec<String>,
}

impl FreshRefs {
    fn all(&self) -> Vec<String> {
        self.image
            .iter()
            .chain(self.image_cover.iter())
            .chain(self.images.iter())
            .cloned()
            .collect()
    }

    /// References in `current` that these replace.
    ///
    /// A current reference resolving to one of the fresh objects is kept off
    /// the list, whatever its URL looks like.
    fn superseded(&self, current: &ImageRefs, codec: &AssetKeyCodec) -> Vec<String> {
        let mut superseded = Vec::new();
        if self.image.is_some() {
            superseded.extend(current.image.iter().cloned());
        }
        if self.image_cover.is_some() {
            superseded.extend(current.image_cover.iter().cloned());
        }
        if !self.images.is_empty() {
            superseded.extend(current.images.iter().cloned());
        }
        superseded.retain(|reference| !reference.is_empty());

        let fresh: Vec<ObjectPath> = self
            .all()
            .iter()
            .filter_map(|reference| codec.derive_key(reference).ok())
            .collect();
        superseded.retain(|reference| match codec.derive_key(reference) {
            Ok(path) if fresh.contains(&path) => {
                debug!(path = %path, "Replaced reference points at a fresh object; keeping it");
                false
            }
            _ => true,
        });
        superseded
    }

    /// `current` with the replaced fields swapped in.
    fn applied_to(&self, current: &ImageRefs) -> ImageRefs {
        let mut next = current.clone();
        if let Some(image) = &self.image {
            next.image = Some(image.clone());
        }
        if let Some(cover) = &self.image_cover {
            next.image_cover = Some(cover.clone());
        }
        if !self.images.is_empty() {
            next.images = self.images.clone();
        }
        next
    }
}

fn check_fields<D: ImageOwner>(uploads: &ImageUploads) -> CatalogResult<()> {
    let requested = [
        (ImageField::Image, uploads.image.is_some()),
        (ImageField::ImageCover, uploads.image_cover.is_some()),
        (ImageField::Images, !uploads.images.is_empty()),
    ];
    for (field, present) in requested {
        if present && !D::has_field(field) {
            return Err(DocumentError::new(DocumentErrorKind::UnsupportedField {
                document: D::KIND.to_string(),
                field: field.as_str().to_string(),
            })
            .into());
        }
    }
    Ok(())
}

impl AssetCoordinator {
    /// Upload every file in `uploads`. All-or-nothing: on failure, files
    /// already stored by this call are removed again.
    async fn upload_fields<D: ImageOwner>(
        &self,
        uploads: &ImageUploads,
    ) -> CatalogResult<FreshRefs> {
        check_fields::<D>(uploads)?;

        let mut fresh = FreshRefs::default();
        let result = async {
            if let Some(upload) = &uploads.image {
                fresh.image = Some(self.upload_single(D::FOLDER, upload).await?);
            }
            if let Some(upload) = &uploads.image_cover {
                fresh.image_cover = Some(self.upload_cover(D::FOLDER, upload).await?);
            }
            if !uploads.images.is_empty() {
                fresh.images = self.upload_gallery(D::FOLDER, &uploads.images).await?;
            }
            CatalogResult::Ok(())
        }
        .await;

        if let Err(e) = result {
            let stored = fresh.all();
            if !stored.is_empty() {
                warn!(error = %e, stored = stored.len(), "Upload failed; discarding stored files");
                self.cleanup(D::FOLDER, &stored).await;
            }
            return Err(e);
        }
        Ok(fresh)
    }

    /// Create flow: upload, assign, save.
    ///
    /// If the save fails the freshly stored assets are left in place (the write
    /// may have landed) and logged as orphans for later collection.
    #[instrument(skip_all, fields(kind = D::KIND, id = document.id()))]
    pub async fn create_document<D, R>(
        &self,
        repository: &R,
        mut document: D,
        uploads: &ImageUploads,
    ) -> CatalogResult<D>
    where
        D: ImageOwner,
        R: DocumentRepository<D> + ?Sized,
    {
        let fresh = self.upload_fields::<D>(uploads).await?;
        let guard = OrphanGuard::new(D::FOLDER, fresh.all());
        document.set_image_refs(fresh.applied_to(&document.image_refs()));

        let saved = repository.save(&document).await;
        guard.disarm();
        if let Err(e) = saved {
            warn!(error = %e, orphaned = ?fresh.all(), "Save failed after upload; assets orphaned");
            return Err(e);
        }

        info!(assets = fresh.all().len(), "Document created");
        Ok(document)
    }

    /// Replace flow: capture old references, upload, assign, save, then
    /// delete the replaced assets.
    ///
    /// Only fields with new files are replaced. Old assets are deleted strictly
    /// after the save succeeds; cleanup failures land in the returned report.
    /// If the save fails, `document` is restored to its previous references.
    #[instrument(skip_all, fields(kind = D::KIND, id = document.id()))]
    pub async fn update_document<D, R>(
        &self,
        repository: &R,
        document: &mut D,
        uploads: &ImageUploads,
    ) -> CatalogResult<CleanupReport>
    where
        D: ImageOwner,
        R: DocumentRepository<D> + ?Sized,
    {
        let previous = document.image_refs();
        let fresh = self.upload_fields::<D>(uploads).await?;
        let superseded = fresh.superseded(&previous, self.store().codec());
        let guard = OrphanGuard::new(D::FOLDER, fresh.all());
        document.set_image_refs(fresh.applied_to(&previous));

        let saved: &D = document;
        let outcome = self
            .replace_with(D::FOLDER, &superseded, move || async move {
                let committed = repository.save(saved).await;
                guard.disarm();
                committed
            })
            .await;

        match outcome {
            Ok(((), report)) => {
                info!(
                    replaced = superseded.len(),
                    cleanup_failures = report.failures().len(),
                    "Document updated"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, orphaned = ?fresh.all(), "Save failed after upload; assets orphaned");
                document.set_image_refs(previous);
                Err(e)
            }
        }
    }

    /// Delete flow: remove the document, then every asset it referenced.
    ///
    /// # Errors
    ///
    /// `DocumentError::NotFound` if no document has `id`; repository failures.
    /// Asset deletion failures are only reported.
    #[instrument(skip(self, repository), fields(kind = D::KIND))]
    pub async fn delete_document<D, R>(
        &self,
        repository: &R,
        id: &str,
    ) -> CatalogResult<(D, CleanupReport)>
    where
        D: ImageOwner,
        R: DocumentRepository<D> + ?Sized,
    {
        let document = repository
            .delete(id)
            .await?
            .ok_or_else(|| DocumentError::new(DocumentErrorKind::NotFound(id.to_string())))?;

        let report = self
            .cleanup(D::FOLDER, &document.image_refs().all())
            .await;

        info!(
            deleted = report.deleted(),
            cleanup_failures = report.failures().len(),
            "Document deleted"
        );
        Ok((document, report))
    }
}
