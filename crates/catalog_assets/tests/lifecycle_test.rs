//! Create / update / delete flows against recording doubles.

mod test_utils;

use catalog_assets::{
    AssetCoordinator, Brand, Category, ImageOwner, ImageTranscoder, ImageUpload, ImageUploads,
    Product,
};
use catalog_error::{CatalogErrorKind, DocumentErrorKind};
use catalog_storage::{AssetFolder, ObjectStore};
use std::sync::{Arc, Mutex};
use test_utils::{Event, EventLog, MockRepository, MockStore, png_bytes};

struct Harness<D> {
    events: EventLog,
    store: Arc<MockStore>,
    repository: MockRepository<D>,
    coordinator: AssetCoordinator,
}

impl<D: ImageOwner + Clone + 'static> Harness<D> {
    fn new() -> Self {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::new(MockStore::with_log(Arc::clone(&events)));
        let coordinator = AssetCoordinator::new(store.clone(), ImageTranscoder::default());
        Self {
            repository: MockRepository::new(Arc::clone(&events)),
            events,
            store,
            coordinator,
        }
    }

    fn events(&self) -> Vec<Event> {
        self.events.lock().expect("event log poisoned").clone()
    }

    fn clear_events(&self) {
        self.events.lock().expect("event log poisoned").clear();
    }

    fn position(&self, wanted: &Event) -> usize {
        self.events()
            .iter()
            .position(|event| event == wanted)
            .unwrap_or_else(|| panic!("{:?} not recorded", wanted))
    }
}

fn brand(id: &str) -> Brand {
    Brand {
        id: id.to_string(),
        name: "Acme".to_string(),
        slug: "acme".to_string(),
        image: None,
    }
}

fn jpeg_upload(name: &str, colour: [u8; 3]) -> ImageUpload {
    ImageUpload::new(png_bytes(6, 6, colour), name)
}

fn path_of<D>(harness: &Harness<D>, url: &str) -> String {
    harness
        .store
        .codec()
        .derive_key(url)
        .map(|path| path.to_string())
        .unwrap_or_else(|e| panic!("{} not managed: {}", url, e))
}

#[tokio::test]
async fn test_brand_lifecycle_end_to_end() -> anyhow::Result<()> {
    let harness = Harness::<Brand>::new();

    // Create: one store, one URL, no deletes
    let created = harness
        .coordinator
        .create_document(
            &harness.repository,
            brand("b1"),
            &ImageUploads::image(jpeg_upload("first", [10, 20, 30])),
        )
        .await?;
    let first_url = created.image.clone().expect("image assigned");
    assert_eq!(harness.store.store_calls(), 1);
    assert_eq!(harness.store.delete_calls(), 0);
    let first_path = path_of(&harness, &first_url);
    assert_eq!(MockStore::name_of(&first_path), "first");
    assert!(first_path.starts_with("brands/first-"));
    assert_eq!(harness.repository.get("b1"), Some(created.clone()));

    // Update: one new store, old key deleted strictly after the commit
    harness.clear_events();
    let mut document = created;
    let report = harness
        .coordinator
        .update_document(
            &harness.repository,
            &mut document,
            &ImageUploads::image(jpeg_upload("second", [30, 20, 10])),
        )
        .await?;
    assert!(report.is_clean());
    assert_eq!(*report.deleted(), 1);
    assert_eq!(harness.store.store_calls(), 1);
    assert_eq!(harness.store.delete_calls(), 1);
    let commit = harness.position(&Event::Commit("b1".into()));
    let delete = harness.position(&Event::Deleted(first_path.clone()));
    assert!(commit < delete, "old asset deleted before commit");
    let second_url = document.image.clone().expect("image replaced");
    assert_ne!(second_url, first_url);

    // Remove the final object behind the document's back, then delete the document
    harness
        .coordinator
        .delete_by_ref(AssetFolder::Brands, &second_url)
        .await?;
    harness.clear_events();
    let (removed, report) = harness
        .coordinator
        .delete_document::<Brand, _>(&harness.repository, "b1")
        .await?;
    assert_eq!(removed.image.as_deref(), Some(second_url.as_str()));
    assert_eq!(harness.store.delete_calls(), 1);
    assert_eq!(*report.already_absent(), 1);
    assert!(report.is_clean());
    assert!(harness.repository.get("b1").is_none());
    Ok(())
}

#[tokio::test]
async fn test_update_without_files_keeps_assets() -> anyhow::Result<()> {
    let harness = Harness::<Category>::new();
    let mut document = harness
        .coordinator
        .create_document(
            &harness.repository,
            Category {
                id: "c1".into(),
                name: "Shoes".into(),
                slug: "shoes".into(),
                image: None,
            },
            &ImageUploads::image(jpeg_upload("shoes", [1, 2, 3])),
        )
        .await?;
    let before = document.image.clone();

    document.name = "Sneakers".into();
    let report = harness
        .coordinator
        .update_document(&harness.repository, &mut document, &ImageUploads::none())
        .await?;

    assert_eq!(report.attempted(), 0);
    assert_eq!(document.image, before);
    assert_eq!(harness.store.delete_calls(), 0);
    assert_eq!(harness.store.object_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_commit_keeps_old_assets_and_refs() -> anyhow::Result<()> {
    let harness = Harness::<Brand>::new();
    let mut document = harness
        .coordinator
        .create_document(
            &harness.repository,
            brand("b2"),
            &ImageUploads::image(jpeg_upload("old", [4, 4, 4])),
        )
        .await?;
    let old_url = document.image.clone();

    harness.repository.set_fail_saves(true);
    let err = harness
        .coordinator
        .update_document(
            &harness.repository,
            &mut document,
            &ImageUploads::image(jpeg_upload("new", [8, 8, 8])),
        )
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), CatalogErrorKind::Document(_)));
    assert_eq!(document.image, old_url, "refs restored after failed commit");
    assert_eq!(harness.store.delete_calls(), 0);
    assert!(harness.store.has_named("brands", "old"));
    // The new upload is orphaned, not deleted
    assert!(harness.store.has_named("brands", "new"));
    Ok(())
}

#[tokio::test]
async fn test_product_gallery_replace() -> anyhow::Result<()> {
    let harness = Harness::<Product>::new();
    let product = Product {
        id: "p1".into(),
        title: "Runner".into(),
        slug: "runner".into(),
        ..Default::default()
    };

    let uploads = ImageUploads::none()
        .with_cover(jpeg_upload("cover", [1, 1, 1]))
        .with_gallery(vec![
            jpeg_upload("g1", [2, 2, 2]),
            jpeg_upload("g2", [3, 3, 3]),
        ]);
    let mut document = harness
        .coordinator
        .create_document(&harness.repository, product, &uploads)
        .await?;
    assert!(document.image_cover.is_some());
    assert_eq!(document.images.len(), 2);

    // Replace the gallery only; the cover must survive
    let cover = document.image_cover.clone();
    let old_gallery: Vec<String> = document
        .images
        .iter()
        .map(|url| path_of(&harness, url))
        .collect();
    harness.clear_events();
    let report = harness
        .coordinator
        .update_document(
            &harness.repository,
            &mut document,
            &ImageUploads::none().with_gallery(vec![jpeg_upload("g3", [4, 4, 4])]),
        )
        .await?;

    assert_eq!(*report.deleted(), 2);
    assert_eq!(document.image_cover, cover);
    assert_eq!(document.images.len(), 1);
    assert!(harness.store.has_named("products", "cover"));
    assert!(!harness.store.has_named("products", "g1"));
    assert!(!harness.store.has_named("products", "g2"));
    let commit = harness.position(&Event::Commit("p1".into()));
    for path in old_gallery {
        assert!(commit < harness.position(&Event::Deleted(path)));
    }
    Ok(())
}

#[tokio::test]
async fn test_failed_gallery_assigns_nothing() -> anyhow::Result<()> {
    let harness = Harness::<Product>::new();
    let uploads = ImageUploads::none()
        .with_cover(jpeg_upload("cover", [1, 1, 1]))
        .with_gallery(vec![
            jpeg_upload("g1", [2, 2, 2]),
            ImageUpload::new(b"garbage".to_vec(), "g2"),
            jpeg_upload("g3", [3, 3, 3]),
        ]);

    let err = harness
        .coordinator
        .create_document(
            &harness.repository,
            Product {
                id: "p2".into(),
                ..Default::default()
            },
            &uploads,
        )
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), CatalogErrorKind::Transcode(_)));
    assert!(harness.repository.get("p2").is_none());
    assert_eq!(harness.store.object_count(), 0, "cover and siblings discarded");
    assert!(!harness.events().contains(&Event::Commit("p2".into())));
    Ok(())
}

#[tokio::test]
async fn test_unsupported_field_rejected_before_upload() {
    let harness = Harness::<Brand>::new();
    let err = harness
        .coordinator
        .create_document(
            &harness.repository,
            brand("b3"),
            &ImageUploads::none().with_cover(jpeg_upload("cover", [1, 1, 1])),
        )
        .await
        .unwrap_err();

    match err.kind() {
        CatalogErrorKind::Document(e) => {
            assert!(matches!(e.kind(), DocumentErrorKind::UnsupportedField { .. }))
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(harness.store.store_calls(), 0);
}

#[tokio::test]
async fn test_delete_missing_document() {
    let harness = Harness::<Brand>::new();
    let err = harness
        .coordinator
        .delete_document::<Brand, _>(&harness.repository, "nope")
        .await
        .unwrap_err();

    match err.kind() {
        CatalogErrorKind::Document(e) => {
            assert_eq!(e.kind(), &DocumentErrorKind::NotFound("nope".into()))
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(harness.store.delete_calls(), 0);
}

#[tokio::test]
async fn test_delete_skips_foreign_references() -> anyhow::Result<()> {
    let harness = Harness::<Brand>::new();
    let mut legacy = brand("b4");
    legacy.image = Some("https://cdn.example.com/legacy.png".into());
    harness
        .coordinator
        .create_document(&harness.repository, legacy, &ImageUploads::none())
        .await?;

    let (_, report) = harness
        .coordinator
        .delete_document::<Brand, _>(&harness.repository, "b4")
        .await?;

    assert_eq!(*report.skipped(), 1);
    assert_eq!(harness.store.delete_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_update_with_reused_name_keeps_new_object() -> anyhow::Result<()> {
    let harness = Harness::<Brand>::new();
    let mut document = harness
        .coordinator
        .create_document(
            &harness.repository,
            brand("b5"),
            &ImageUploads::image(jpeg_upload("brand-b5", [10, 10, 10])),
        )
        .await?;
    let old_url = document.image.clone().expect("image assigned");
    let old_path = path_of(&harness, &old_url);

    // Same upload name as the live object
    let report = harness
        .coordinator
        .update_document(
            &harness.repository,
            &mut document,
            &ImageUploads::image(jpeg_upload("brand-b5", [20, 20, 20])),
        )
        .await?;

    let new_url = document.image.clone().expect("image replaced");
    let new_path = path_of(&harness, &new_url);
    assert_ne!(new_url, old_url);
    assert_ne!(new_path, old_path);
    assert_eq!(*report.deleted(), 1);
    assert!(harness.store.object(&old_path).is_none());
    assert!(
        harness.store.object(&new_path).is_some(),
        "saved document must reference a live object"
    );
    assert_eq!(harness.repository.get("b5"), Some(document));
    Ok(())
}

#[tokio::test]
async fn test_update_reports_failed_cleanup_without_failing() -> anyhow::Result<()> {
    let harness = Harness::<Brand>::new();
    let store = Arc::new(MockStore::with_log(Arc::clone(&harness.events)).failing_delete("stale"));
    let coordinator = AssetCoordinator::new(store.clone(), ImageTranscoder::default());

    let mut document = coordinator
        .create_document(
            &harness.repository,
            brand("b6"),
            &ImageUploads::image(jpeg_upload("stale", [3, 3, 3])),
        )
        .await?;

    let report = coordinator
        .update_document(
            &harness.repository,
            &mut document,
            &ImageUploads::image(jpeg_upload("fresh", [6, 6, 6])),
        )
        .await?;

    assert_eq!(report.failures().len(), 1);
    assert_eq!(*report.deleted(), 0);
    let new_url = document.image.clone().expect("image replaced");
    let new_path = store.codec().derive_key(&new_url)?;
    assert_eq!(MockStore::name_of(&new_path.to_string()), "fresh");
    assert_eq!(
        harness.repository.get("b6").and_then(|saved| saved.image),
        Some(new_url)
    );
    // The stale object stays behind as an orphan
    assert!(store.has_named("brands", "stale"));
    Ok(())
}

#[tokio::test]
async fn test_delete_continues_past_failed_cover() -> anyhow::Result<()> {
    let harness = Harness::<Product>::new();
    let store = Arc::new(MockStore::with_log(Arc::clone(&harness.events)).failing_delete("cover"));
    let coordinator = AssetCoordinator::new(store.clone(), ImageTranscoder::default());

    let uploads = ImageUploads::none()
        .with_cover(jpeg_upload("cover", [1, 1, 1]))
        .with_gallery(vec![
            jpeg_upload("g1", [2, 2, 2]),
            jpeg_upload("g2", [3, 3, 3]),
        ]);
    coordinator
        .create_document(
            &harness.repository,
            Product {
                id: "p3".into(),
                ..Default::default()
            },
            &uploads,
        )
        .await?;

    let (removed, report) = coordinator
        .delete_document::<Product, _>(&harness.repository, "p3")
        .await?;

    assert_eq!(removed.images.len(), 2);
    assert_eq!(report.failures().len(), 1);
    assert_eq!(*report.deleted(), 2);
    assert!(store.has_named("products", "cover"));
    assert!(!store.has_named("products", "g1"));
    assert!(!store.has_named("products", "g2"));
    assert!(harness.repository.get("p3").is_none());
    Ok(())
}
