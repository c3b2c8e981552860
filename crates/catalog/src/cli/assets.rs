//! Asset command handlers.

use super::commands::OutputFormat;
use catalog::{
    AssetCoordinator, AssetFolder, CatalogResult, DeleteOutcome, ImageUpload, StorageError,
    StorageErrorKind,
};
use std::path::Path;
use tracing::info;

fn outcome_name(outcome: DeleteOutcome) -> &'static str {
    match outcome {
        DeleteOutcome::Deleted => "deleted",
        DeleteOutcome::AlreadyAbsent => "already_absent",
        DeleteOutcome::NotManaged => "not_managed",
    }
}

/// Transcode and store one file under a fresh key.
pub async fn upload_asset(
    coordinator: &AssetCoordinator,
    folder: AssetFolder,
    file: &Path,
    name: Option<String>,
    format: OutputFormat,
) -> CatalogResult<()> {
    let data = tokio::fs::read(file).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!(
            "{}: {}",
            file.display(),
            e
        )))
    })?;

    let name = name.unwrap_or_else(|| folder.key_prefix().to_string());
    let url = coordinator
        .upload_single(folder, &ImageUpload::new(data, name))
        .await?;
    let path = coordinator.store().codec().derive_key(&url)?;
    info!(file = %file.display(), path = %path, "Uploaded");

    match format {
        OutputFormat::Human => println!("{}", url),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "folder": folder.as_str(), "key": path.key(), "url": url })
        ),
    }
    Ok(())
}

/// Delete the asset behind `url`.
pub async fn delete_asset(
    coordinator: &AssetCoordinator,
    folder: AssetFolder,
    url: &str,
    format: OutputFormat,
) -> CatalogResult<()> {
    let outcome = coordinator.delete_by_ref(folder, url).await?;

    match format {
        OutputFormat::Human => println!("{}", outcome_name(outcome)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "url": url, "outcome": outcome_name(outcome) })
        ),
    }
    Ok(())
}

/// Print the object path encoded in `url`.
pub fn derive_key(
    coordinator: &AssetCoordinator,
    url: &str,
    format: OutputFormat,
) -> CatalogResult<()> {
    let path = coordinator.store().codec().derive_key(url)?;

    match format {
        OutputFormat::Human => println!("{}", path),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "folder": path.folder().as_str(), "key": path.key() })
        ),
    }
    Ok(())
}
