//! Catalog CLI binary.
//!
//! This binary provides command-line access to the configured object store:
//! - Upload an image file and print its public URL
//! - Delete the asset behind a URL
//! - Decode the folder and key carried by a URL

use catalog::{AssetCoordinator, CatalogConfig, init_logging};
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, delete_asset, derive_key, upload_asset};

    // Load .env before anything reads CATALOG__* variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs)?;

    let config = CatalogConfig::load_with(cli.config.as_deref())?;
    let coordinator = AssetCoordinator::from_config(&config)?;
    tracing::debug!(?coordinator, "Coordinator ready");

    match cli.command {
        Commands::Upload { folder, file, name } => {
            upload_asset(&coordinator, folder, &file, name, cli.format).await?;
        }

        Commands::Delete { folder, url } => {
            delete_asset(&coordinator, folder, &url, cli.format).await?;
        }

        Commands::DeriveKey { url } => {
            derive_key(&coordinator, &url, cli.format)?;
        }
    }

    Ok(())
}
