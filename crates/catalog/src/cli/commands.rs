//! CLI command definitions.

use catalog::AssetFolder;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Catalog - image asset management for catalog documents
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(about = "Upload, resolve and retire catalog image assets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file layered over the standard sources
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcode an image file and store it, printing its public URL
    Upload {
        /// Asset folder (brands, categories, products)
        #[arg(long)]
        folder: AssetFolder,

        /// Image file to upload
        #[arg(long)]
        file: PathBuf,

        /// Base name for the generated key; defaults to the folder's entity name
        #[arg(long)]
        name: Option<String>,
    },

    /// Delete the asset behind a public URL
    Delete {
        /// Asset folder the URL must belong to
        #[arg(long)]
        folder: AssetFolder,

        /// Public URL previously issued by the store
        url: String,
    },

    /// Print the folder and key encoded in a public URL
    DeriveKey {
        /// Public URL previously issued by the store
        url: String,
    },
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text
    Human,
    /// JSON object
    Json,
}
