//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the catalog binary.

mod assets;
mod commands;

pub use assets::{delete_asset, derive_key, upload_asset};
pub use commands::{Cli, Commands, OutputFormat};
