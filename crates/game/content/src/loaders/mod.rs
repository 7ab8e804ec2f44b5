//! Loaders for reading game descriptions from files.
//!
//! All loaders use `parlour-core` types directly with serde for TOML
//! deserialization, then run the core validation pass so a loaded
//! configuration is always structurally sound.

pub mod config;

pub use config::ConfigLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
