//! Game configuration loader.

use std::path::Path;

use anyhow::Context;
use parlour_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game descriptions from TOML files.
///
/// Loading is read-only: the file on disk is never mutated. Parse failures
/// and structural violations both surface as fatal configuration errors with
/// the offending section named.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a game description from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::load_str(&content)
            .with_context(|| format!("invalid game configuration {}", path.display()))
    }

    /// Parse and validate a game description from TOML text.
    pub fn load_str(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig =
            toml::from_str(content).map_err(|e| anyhow::anyhow!("failed to parse TOML: {e}"))?;
        config.validate().map_err(anyhow::Error::from)?;
        Ok(config)
    }
}
