use crate::constants::{ARCHIVE_EXTENSION, DEFAULT_PREVIEW_LIMIT};
use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Extraction settings with all values filled in (no Options).
///
/// Every field has a default, so a TOML file only needs the keys it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Prefix the CSV output with a UTF-8 byte-order mark
    pub write_bom: bool,
    /// Number of points printed to the console after an extraction
    pub preview_limit: usize,
    /// File extension (without the dot) matched when scanning a directory
    pub archive_extension: String,
    /// Number of threads for batch extraction.
    /// When set to 0 (default), rayon picks the thread count.
    pub batch_threads: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            write_bom: true,
            preview_limit: DEFAULT_PREVIEW_LIMIT,
            archive_extension: ARCHIVE_EXTENSION.to_string(),
            batch_threads: 0,
        }
    }
}

impl ExtractConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// Unknown keys are rejected so typos are not silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the TOML is malformed, unknown keys are present,
    /// or `archive_extension` is empty. Returns `Io` if the file cannot be read.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: ExtractConfig = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;

        let extension = config.archive_extension.trim().trim_start_matches('.');
        if extension.is_empty() {
            return Err(AppError::InvalidInput(
                "Archive extension must not be empty".into(),
            ));
        }
        config.archive_extension = extension.to_string();

        Ok(config)
    }
}
