use crate::config::ExtractConfig;
use crate::errors::{AppError, AppResult};
use crate::extractor::extract_points_with_config;
use crate::models::Extraction;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of extracting every archive in a batch.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Archives that were processed, with their extraction report
    pub succeeded: Vec<(PathBuf, Extraction)>,
    /// Archives that failed, with the error that stopped them
    pub failed: Vec<(PathBuf, AppError)>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Total number of points extracted across all archives.
    pub fn point_count(&self) -> usize {
        self.succeeded.iter().map(|(_, e)| e.points.len()).sum()
    }

    /// Turns a summary with failures into `AppError::Batch`.
    pub fn into_result(self) -> AppResult<Self> {
        if self.failed.is_empty() {
            Ok(self)
        } else {
            Err(AppError::Batch {
                failed: self.failed.len(),
                total: self.total(),
            })
        }
    }
}

/// Recursively collects archive files under `dir` whose extension matches
/// `extension` (case-insensitive), sorted by path.
///
/// # Errors
///
/// Returns `NotFound` if `dir` does not exist, `InvalidInput` if it is not a
/// directory, and `Io` if a directory cannot be read.
pub fn find_archives(dir: &Path, extension: &str) -> AppResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(AppError::NotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(AppError::InvalidInput(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let mut archives = Vec::new();
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            AppError::Io(format!("Failed to read directory {}: {e}", dir.display()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches {
            archives.push(entry.into_path());
        }
    }

    archives.sort();
    Ok(archives)
}

/// Extracts points from every archive in parallel.
///
/// Each archive is written to its default output path. A failing archive is logged
/// and recorded in [`BatchSummary::failed`]; the others still run.
///
/// When `config.batch_threads` is 0 the global rayon pool is used, otherwise a
/// dedicated pool of that size.
pub fn extract_all(archives: &[PathBuf], config: &ExtractConfig) -> AppResult<BatchSummary> {
    info!(total = archives.len(), "Starting batch extraction");

    let run = || {
        archives
            .par_iter()
            .map(|path| (path.clone(), extract_points_with_config(path, None, config)))
            .collect::<Vec<(PathBuf, AppResult<Extraction>)>>()
    };

    let results = if config.batch_threads == 0 {
        run()
    } else {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.batch_threads)
            .build()
            .map_err(|e| AppError::InvalidInput(format!("Failed to build thread pool: {e}")))?
            .install(run)
    };

    let mut summary = BatchSummary::default();
    for (path, result) in results {
        match result {
            Ok(extraction) => summary.succeeded.push((path, extraction)),
            Err(e) => {
                warn!(
                    archive = %path.display(),
                    error = %e,
                    "Failed to extract archive"
                );
                summary.failed.push((path, e));
            }
        }
    }

    info!(
        extracted = summary.succeeded.len(),
        failed = summary.failed.len(),
        points = summary.point_count(),
        "Batch extraction completed"
    );

    Ok(summary)
}
