use crate::config::ExtractConfig;
use crate::constants::{DESCRIPTOR_NAME, MAX_DESCRIPTOR_PREALLOC, OUTPUT_SUFFIX};
use crate::errors::{AppError, AppResult, FormatIssue};
use crate::models::{Extraction, PointRecord};
use crate::parser::{convert_candidates, scan_point_elements};
use crate::writer::write_points;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::result::ZipError;
use zip::ZipArchive;

/// Extracts all labeled points from a GeoGebra archive and writes them to CSV.
///
/// Uses the default [`ExtractConfig`]. See [`extract_points_with_config`] for the
/// full behavior.
///
/// # Example
///
/// ```no_run
/// use ggb_points::extractor;
/// use std::path::Path;
///
/// # fn main() -> Result<(), ggb_points::errors::AppError> {
/// let points = extractor::extract_points(Path::new("figure.ggb"), None)?;
/// // Writes figure_points.csv next to figure.ggb
/// println!("{} point(s)", points.len());
/// # Ok(())
/// # }
/// ```
pub fn extract_points(
    archive_path: &Path,
    output_path: Option<&Path>,
) -> AppResult<Vec<PointRecord>> {
    let extraction =
        extract_points_with_config(archive_path, output_path, &ExtractConfig::default())?;
    Ok(extraction.points)
}

/// Extracts all labeled points from a GeoGebra archive.
///
/// Reads the `geogebra.xml` descriptor from the archive, collects every
/// `<element type="point">` (at any depth) with numeric `<coords x=".." y="..">`,
/// and writes them to `output_path`, or to `<stem>_points.csv` next to the archive
/// when no output path is given.
///
/// # Behavior
///
/// - **Missing coords**: point elements without a direct `<coords>` child, or with
///   an empty or absent `x`/`y`, are skipped.
/// - **Unparseable coords**: the element is skipped and a warning naming its label
///   is logged and returned in [`Extraction::warnings`]. The run continues.
/// - **No points**: nothing is written and [`Extraction::written`] is false.
///
/// # Errors
///
/// Returns an error, and writes nothing, if:
/// - `archive_path` does not exist (`NotFound`)
/// - the file is not a ZIP archive, lacks `geogebra.xml`, or the descriptor is not
///   well-formed XML (`Format`)
/// - reading the archive or writing the CSV fails (`Io`, `Csv`)
pub fn extract_points_with_config(
    archive_path: &Path,
    output_path: Option<&Path>,
    config: &ExtractConfig,
) -> AppResult<Extraction> {
    if !archive_path.exists() {
        return Err(AppError::NotFound(archive_path.to_path_buf()));
    }

    let output_path = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(archive_path));

    let descriptor = read_descriptor(archive_path)?;
    let candidates = scan_point_elements(&descriptor)?;
    debug!(
        archive = %archive_path.display(),
        candidates = candidates.len(),
        "Scanned descriptor"
    );

    let (points, warnings) = convert_candidates(candidates);

    let written = if points.is_empty() {
        warn!(archive = %archive_path.display(), "No points found");
        false
    } else {
        write_points(&output_path, &points, config.write_bom)?;
        info!(
            archive = %archive_path.display(),
            output = %output_path.display(),
            count = points.len(),
            skipped = warnings.len(),
            "Points extracted"
        );
        true
    };

    Ok(Extraction {
        points,
        warnings,
        output_path,
        written,
    })
}

/// Returns `<archive-stem>_points.csv` in the archive's directory.
pub fn default_output_path(archive_path: &Path) -> PathBuf {
    let stem = archive_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{stem}{OUTPUT_SUFFIX}");

    match archive_path.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Reads the raw bytes of the `geogebra.xml` member.
///
/// The archive file is closed when this returns, on success and on every error.
pub fn read_descriptor(archive_path: &Path) -> AppResult<Vec<u8>> {
    let file = File::open(archive_path).map_err(|e| {
        AppError::Io(format!(
            "Failed to open archive {}: {e}",
            archive_path.display()
        ))
    })?;

    let mut archive = ZipArchive::new(file).map_err(|e| match e {
        ZipError::Io(io) => AppError::Io(format!(
            "Failed to read archive {}: {io}",
            archive_path.display()
        )),
        other => FormatIssue::NotAnArchive(other.to_string()).into(),
    })?;

    let mut member = archive.by_name(DESCRIPTOR_NAME).map_err(|e| match e {
        ZipError::FileNotFound => AppError::from(FormatIssue::MissingDescriptor),
        other => FormatIssue::NotAnArchive(other.to_string()).into(),
    })?;

    // The declared size is read from the archive and is capped before reserving.
    let capacity = usize::try_from(member.size())
        .unwrap_or(usize::MAX)
        .min(MAX_DESCRIPTOR_PREALLOC);
    let mut content = Vec::with_capacity(capacity);
    member.read_to_end(&mut content).map_err(|e| {
        FormatIssue::NotAnArchive(format!("Failed to read {DESCRIPTOR_NAME}: {e}"))
    })?;

    Ok(content)
}
