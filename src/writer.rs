use crate::constants::{LABEL_COLUMN, UTF8_BOM, X_COLUMN, Y_COLUMN};
use crate::errors::{AppError, AppResult};
use crate::models::PointRecord;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Writes points to a CSV file with the header `点名称,x,y`.
///
/// Rows follow the order of `points`. Coordinates are written as numbers and
/// fields are quoted only when they contain a delimiter, quote or line break.
/// Lines end with CRLF. When `write_bom` is set the file starts with a UTF-8
/// byte-order mark so spreadsheet tools detect the encoding.
///
/// The rows go to a temporary file in the destination directory, which is renamed
/// over `path` only once everything has been written. A failed write leaves no
/// file behind and an existing file at `path` untouched.
///
/// # Errors
///
/// Returns `Io` if the file cannot be created, written or moved into place,
/// `Csv` if a record cannot be serialized.
pub fn write_points(path: &Path, points: &[PointRecord], write_bom: bool) -> AppResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| {
        AppError::Io(format!(
            "Failed to create output file {}: {e}",
            path.display()
        ))
    })?;
    let mut out = BufWriter::new(tmp);
    if write_bom {
        out.write_all(UTF8_BOM)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(out);

    writer.write_record([LABEL_COLUMN, X_COLUMN, Y_COLUMN])?;
    for point in points {
        writer.serialize(point)?;
    }

    let out = writer
        .into_inner()
        .map_err(|e| AppError::Io(format!("Failed to flush CSV writer: {}", e.error())))?;
    let tmp = out
        .into_inner()
        .map_err(|e| AppError::Io(format!("Failed to flush output file: {}", e.error())))?;
    tmp.persist(path).map_err(|e| {
        AppError::Io(format!(
            "Failed to save output file {}: {}",
            path.display(),
            e.error
        ))
    })?;

    debug!(
        output = %path.display(),
        rows = points.len(),
        "CSV written"
    );
    Ok(())
}

/// Reads a CSV file produced by [`write_points`] back into records.
///
/// A leading byte-order mark is optional.
pub fn read_points(path: &Path) -> AppResult<Vec<PointRecord>> {
    let bytes = fs::read(path).map_err(|e| {
        AppError::Io(format!("Failed to read CSV file {}: {e}", path.display()))
    })?;
    let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content);

    let headers = reader.headers()?;
    if headers.iter().ne([LABEL_COLUMN, X_COLUMN, Y_COLUMN]) {
        return Err(AppError::Csv(format!(
            "Unexpected header in {}: {}",
            path.display(),
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }

    let points = reader
        .deserialize()
        .collect::<Result<Vec<PointRecord>, csv::Error>>()?;
    Ok(points)
}
