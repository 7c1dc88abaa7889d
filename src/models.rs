use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A labeled 2D point taken from a GeoGebra descriptor.
///
/// Field order matches the CSV column order; the label is written under the
/// `点名称` header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    #[serde(rename = "点名称")]
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl PointRecord {
    pub fn new(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }
}

/// A point element whose coordinates could not be converted to numbers.
///
/// Carries the raw attribute values so the message can show what was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionWarning {
    pub label: String,
    pub x: String,
    pub y: String,
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Coordinates of point '{}' could not be converted to numbers (x={}, y={})",
            self.label, self.x, self.y
        )
    }
}

/// Outcome of a single archive extraction.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Retained points in document order
    pub points: Vec<PointRecord>,
    /// One entry per point element dropped for unparseable coordinates
    pub warnings: Vec<ConversionWarning>,
    /// Destination of the CSV file (resolved even when nothing was written)
    pub output_path: PathBuf,
    /// Whether the CSV file was written; false when no points were found
    pub written: bool,
}
