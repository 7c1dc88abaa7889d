use std::path::PathBuf;
use thiserror::Error;

/// Why an input file could not be read as a GeoGebra archive.
#[derive(Debug, Error)]
pub enum FormatIssue {
    /// The file is not a readable ZIP container
    #[error("not a valid archive: {0}")]
    NotAnArchive(String),
    /// The ZIP container has no `geogebra.xml` member
    #[error("required descriptor missing: geogebra.xml not found in archive")]
    MissingDescriptor,
    /// The descriptor is not well-formed XML
    #[error("malformed descriptor: {0}")]
    MalformedDescriptor(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Input path does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Input exists but is not a usable archive
    #[error("Format error: {0}")]
    Format(#[from] FormatIssue),
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(String),
    /// CSV serialization or deserialization failed
    #[error("CSV error: {0}")]
    Csv(String),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// One or more archives of a batch run failed
    #[error("Failed to extract {failed} of {total} archive(s)")]
    Batch { failed: usize, total: usize },
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Csv(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
