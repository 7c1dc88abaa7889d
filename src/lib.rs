//! ggb-points library
//!
//! This crate provides the core functionality for the `ggb-points` binary.
//! Keep the crate root minimal: implementation and tests live in their modules.
//!
//! ## Overview
//!
//! A GeoGebra `.ggb` file is a ZIP archive whose `geogebra.xml` member describes
//! the construction. The library pulls every labeled point out of that descriptor
//! and writes the points to CSV:
//!
//! - [`extractor`] - Opens the archive, reads the descriptor and runs one extraction
//! - [`parser`] - Scans the descriptor for point elements and converts their coordinates
//! - [`writer`] - Writes and reads the `点名称,x,y` CSV format
//! - [`batch`] - Extracts every archive below a directory in parallel
//! - [`cli`] - Command-line interface
//! - [`config`] - Optional TOML configuration
//! - [`models`] - Point records and extraction reports
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use ggb_points::{extractor, errors::AppResult};
//! use std::path::Path;
//!
//! # fn example() -> AppResult<()> {
//! // Writes calculus_points.csv next to the archive
//! let points = extractor::extract_points(Path::new("calculus.ggb"), None)?;
//! for point in &points {
//!     println!("{}: ({}, {})", point.label, point.x, point.y);
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod extractor;
pub mod models;
pub mod parser;
pub mod ui;
pub mod writer;
