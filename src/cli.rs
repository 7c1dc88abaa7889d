use crate::batch::{extract_all, find_archives};
use crate::config::ExtractConfig;
use crate::errors::{AppError, AppResult};
use crate::extractor::extract_points_with_config;
use crate::ui::print_preview;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

// CLI metadata constants
const APP_NAME: &str = env!("CARGO_PKG_NAME");
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Builds the command-line definition.
pub fn command() -> Command<'static> {
    Command::new(APP_NAME)
        .version(APP_VERSION)
        .about(APP_ABOUT)
        .after_help(
            "Examples:\n  ggb-points calculus.ggb\n  ggb-points calculus.ggb output.csv\n  ggb-points --batch figures/ --config ggb-points.toml",
        )
        .arg(
            Arg::new("archive")
                .help("GeoGebra archive (.ggb); with --batch, a directory of archives")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .help("Output CSV path (default: <archive>_points.csv next to the archive)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("batch")
                .short('b')
                .long("batch")
                .help("Treat ARCHIVE as a directory and extract every archive below it")
                .conflicts_with("output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a TOML config file")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging (RUST_LOG takes precedence)")
                .action(ArgAction::SetTrue),
        )
}

/// Parses command-line arguments and runs the extraction.
///
/// A missing archive argument prints the usage message and exits with a
/// non-zero status. With `--batch` the archive argument names a directory and
/// every archive below it is extracted to its default output path.
///
/// # Errors
///
/// Returns the first fatal error of a single extraction, `InvalidInput` when a
/// directory is given without `--batch`, or `Batch` when any archive of a
/// batch run failed.
pub fn cli() -> AppResult<()> {
    let matches = command().get_matches();
    init_tracing(matches.get_flag("verbose"));
    run(&matches)
}

fn run(matches: &ArgMatches) -> AppResult<()> {
    let archive = matches
        .get_one::<PathBuf>("archive")
        .expect("archive is required");
    let output = matches.get_one::<PathBuf>("output");

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ExtractConfig::from_toml_file(path)?,
        None => ExtractConfig::default(),
    };

    if matches.get_flag("batch") {
        return run_batch(archive, &config);
    }
    if archive.is_dir() {
        return Err(AppError::InvalidInput(format!(
            "{} is a directory; pass --batch to extract every archive in it",
            archive.display()
        )));
    }

    let extraction = extract_points_with_config(archive, output.map(PathBuf::as_path), &config)?;
    if extraction.written {
        println!(
            "Extracted {} point(s), saved to: {}",
            extraction.points.len(),
            extraction.output_path.display()
        );
    } else {
        println!("No points found");
    }
    print_preview(&extraction.points, config.preview_limit);

    Ok(())
}

fn run_batch(dir: &Path, config: &ExtractConfig) -> AppResult<()> {
    let archives = find_archives(dir, &config.archive_extension)?;
    if archives.is_empty() {
        info!(
            dir = %dir.display(),
            extension = %config.archive_extension,
            "No archives found"
        );
        println!("No .{} archives found in {}", config.archive_extension, dir.display());
        return Ok(());
    }

    let summary = extract_all(&archives, config)?;
    for (path, extraction) in &summary.succeeded {
        if extraction.written {
            println!(
                "  {}: {} point(s) -> {}",
                path.display(),
                extraction.points.len(),
                extraction.output_path.display()
            );
        } else {
            println!("  {}: no points found", path.display());
        }
    }
    for (path, error) in &summary.failed {
        eprintln!("  {}: {error}", path.display());
    }
    println!(
        "Processed {} archive(s), {} point(s) in total",
        summary.total(),
        summary.point_count()
    );

    summary.into_result().map(|_| ())
}

/// Installs the console subscriber; `RUST_LOG` overrides the default level.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignored when a global subscriber is already set.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
