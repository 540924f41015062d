//! # targz Compress Command
//!
//! File: cli/src/commands/compress.rs
//!
//! ## Overview
//!
//! Implements `targz compress <SOURCE> <DESTINATION>`. The command resolves the
//! effective archive options from configuration and flags, then hands off to
//! the library's `compress_with`.
//!
//! ## Examples
//!
//! ```bash
//! # Archive ./project into backups/project.tar.gz (creating backups/ if needed)
//! targz compress ./project backups/project.tar.gz
//!
//! # Maximum compression, home-relative paths
//! targz compress --level 9 ~/notes ~/archives/notes.tar.gz
//! ```
//!
use anyhow::Context; // For adding contextual information to errors
use clap::Parser; // For deriving argument parsing
use std::path::{Path, PathBuf};
use targz::common::archive::{compress_with, ArchiveOptions, ArchiveSummary, MAX_COMPRESSION_LEVEL};
use targz::core::config::{self, Config};
use targz::core::error::Result;
use tracing::{debug, info};

/// # Compress Command Arguments (`CompressArgs`)
#[derive(Parser, Debug)]
pub struct CompressArgs {
    /// Directory to archive. Its last path component becomes the archive's top-level entry.
    pub source: PathBuf,

    /// Path of the `.tar.gz` file to write. Missing parent directories are created.
    pub destination: PathBuf,

    /// Gzip compression level (0-9). Overrides `archive.compression_level` from config.
    #[arg(long, short, value_parser = clap::value_parser!(u32).range(0..=MAX_COMPRESSION_LEVEL as i64))]
    pub level: Option<u32>,
}

/// # Handle Compress Command (`handle_compress`)
///
/// 1. Loads the layered configuration (user file, then project `.targz.toml`).
/// 2. Applies command-line overrides.
/// 3. Expands `~` in both paths and runs the archiver.
/// 4. Prints a one-line summary on success.
///
/// ## Errors
///
/// Propagates configuration errors and every archiver error unchanged, so the
/// caller can still downcast to `TargzError`.
pub fn handle_compress(args: CompressArgs) -> Result<()> {
    info!("Handling compress command with args: {:?}", args);

    let config = config::load_config().context("Failed to load configuration")?;
    let options = effective_options(&config, &args);
    debug!("Effective archive options: {:?}", options);

    let source = expand_home(&args.source);
    let destination = expand_home(&args.destination);

    let summary = compress_with(&source, &destination, &options)?;
    println!("{}", summary_line(&destination, &summary));
    Ok(())
}

/// The `--level` flag wins over every configuration layer.
fn effective_options(config: &Config, args: &CompressArgs) -> ArchiveOptions {
    let mut options = config.archive_options();
    if let Some(level) = args.level {
        options.compression_level = level;
    }
    options
}

/// Expands a leading `~`; non-UTF-8 paths are used as given.
fn expand_home(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}

fn summary_line(destination: &Path, summary: &ArchiveSummary) -> String {
    let mut line = format!(
        "Created {} ({} entries: {} directories, {} files, {} symlinks)",
        destination.display(),
        summary.entries(),
        summary.directories,
        summary.files,
        summary.symlinks
    );
    if summary.skipped_sockets > 0 {
        line.push_str(&format!(", skipped {} socket(s)", summary.skipped_sockets));
    }
    line
}
