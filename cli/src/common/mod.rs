//! # targz Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks of the archiver, kept apart from the command-line
//! front end (`commands`) and the infrastructure (`core`).
//!
//! ## Architecture
//!
//! - **`archive`**: Creates `.tar.gz` archives. Contains the top-level `compress`
//!   routine plus the `tar` (encoding) and `compression` (gzip sink) submodules.
//! - **`fs`**: Path resolution, destination directory creation, and rollback of
//!   partial artifacts.
//!
//! ```rust,no_run
//! use targz::common::{archive, fs};
//! use std::path::Path;
//!
//! # fn run_example() -> targz::core::error::Result<()> {
//! let source = fs::paths::absolutize(Path::new("./app_context"))?;
//! archive::compress(&source, "/tmp/context.tar.gz")?;
//! # Ok(())
//! # }
//! ```
//!

/// Archive creation (`compress`, tar encoding, gzip output).
pub mod archive;
/// Filesystem helpers (paths, directory creation, rollback).
pub mod fs;
