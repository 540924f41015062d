//! # targz Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error kinds produced by the archiver. Every failure
//! path of `compress` surfaces one of these kinds, wrapped in an `anyhow::Error`
//! that may carry additional context about the step that failed.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `TargzError`: A custom error enum using `thiserror`, one variant per failure kind
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The kinds are:
//! - Path resolution failures (a path cannot be made absolute or has no final component)
//! - Filesystem access failures (stat, listing, read, link-read, create, remove)
//! - Structural failures (a path component exists but is not a directory)
//! - Encoding and compression failures (tar header/payload or gzip stream writes)
//! - Precondition failures (the source directory is empty)
//! - Configuration failures (invalid options or config files)
//!
//! ## Examples
//!
//! Recovering the kind from a returned error:
//!
//! ```rust
//! use targz::core::error::TargzError;
//!
//! let err = targz::compress("/definitely/not/here", "/tmp/out.tar.gz").unwrap_err();
//! match err.downcast_ref::<TargzError>() {
//!     Some(TargzError::FileSystem { path, .. }) => println!("cannot access {}", path.display()),
//!     Some(other) => println!("archive failed: {other}"),
//!     None => println!("unexpected: {err:#}"),
//! }
//! ```
//!
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds reported by the archiver.
#[derive(Error, Debug)]
pub enum TargzError {
    #[error("Cannot resolve path '{}': {reason}", path.display())]
    PathResolution { path: PathBuf, reason: String },

    #[error("Filesystem error on '{}': {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Path exists but is not a directory: '{}'", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to encode '{}' into the archive: {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Input directory is empty: '{}'", path.display())]
    EmptySource { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TargzError {
    /// Wraps an I/O error raised while touching `path` on disk.
    pub fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TargzError::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Wraps an I/O error raised by the tar encoder or gzip stream for `path`.
    pub fn encoding(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TargzError::Encoding {
            path: path.into(),
            source,
        }
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition; the underlying `TargzError`
/// stays reachable through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
