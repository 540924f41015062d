//! # targz Library
//!
//! File: cli/src/lib.rs
//!
//! ## Overview
//!
//! `targz` packages a directory tree into a compressed `.tar.gz` archive that
//! any conforming tar/gzip tool can read. Relative paths, file contents,
//! directories (empty ones included), symbolic links, and permission bits are
//! preserved. Entries that tar cannot represent, such as sockets, are skipped.
//!
//! The whole public surface is one call:
//!
//! ```rust,no_run
//! targz::compress("path/to/the/directory/to/compress", "my_archive.tar.gz")?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! This creates `./my_archive.tar.gz` containing the folder `compress` (the last
//! component of the input path) and everything below it.
//!
//! ## Architecture
//!
//! - `common::archive`: the archiver (`compress`, `compress_with`)
//! - `common::fs`: path normalization, destination creation, rollback
//! - `core::error`: `TargzError` kinds and the `Result` alias
//! - `core::config`: layered TOML configuration used by the `targz` binary
//!
pub mod common;
pub mod core;

pub use crate::common::archive::{compress, compress_with, ArchiveOptions, ArchiveSummary};
pub use crate::core::error::{Result, TargzError};
