//! # targz Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem glue around the archiver: resolving input paths, preparing the
//! destination directory, and undoing whatever a failed run created.
//!
//! ## Architecture
//!
//! - **`paths`**: Lexical absolute-path resolution and archive entry naming.
//! - **`io`**: Destination directory creation that reports what it created, plus best-effort removal.
//! - **`rollback`**: The `Rollback` guard that unwinds recorded cleanup actions on failure.
//!
//! ```rust,no_run
//! use targz::common::fs::{io, paths, rollback::{Cleanup, Rollback}};
//! use std::path::Path;
//!
//! # fn run_example() -> targz::core::error::Result<()> {
//! let dest = paths::absolutize(Path::new("out/archive.tar.gz"))?;
//! let mut rollback = Rollback::new();
//! if let Some(created) = io::create_parent_dirs(dest.parent().unwrap())? {
//!     rollback.push(Cleanup::RemoveDirAll(created));
//! }
//! // ... write the archive ...
//! rollback.commit();
//! # Ok(())
//! # }
//! ```
//!

/// Destination directory creation and removal helpers.
pub mod io;
/// Path resolution and entry naming.
pub mod paths;
/// Reverse-order cleanup of partial artifacts.
pub mod rollback;
