//! # targz Compensating Cleanup
//!
//! File: cli/src/common/fs/rollback.rs
//!
//! ## Overview
//!
//! An archive run creates things on disk before it knows whether it will
//! succeed: missing destination directories first, then the archive file.
//! `Rollback` records each of those as a cleanup action while setup proceeds.
//! If the guard is dropped without `commit()`, the actions run in reverse
//! order, leaving the filesystem as it was found.
//!
//! Cleanup is best-effort. A failed removal is logged and the remaining
//! actions still run; the error that triggered the rollback is what the
//! caller sees.
//!
use super::io::remove_path;
use std::path::PathBuf;
use tracing::{debug, warn};

/// One compensating action recorded during setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cleanup {
    /// Remove a file this run created.
    RemoveFile(PathBuf),
    /// Recursively remove a directory this run created.
    RemoveDirAll(PathBuf),
}

impl Cleanup {
    fn path(&self) -> &PathBuf {
        match self {
            Cleanup::RemoveFile(p) | Cleanup::RemoveDirAll(p) => p,
        }
    }
}

/// Ordered stack of cleanup actions, unwound on drop unless committed.
#[derive(Debug, Default)]
pub struct Rollback {
    actions: Vec<Cleanup>,
}

impl Rollback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an action to run if the operation does not complete.
    pub fn push(&mut self, action: Cleanup) {
        debug!("Registered rollback action: {:?}", action);
        self.actions.push(action);
    }

    /// Marks the operation successful; nothing will be undone.
    pub fn commit(mut self) {
        self.actions.clear();
    }

    /// Runs all recorded actions now, most recent first.
    pub fn unwind(&mut self) {
        while let Some(action) = self.actions.pop() {
            debug!("Rolling back: {:?}", action);
            if let Err(e) = remove_path(action.path()) {
                warn!(
                    "Cleanup of '{}' failed: {}",
                    action.path().display(),
                    e
                );
            }
        }
    }
}

impl Drop for Rollback {
    fn drop(&mut self) {
        self.unwind();
    }
}
