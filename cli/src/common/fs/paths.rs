//! # targz Path Normalization
//!
//! File: cli/src/common/fs/paths.rs
//!
//! ## Overview
//!
//! Both the source directory and the destination archive are resolved to
//! absolute, lexically clean paths before any I/O happens. Resolution is
//! purely lexical: symlinks in the input are not resolved, because the
//! destination usually does not exist yet and the source's own name must
//! survive as the archive's top-level entry.
//!
use crate::core::error::{Result, TargzError}; // Standard Result and error kinds
use std::path::{Component, Path, PathBuf}; // Lexical path manipulation

/// Resolves `path` to an absolute path.
///
/// Relative paths are joined onto the current working directory. The result is
/// cleaned lexically: `.` components are dropped, `..` removes the previous
/// component, and trailing separators disappear (`/data/src/` becomes `/data/src`).
/// Symlinks are not resolved, so the source keeps the name it was given.
///
/// # Arguments
///
/// * `path` - The path as typed by the caller, relative or absolute.
///
/// # Returns
///
/// * `Result<PathBuf>` - The cleaned absolute path.
///
/// # Errors
///
/// Returns `TargzError::PathResolution` if `path` is empty or the current
/// directory cannot be determined.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(TargzError::PathResolution {
            path: path.to_path_buf(),
            reason: "path is empty".into(),
        }
        .into());
    }

    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| TargzError::PathResolution {
            path: path.to_path_buf(),
            reason: format!("current directory is unavailable: {e}"),
        })?;
        cwd.join(path)
    };

    Ok(clean(&joined))
}

fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str())
            }
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
        }
    }
    out
}

/// Returns the directory whose prefix is stripped from every entry name, i.e.
/// the parent of `source`. Archiving `/a/b/D` yields entries rooted at `D/`.
///
/// # Errors
///
/// Returns `TargzError::PathResolution` if `source` has no final component
/// (for example `/`), since the archive would have no top-level name.
pub fn archive_root_prefix(source: &Path) -> Result<&Path> {
    match (source.file_name(), source.parent()) {
        (Some(_), Some(parent)) => Ok(parent),
        _ => Err(TargzError::PathResolution {
            path: source.to_path_buf(),
            reason: "source directory has no name to root the archive at".into(),
        }
        .into()),
    }
}

/// Computes the name recorded in the archive for `path`.
pub fn entry_name<'a>(path: &'a Path, prefix: &Path) -> Result<&'a Path> {
    path.strip_prefix(prefix).map_err(|_| {
        TargzError::PathResolution {
            path: path.to_path_buf(),
            reason: format!("not located under '{}'", prefix.display()),
        }
        .into()
    })
}
