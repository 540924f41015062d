//! # targz TAR Encoding (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//!
//! ## Overview
//!
//! This module walks a source directory and serializes every filesystem entry
//! into a `tar::Builder`. It knows nothing about where the bytes go: the
//! builder can wrap the gzip file sink or an in-memory buffer.
//!
//! ## Architecture
//!
//! - Traversal uses `walkdir` with links not followed and children sorted by
//!   file name, so the same tree always produces the same entry order. A
//!   directory is always emitted before its children.
//! - Each entry gets a GNU header filled from its `lstat` metadata (mode,
//!   ownership, mtime, type). The source root itself is the exception: it is
//!   stat'ed through any symlink, so a source given as a link to a directory
//!   is recorded as that directory. Names are relative to the source's
//!   parent, so archiving `/a/b/D` yields `D`, `D/...`.
//! - Regular files stream their content right after the header. A file that
//!   shrinks while being read aborts the run rather than producing an entry
//!   whose payload disagrees with its header. Failures reading the file are
//!   reported as filesystem errors, failures writing the archive as encoding
//!   errors, even though both surface through the same `tar` call.
//! - Symbolic links record their target verbatim and are never followed.
//! - Sockets cannot be represented in tar and are skipped. FIFOs and device
//!   nodes become header-only entries of their own type.
//!
use crate::common::fs::paths::{archive_root_prefix, entry_name}; // Entry naming relative to the source's parent
use crate::core::error::{Result, TargzError}; // Standard Result and error kinds
use std::error::Error as StdError;
use std::fmt;
use std::fs::{self, File, FileType, Metadata};
use std::io::{self, Read, Write};
use std::path::Path;
use tar::{Builder, EntryType, Header, HeaderMode}; // TAR archive construction
use tracing::debug; // Logging utilities
use walkdir::WalkDir; // Recursive, sorted directory traversal

/// Counts of what a run wrote into the archive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub directories: u64,
    pub files: u64,
    pub symlinks: u64,
    /// FIFOs and device nodes.
    pub special: u64,
    pub skipped_sockets: u64,
    /// Total bytes of regular-file content, before compression.
    pub payload_bytes: u64,
}

impl ArchiveSummary {
    /// Number of entries recorded in the archive.
    pub fn entries(&self) -> u64 {
        self.directories + self.files + self.symlinks + self.special
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    File,
    Symlink,
    Socket,
    Special,
}

fn classify(ft: &FileType) -> EntryKind {
    if ft.is_symlink() {
        return EntryKind::Symlink;
    }
    if ft.is_dir() {
        return EntryKind::Directory;
    }
    if ft.is_file() {
        return EntryKind::File;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if ft.is_socket() {
            return EntryKind::Socket;
        }
    }
    EntryKind::Special
}

/// Appends every entry under `source` (including `source` itself) to `builder`.
///
/// # Arguments
///
/// * `builder` - The tar builder to append to. Its inner writer receives raw tar bytes.
/// * `source` - Absolute path of the directory to archive. If it is a symlink
///   to a directory, the directory is archived under the link's name.
/// * `exclude` - A path that must never be archived, normally the archive
///   being written when it lives inside the source tree.
///
/// # Returns
///
/// * `Result<ArchiveSummary>` - Counts of everything written (and skipped).
///
/// # Errors
///
/// - `TargzError::PathResolution` if `source` has no final component.
/// - `TargzError::FileSystem` if listing, stat, link-read, opening or reading a file fails.
/// - `TargzError::Encoding` if the builder rejects a header or payload write.
pub fn write_tree<W: Write>(
    builder: &mut Builder<W>,
    source: &Path,
    exclude: Option<&Path>,
) -> Result<ArchiveSummary> {
    let prefix = archive_root_prefix(source)?;
    let mut summary = ArchiveSummary::default();

    for entry in WalkDir::new(source).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(walk_error)?;
        let path = entry.path();
        if exclude == Some(path) {
            debug!("Not adding the archive to itself: {}", path.display());
            continue;
        }
        // Depth 0 is the source itself, which walkdir already descended through.
        let meta = if entry.depth() == 0 {
            fs::metadata(path).map_err(|e| TargzError::fs(path, e))?
        } else {
            entry.metadata().map_err(walk_error)?
        };
        let name = entry_name(path, prefix)?;
        append_entry(builder, path, name, &meta, &mut summary)?;
    }

    Ok(summary)
}

fn walk_error(err: walkdir::Error) -> anyhow::Error {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    TargzError::fs(path, io::Error::from(err)).into()
}

/// Writes the header (and payload, for regular files) of one entry.
///
/// # Arguments
///
/// * `builder` - The tar builder being filled.
/// * `path` - Where the entry lives on disk; used for reading and in errors.
/// * `name` - The entry's name inside the archive.
/// * `meta` - Metadata the header is built from. Its file type picks the entry kind.
/// * `summary` - Counters updated for whatever was written or skipped.
///
/// # Returns
///
/// * `Result<()>` - `Ok(())` once the entry is written, or skipped if it is a socket.
///
/// # Errors
///
/// * `TargzError::FileSystem` if the link target or file content cannot be read.
/// * `TargzError::Encoding` if the builder cannot write the entry.
fn append_entry<W: Write>(
    builder: &mut Builder<W>,
    path: &Path,
    name: &Path,
    meta: &Metadata,
    summary: &mut ArchiveSummary,
) -> Result<()> {
    let encode = |e: io::Error| TargzError::encoding(path, e);

    match classify(&meta.file_type()) {
        EntryKind::Socket => {
            debug!("Skipping socket {}", path.display());
            summary.skipped_sockets += 1;
            return Ok(());
        }
        EntryKind::Directory => {
            let mut header = header_for(meta, 0);
            builder
                .append_data(&mut header, name, io::empty())
                .map_err(encode)?;
            summary.directories += 1;
        }
        EntryKind::Symlink => {
            let target = fs::read_link(path).map_err(|e| TargzError::fs(path, e))?;
            let mut header = header_for(meta, 0);
            header.set_entry_type(EntryType::Symlink);
            builder
                .append_link(&mut header, name, &target)
                .map_err(encode)?;
            debug!("{} -> {}", name.display(), target.display());
            summary.symlinks += 1;
        }
        EntryKind::File => {
            let file = File::open(path).map_err(|e| TargzError::fs(path, e))?;
            let len = meta.len();
            let mut header = header_for(meta, len);
            builder
                .append_data(&mut header, name, FixedLength::new(file, len))
                .map_err(|e| payload_error(path, e))?;
            summary.files += 1;
            summary.payload_bytes += len;
        }
        EntryKind::Special => {
            let mut header = header_for(meta, 0);
            builder
                .append_data(&mut header, name, io::empty())
                .map_err(encode)?;
            summary.special += 1;
        }
    }

    debug!("Added {}", name.display());
    Ok(())
}

fn header_for(meta: &Metadata, size: u64) -> Header {
    let mut header = Header::new_gnu();
    header.set_metadata_in_mode(meta, HeaderMode::Complete);
    header.set_size(size);
    header
}

/// Sorts an error out of `append_data` by which side of the copy failed.
///
/// Errors raised by [`FixedLength`] come from reading the source file and
/// become `FileSystem`; anything else came from the archive sink.
fn payload_error(path: &Path, err: io::Error) -> TargzError {
    if !err.get_ref().is_some_and(|inner| inner.is::<SourceReadError>()) {
        return TargzError::encoding(path, err);
    }
    let kind = err.kind();
    match err.into_inner().map(|inner| inner.downcast::<SourceReadError>()) {
        Some(Ok(read)) => TargzError::fs(path, read.0),
        _ => TargzError::fs(path, io::Error::from(kind)),
    }
}

/// Marks an I/O error as coming from the file being archived.
#[derive(Debug)]
struct SourceReadError(io::Error);

impl fmt::Display for SourceReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for SourceReadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}

fn source_read_error(err: io::Error) -> io::Error {
    io::Error::new(err.kind(), SourceReadError(err))
}

/// Yields exactly `remaining` bytes from `inner`, failing if it ends early.
///
/// Every error it returns wraps a [`SourceReadError`], keeping the original kind.
struct FixedLength<R> {
    inner: io::Take<R>,
    remaining: u64,
}

impl<R: Read> FixedLength<R> {
    fn new(inner: R, len: u64) -> Self {
        Self {
            inner: inner.take(len),
            remaining: len,
        }
    }
}

impl<R: Read> Read for FixedLength<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf).map_err(source_read_error)?;
        if n == 0 && self.remaining > 0 && !buf.is_empty() {
            return Err(source_read_error(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file shrank while archiving ({} bytes missing)", self.remaining),
            )));
        }
        self.remaining -= n as u64;
        Ok(n)
    }
}
