//! # targz Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates (`archive.rs`, `compress.rs`,
//! `main_tests.rs`): building the sample tree, running the binary in an
//! isolated environment, and reading produced archives back.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::{Archive, EntryType};

/// # Get targz Command (`targz_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `targz` binary, with the
/// working directory and user config directory pointed at `sandbox` so no
/// real configuration file leaks into the test.
pub fn targz_cmd(sandbox: &Path) -> Command {
    let mut cmd = Command::cargo_bin("targz").expect("Failed to find targz binary for testing");
    cmd.current_dir(sandbox)
        .env("XDG_CONFIG_HOME", sandbox.join(".config"))
        .env("HOME", sandbox)
        .env_remove("RUST_LOG");
    cmd
}

/// One decoded archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedEntry {
    /// Entry name without any trailing `/`.
    pub name: String,
    pub kind: EntryType,
    pub content: Vec<u8>,
    pub link_target: Option<PathBuf>,
    pub mode: u32,
}

/// Decompresses and decodes every entry of a `.tar.gz` file, in archive order.
pub fn read_archive(path: &Path) -> Vec<ArchivedEntry> {
    let file = File::open(path).expect("archive should exist");
    let mut archive = Archive::new(GzDecoder::new(file));
    let mut out = Vec::new();
    for entry in archive.entries().expect("archive should be readable") {
        let mut entry = entry.expect("entry should decode");
        let name = entry
            .path()
            .expect("entry path")
            .to_string_lossy()
            .trim_end_matches('/')
            .to_string();
        let kind = entry.header().entry_type();
        let mode = entry.header().mode().expect("entry mode");
        let link_target = entry
            .link_name()
            .expect("link name")
            .map(|l| l.into_owned());
        let mut content = Vec::new();
        entry.read_to_end(&mut content).expect("entry content");
        out.push(ArchivedEntry {
            name,
            kind,
            content,
            link_target,
            mode,
        });
    }
    out
}

/// Finds an entry by name, panicking with the full listing if absent.
pub fn entry<'a>(entries: &'a [ArchivedEntry], name: &str) -> &'a ArchivedEntry {
    entries.iter().find(|e| e.name == name).unwrap_or_else(|| {
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        panic!("entry '{name}' not in archive: {names:?}")
    })
}

/// Builds the sample tree under `base`:
///
/// ```text
/// my_folder/
///   empty/
///   my_sub_folder/
///     my_file.txt      "example data\n"
///     my_link -> <absolute path of my_file.txt>   (unix only)
/// ```
///
/// Returns the path of `my_folder`.
pub fn create_example_tree(base: &Path) -> PathBuf {
    let directory = base.join("my_folder");
    let sub_directory = directory.join("my_sub_folder");
    fs::create_dir_all(&sub_directory).expect("mkdir sub folder");
    fs::create_dir_all(directory.join("empty")).expect("mkdir empty");
    fs::write(sub_directory.join("my_file.txt"), "example data\n").expect("write file");
    #[cfg(unix)]
    std::os::unix::fs::symlink(
        sub_directory.join("my_file.txt"),
        sub_directory.join("my_link"),
    )
    .expect("create symlink");
    directory
}
