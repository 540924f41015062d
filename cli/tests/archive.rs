//! # targz Library Integration Tests
//!
//! File: cli/tests/archive.rs
//!
//! ## Overview
//!
//! End-to-end checks of `targz::compress` / `compress_with` against real
//! temporary directory trees: the produced archive is decoded with the `tar`
//! and `flate2` readers and compared with the source, and every failure path
//! is checked for leftover artifacts.
//!

mod common;
use common::*;
use std::fs;
use tar::EntryType;
use targz::{compress, compress_with, ArchiveOptions, TargzError};
use tempfile::tempdir;

fn kind_of(err: &anyhow::Error) -> &TargzError {
    err.downcast_ref::<TargzError>()
        .unwrap_or_else(|| panic!("expected a TargzError, got: {err:#}"))
}

/// The sample tree round-trips with names rooted at the source directory.
#[test]
fn test_example_tree_roundtrip() {
    let temp = tempdir().unwrap();
    let source = create_example_tree(temp.path());
    let archive_path = temp.path().join("my_archive.tar.gz");

    compress(&source, &archive_path).expect("compress should succeed");

    let entries = read_archive(&archive_path);
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    let mut expected = vec![
        "my_folder",
        "my_folder/empty",
        "my_folder/my_sub_folder",
        "my_folder/my_sub_folder/my_file.txt",
    ];
    if cfg!(unix) {
        expected.push("my_folder/my_sub_folder/my_link");
    }
    assert_eq!(names, expected);

    assert_eq!(entry(&entries, "my_folder").kind, EntryType::Directory);
    assert_eq!(entry(&entries, "my_folder/empty").kind, EntryType::Directory);
    let file = entry(&entries, "my_folder/my_sub_folder/my_file.txt");
    assert_eq!(file.kind, EntryType::Regular);
    assert_eq!(file.content, b"example data\n");

    #[cfg(unix)]
    {
        let link = entry(&entries, "my_folder/my_sub_folder/my_link");
        assert_eq!(link.kind, EntryType::Symlink);
        assert!(link.content.is_empty());
        assert_eq!(
            link.link_target.as_deref(),
            Some(source.join("my_sub_folder/my_file.txt").as_path())
        );
    }
}

/// Ancestors of the source never leak into entry names.
#[test]
fn test_top_level_naming() {
    let temp = tempdir().unwrap();
    let deep = temp.path().join("a/b/D");
    fs::create_dir_all(deep.join("x")).unwrap();
    fs::write(deep.join("x/y.txt"), "y").unwrap();
    let out = temp.path().join("d.tar.gz");

    compress(&deep, &out).unwrap();

    for e in read_archive(&out) {
        assert!(
            e.name == "D" || e.name.starts_with("D/"),
            "unexpected entry name {}",
            e.name
        );
    }
}

/// Trailing separators and `.`/`..` segments in the input are normalized away.
#[test]
fn test_source_path_normalization() {
    let temp = tempdir().unwrap();
    let source = create_example_tree(temp.path());
    let out = temp.path().join("n.tar.gz");
    let messy = format!("{}/./my_sub_folder/../", source.display());

    compress(&messy, &out).unwrap();

    let entries = read_archive(&out);
    assert_eq!(entries[0].name, "my_folder");
}

#[test]
fn test_creates_missing_destination_dirs() {
    let temp = tempdir().unwrap();
    let source = create_example_tree(temp.path());
    let out = temp.path().join("new/nested/out.tar.gz");

    compress(&source, &out).unwrap();

    assert!(out.is_file());
    assert!(!read_archive(&out).is_empty());
}

/// Calling twice into the same pre-existing directory never fails with "already exists".
#[test]
fn test_repeat_into_same_directory() {
    let temp = tempdir().unwrap();
    let source = create_example_tree(temp.path());
    let out_dir = temp.path().join("archives");

    compress(&source, out_dir.join("first.tar.gz")).unwrap();
    compress(&source, out_dir.join("second.tar.gz")).unwrap();
    // Overwriting an existing archive is allowed too.
    compress(&source, out_dir.join("first.tar.gz")).unwrap();

    assert_eq!(
        read_archive(&out_dir.join("first.tar.gz")),
        read_archive(&out_dir.join("second.tar.gz"))
    );
}

#[test]
fn test_empty_source_rejected_and_rolled_back() {
    let temp = tempdir().unwrap();
    let empty = temp.path().join("empty_src");
    fs::create_dir(&empty).unwrap();
    let out = temp.path().join("fresh/dir/out.tar.gz");

    let err = compress(&empty, &out).unwrap_err();

    assert!(matches!(kind_of(&err), TargzError::EmptySource { .. }));
    assert!(!out.exists());
    assert!(!temp.path().join("fresh").exists());
}

#[test]
fn test_missing_source_leaves_nothing_behind() {
    let temp = tempdir().unwrap();
    let existing_parent = temp.path().join("keep");
    fs::create_dir(&existing_parent).unwrap();
    let out = existing_parent.join("made/out.tar.gz");

    let err = compress(temp.path().join("does_not_exist"), &out).unwrap_err();

    assert!(matches!(kind_of(&err), TargzError::FileSystem { .. }));
    assert!(!existing_parent.join("made").exists());
    assert!(existing_parent.is_dir());
}

#[test]
fn test_source_is_a_file() {
    let temp = tempdir().unwrap();
    let file = temp.path().join("plain.txt");
    fs::write(&file, "x").unwrap();
    let out = temp.path().join("out.tar.gz");

    let err = compress(&file, &out).unwrap_err();

    assert!(matches!(kind_of(&err), TargzError::NotADirectory { .. }));
    assert!(!out.exists());
}

/// A file in the destination's parent chain blocks creation and nothing is written.
#[test]
fn test_destination_parent_is_a_file() {
    let temp = tempdir().unwrap();
    let source = create_example_tree(temp.path());
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "not a dir").unwrap();

    let err = compress(&source, blocker.join("sub/out.tar.gz")).unwrap_err();

    match kind_of(&err) {
        TargzError::NotADirectory { path } => assert_eq!(path, &blocker),
        other => panic!("unexpected error kind: {other:?}"),
    }
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a dir");
}

/// A destination that is an existing directory is reported and left untouched.
#[test]
fn test_destination_is_existing_directory() {
    let temp = tempdir().unwrap();
    let source = create_example_tree(temp.path());
    let occupied = temp.path().join("occupied.tar.gz");
    fs::create_dir(&occupied).unwrap();
    fs::write(occupied.join("precious"), "keep me").unwrap();

    let err = compress(&source, &occupied).unwrap_err();

    assert!(matches!(kind_of(&err), TargzError::FileSystem { .. }));
    assert_eq!(
        fs::read_to_string(occupied.join("precious")).unwrap(),
        "keep me"
    );
}

/// An archive written inside its own source tree does not contain itself.
#[test]
fn test_destination_inside_source() {
    let temp = tempdir().unwrap();
    let source = create_example_tree(temp.path());
    let out = source.join("self.tar.gz");

    compress(&source, &out).unwrap();

    let entries = read_archive(&out);
    assert!(entries.iter().all(|e| e.name != "my_folder/self.tar.gz"));
    entry(&entries, "my_folder/my_sub_folder/my_file.txt");
}

#[test]
fn test_compression_levels_decode_identically() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("levels");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("repetitive.txt"), "abc".repeat(10_000)).unwrap();

    let stored = temp.path().join("l0.tar.gz");
    let best = temp.path().join("l9.tar.gz");
    let s0 = compress_with(&source, &stored, &ArchiveOptions { compression_level: 0 }).unwrap();
    let s9 = compress_with(&source, &best, &ArchiveOptions { compression_level: 9 }).unwrap();

    assert_eq!(s0, s9);
    assert_eq!(s9.files, 1);
    assert_eq!(s9.payload_bytes, 30_000);
    assert_eq!(read_archive(&stored), read_archive(&best));
    assert!(fs::metadata(&best).unwrap().len() < fs::metadata(&stored).unwrap().len());
}

#[test]
fn test_invalid_level_rejected() {
    let temp = tempdir().unwrap();
    let source = create_example_tree(temp.path());
    let out = temp.path().join("bad.tar.gz");

    let err = compress_with(&source, &out, &ArchiveOptions { compression_level: 10 }).unwrap_err();

    assert!(matches!(kind_of(&err), TargzError::Config(_)));
    assert!(!out.exists());
}

#[cfg(unix)]
#[test]
fn test_socket_is_skipped() {
    use std::os::unix::net::UnixListener;

    let temp = tempdir().unwrap();
    let source = temp.path().join("with_socket");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("data.txt"), "data").unwrap();
    let _listener = UnixListener::bind(source.join("server.sock")).unwrap();
    let out = temp.path().join("sock.tar.gz");

    let summary = compress_with(&source, &out, &ArchiveOptions::default()).unwrap();

    assert_eq!(summary.skipped_sockets, 1);
    let entries = read_archive(&out);
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["with_socket", "with_socket/data.txt"]);
}

#[cfg(unix)]
#[test]
fn test_permission_bits_preserved() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().unwrap();
    let source = temp.path().join("perms");
    fs::create_dir(&source).unwrap();
    let script = source.join("run.sh");
    fs::write(&script, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o750)).unwrap();
    let out = temp.path().join("perms.tar.gz");

    compress(&source, &out).unwrap();

    let entries = read_archive(&out);
    assert_eq!(entry(&entries, "perms/run.sh").mode & 0o777, 0o750);
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_recorded() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("dangling");
    fs::create_dir(&source).unwrap();
    std::os::unix::fs::symlink("nowhere/at/all", source.join("broken")).unwrap();
    let out = temp.path().join("dangling.tar.gz");

    compress(&source, &out).unwrap();

    let entries = read_archive(&out);
    let link = entry(&entries, "dangling/broken");
    assert_eq!(link.kind, EntryType::Symlink);
    assert_eq!(
        link.link_target.as_deref(),
        Some(std::path::Path::new("nowhere/at/all"))
    );
}

/// A source path that is a symlink to a directory archives the directory
/// under the link's name, so the result extracts cleanly.
#[cfg(unix)]
#[test]
fn test_source_through_directory_symlink() {
    let temp = tempdir().unwrap();
    let real = temp.path().join("real");
    fs::create_dir(&real).unwrap();
    fs::write(real.join("a"), "a").unwrap();
    let link = temp.path().join("lnk");
    std::os::unix::fs::symlink(&real, &link).unwrap();
    let out = temp.path().join("o.tar.gz");

    let summary = compress_with(&link, &out, &ArchiveOptions::default()).unwrap();

    assert_eq!(summary.symlinks, 0);
    let entries = read_archive(&out);
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["lnk", "lnk/a"]);
    assert_eq!(entry(&entries, "lnk").kind, EntryType::Directory);
    assert_eq!(entry(&entries, "lnk/a").content, b"a");

    // The archive unpacks with the standard reader.
    let unpacked = temp.path().join("unpacked");
    let file = fs::File::open(&out).unwrap();
    tar::Archive::new(flate2::read::GzDecoder::new(file))
        .unpack(&unpacked)
        .unwrap();
    assert_eq!(fs::read_to_string(unpacked.join("lnk/a")).unwrap(), "a");
    assert!(!fs::symlink_metadata(unpacked.join("lnk"))
        .unwrap()
        .file_type()
        .is_symlink());
}

/// A directory that cannot be listed fails the walk after the archive file
/// exists. The file and the directories created for it are removed; the
/// directory that was already there stays.
#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_rolls_back_archive() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().unwrap();
    let source = temp.path().join("guarded");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("a.txt"), "a").unwrap();
    let locked = source.join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not stop root; nothing to check then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let keep = temp.path().join("keep");
    fs::create_dir(&keep).unwrap();
    let out = keep.join("new_parent/out.tar.gz");

    let result = compress(&source, &out);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let err = result.unwrap_err();
    assert!(matches!(kind_of(&err), TargzError::FileSystem { .. }));
    assert!(!out.exists());
    assert!(!keep.join("new_parent").exists());
    assert!(keep.is_dir());
}
