//! Example: packaging a directory with targz
//!
//! Run with: `cargo run --example create_archive`
//!
//! Builds a small tree in a temporary directory, compresses it next to the
//! tree, and prints the location so the archive can be inspected with
//! `tar tzvf`.

use std::fs;
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    // Kept after exit so the archive can be inspected.
    let tmp_dir = tempfile::Builder::new()
        .prefix("targz-example")
        .tempdir()?
        .keep();
    let dir_to_compress = create_example_data(&tmp_dir)?;

    let archive = tmp_dir.join("my_archive.tar.gz");
    targz::compress(&dir_to_compress, &archive)?;

    println!("{}", archive.display());
    Ok(())
}

fn create_example_data(tmp_dir: &Path) -> anyhow::Result<PathBuf> {
    let directory = tmp_dir.join("my_folder");
    let sub_directory = directory.join("my_sub_folder");
    fs::create_dir_all(&sub_directory)?;
    fs::create_dir_all(directory.join("empty"))?;
    fs::write(sub_directory.join("my_file.txt"), "example data\n")?;

    #[cfg(unix)]
    std::os::unix::fs::symlink(
        sub_directory.join("my_file.txt"),
        sub_directory.join("my_link"),
    )?;

    Ok(directory)
}
