//! Zip packing and extraction.
//!
//! The archive boundary is deliberately thin: relative paths in, relative
//! paths out, zero-byte files preserved (materialized trees are nothing
//! but zero-byte files).

use std::fs::{self, File};
use std::io;
use std::path::Path;

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Package the contents of `src` into a zip at `zip_path`.
///
/// Entries are stored relative to `src` (the archive root holds the
/// directory's contents, not the directory itself) and walked in sorted
/// order so repeated packs of the same tree are byte-identical.
pub fn pack_directory(src: &Path, zip_path: &Path) -> io::Result<()> {
    let file = File::create(zip_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?
            .to_string_lossy()
            .replace('\\', "/");

        if entry.file_type().is_dir() {
            writer
                .add_directory(relative, options)
                .map_err(io::Error::other)?;
        } else {
            writer
                .start_file(relative, options)
                .map_err(io::Error::other)?;
            let mut source = File::open(entry.path())?;
            io::copy(&mut source, &mut writer)?;
        }
    }

    writer.finish().map_err(io::Error::other)?;
    Ok(())
}

/// Extract `zip_path` into `dest`.
///
/// Entry names run through `enclosed_name`, so hostile archives cannot
/// write outside the destination; unsafe entries are logged and skipped.
pub fn extract_archive(zip_path: &Path, dest: &Path) -> io::Result<()> {
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file).map_err(io::Error::other)?;
    fs::create_dir_all(dest)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(io::Error::other)?;
        let Some(relative) = entry.enclosed_name() else {
            eprintln!(
                "[treeforge][warn] skipping archive entry with unsafe path: {}",
                entry.name()
            );
            continue;
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_tree(root: &Path) {
        fs::create_dir_all(root.join("src/deep")).unwrap();
        fs::create_dir_all(root.join("empty-dir")).unwrap();
        fs::write(root.join("README.md"), "").unwrap();
        fs::write(root.join("src/main.rs"), "").unwrap();
        fs::write(root.join("src/deep/mod.rs"), "").unwrap();
    }

    #[test]
    fn pack_then_extract_round_trips() {
        let source = TempDir::new().unwrap();
        sample_tree(source.path());

        let staging = TempDir::new().unwrap();
        let zip_path = staging.path().join("out.zip");
        pack_directory(source.path(), &zip_path).unwrap();

        let dest = TempDir::new().unwrap();
        extract_archive(&zip_path, dest.path()).unwrap();

        assert!(dest.path().join("README.md").is_file());
        assert!(dest.path().join("src/main.rs").is_file());
        assert!(dest.path().join("src/deep/mod.rs").is_file());
        assert!(dest.path().join("empty-dir").is_dir());
    }

    #[test]
    fn zero_byte_files_survive() {
        let source = TempDir::new().unwrap();
        fs::write(source.path().join("empty.txt"), "").unwrap();

        let staging = TempDir::new().unwrap();
        let zip_path = staging.path().join("out.zip");
        pack_directory(source.path(), &zip_path).unwrap();

        let dest = TempDir::new().unwrap();
        extract_archive(&zip_path, dest.path()).unwrap();

        let metadata = fs::metadata(dest.path().join("empty.txt")).unwrap();
        assert_eq!(metadata.len(), 0);
    }

    #[test]
    fn archive_stores_relative_paths() {
        let source = TempDir::new().unwrap();
        sample_tree(source.path());

        let staging = TempDir::new().unwrap();
        let zip_path = staging.path().join("out.zip");
        pack_directory(source.path(), &zip_path).unwrap();

        let archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.iter().any(|n| n.trim_end_matches('/') == "README.md"));
        assert!(names.iter().all(|n| !n.starts_with('/')));
    }

    #[test]
    fn corrupted_archive_is_an_error() {
        let staging = TempDir::new().unwrap();
        let bogus = staging.path().join("bogus.zip");
        fs::write(&bogus, b"this is not a zip file").unwrap();

        let dest = TempDir::new().unwrap();
        assert!(extract_archive(&bogus, dest.path()).is_err());
    }
}
