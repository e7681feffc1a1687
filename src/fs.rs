//! Filesystem primitives the reclaimer is built on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The filesystem operations needed to tear down a footprint.
///
/// Every path handed in is absolute. Implementations report failures as
/// `io::Error`; the reclaimer turns them into warnings and never propagates them.
pub trait Filesystem {
    /// Whether anything (file, directory or symlink) exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Immediate children of a directory
    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Delete a single non-directory entry. A missing path is not an error.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Delete a directory that is expected to be empty
    fn remove_empty_dir(&self, path: &Path) -> io::Result<()>;

    /// Size in bytes when `path` is a regular file
    fn file_size(&self, path: &Path) -> Option<u64>;
}

/// `Filesystem` backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        // Use symlink_metadata so a dangling symlink still counts as present
        fs::symlink_metadata(path).is_ok()
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut children = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        children.sort();
        Ok(children)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            result => result,
        }
    }

    fn remove_empty_dir(&self, path: &Path) -> io::Result<()> {
        match fs::remove_dir(path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            result => result,
        }
    }

    fn file_size(&self, path: &Path) -> Option<u64> {
        fs::symlink_metadata(path)
            .ok()
            .filter(|meta| meta.is_file())
            .map(|meta| meta.len())
    }
}
