//! File system access used by the application core.

use super::{FileDescriptor, RawFile};
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Metadata the core needs to notice external modifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStats {
    /// Modification time in milliseconds since the Unix epoch
    pub last_modified: Option<u64>,
}

/// Reads and writes diagram files.
pub trait FileSystem {
    /// Read a file from disk including its modification stamp.
    fn read_file(&mut self, path: &Path) -> Result<RawFile>;

    /// Write a saved file, returning the descriptor with a fresh stamp.
    fn write_file(&mut self, file: &FileDescriptor) -> Result<FileDescriptor>;

    /// Stat the file a descriptor points at.
    fn read_file_stats(&mut self, file: &FileDescriptor) -> Result<FileStats>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Native Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn stats(path: &Path) -> Result<FileStats> {
        let metadata = fs::metadata(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let last_modified = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64);

        Ok(FileStats { last_modified })
    }
}

impl FileSystem for NativeFileSystem {
    fn read_file(&mut self, path: &Path) -> Result<RawFile> {
        let contents = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let stats = Self::stats(path)?;

        debug!("Read {} ({} bytes)", path.display(), contents.len());

        let mut raw = RawFile::new(path.to_path_buf(), contents);
        raw.last_modified = stats.last_modified;
        Ok(raw)
    }

    fn write_file(&mut self, file: &FileDescriptor) -> Result<FileDescriptor> {
        let path = file.path.as_ref().ok_or_else(|| {
            Error::Application(format!("'{}' has no location to write to", file.name))
        })?;

        fs::write(path, &file.contents).map_err(|e| Error::write_failed(path.clone(), e))?;
        let stats = Self::stats(path)?;

        debug!("Wrote {} ({} bytes)", path.display(), file.contents.len());
        Ok(file.with_last_modified(stats.last_modified))
    }

    fn read_file_stats(&mut self, file: &FileDescriptor) -> Result<FileStats> {
        match &file.path {
            Some(path) => match Self::stats(path) {
                // A file that vanished has no stamp to compare against
                Err(Error::FileRead { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                    debug!("{} no longer exists", path.display());
                    Ok(FileStats::default())
                }
                other => other,
            },
            None => Ok(FileStats::default()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
