use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory {path:?} missing or not writable: {source}")]
    OutputDir { path: PathBuf, source: io::Error },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ensure the directory that will hold `path` exists; create it if missing.
///
/// A bare file name (no parent component) needs nothing.
pub fn ensure_parent_dir(path: &Path) -> Result<(), PersistError> {
    let Some(dir) = parent_dir(path) else {
        return Ok(());
    };
    if dir.exists() && !dir.is_dir() {
        return Err(PersistError::OutputDir {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "path is not a directory"),
        });
    }
    fs::create_dir_all(dir).map_err(|source| PersistError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|dir| !dir.as_os_str().is_empty())
}

/// Write a whole file by filling a temp file beside it and renaming it into place.
pub struct AtomicFileWriter {
    target: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(target: PathBuf) -> Self {
        Self { target }
    }

    pub fn write(&self, content: &[u8]) -> Result<&Path, PersistError> {
        ensure_parent_dir(&self.target)?;

        let dir = parent_dir(&self.target).unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&self.target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(&self.target)
    }
}
