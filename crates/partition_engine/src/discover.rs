use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use partition_logging::partition_debug;
use thiserror::Error;
use walkdir::WalkDir;

use crate::loader::source_kind;

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("cannot access {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Expand files and directories into a flat list of supported files.
///
/// Directories are walked recursively in file-name order. Unsupported files given
/// directly are skipped. Results are absolute and each file appears once, at the
/// position it was first reached. Any filesystem error aborts the whole call.
pub fn discover_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>, DiscoverError> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for input in paths {
        let input = input.as_ref();
        if input.as_os_str().is_empty() {
            continue;
        }
        let meta = fs::metadata(input).map_err(|source| DiscoverError::Io {
            path: input.to_path_buf(),
            source,
        })?;

        if meta.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_dir() || source_kind(entry.path()).is_none() {
                    continue;
                }
                push_unique(entry.path(), &mut seen, &mut files)?;
            }
            continue;
        }

        if source_kind(input).is_some() {
            push_unique(input, &mut seen, &mut files)?;
        }
    }

    partition_debug!("discovered {} input files", files.len());
    Ok(files)
}

fn push_unique(
    path: &Path,
    seen: &mut HashSet<PathBuf>,
    files: &mut Vec<PathBuf>,
) -> Result<(), DiscoverError> {
    let abs = absolute_clean(path).map_err(|source| DiscoverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if seen.insert(abs.clone()) {
        files.push(abs);
    }
    Ok(())
}

/// Absolute form with `.` and `..` folded lexically; symlinks are not resolved.
fn absolute_clean(path: &Path) -> io::Result<PathBuf> {
    let abs = std::path::absolute(path)?;
    let mut clean = PathBuf::new();
    for component in abs.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                clean.pop();
            }
            other => clean.push(other.as_os_str()),
        }
    }
    Ok(clean)
}
