use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use partition_core::ProfileInput;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("unsupported file extension for {0:?}")]
    UnsupportedExtension(PathBuf),
}

/// How a source file is parsed, decided by its lower-cased extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `.json`: an array of objects.
    Json,
    /// `.txt` / `.md`: one URL per line.
    Lines,
}

pub fn source_kind(path: &Path) -> Option<SourceKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "json" => Some(SourceKind::Json),
        "txt" | "md" => Some(SourceKind::Lines),
        _ => None,
    }
}

pub fn load_profiles(path: &Path) -> Result<Vec<ProfileInput>, LoadError> {
    match source_kind(path) {
        Some(SourceKind::Json) => load_json(path),
        Some(SourceKind::Lines) => load_lines(path),
        None => Err(LoadError::UnsupportedExtension(path.to_path_buf())),
    }
}

fn read(path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Top-level array of records; `null` stands for "no records" at either level.
type JsonDocument = Option<Vec<Option<Map<String, Value>>>>;

/// Only the first JSON value is decoded; no value at all (empty or blank file) is an empty list.
fn load_json(path: &Path) -> Result<Vec<ProfileInput>, LoadError> {
    let bytes = read(path)?;
    let mut stream = serde_json::Deserializer::from_slice(&bytes).into_iter::<JsonDocument>();
    let records = match stream.next() {
        None => return Ok(Vec::new()),
        Some(Ok(records)) => records.unwrap_or_default(),
        Some(Err(source)) => {
            return Err(LoadError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    // A `null` element is an empty record, not a decode failure.
    Ok(records
        .iter()
        .map(|record| record.as_ref().map(record_to_input).unwrap_or_default())
        .collect())
}

fn record_to_input(record: &Map<String, Value>) -> ProfileInput {
    let field = |key: &str| {
        record
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let mut url = field("profileURL");
    if url.is_empty() {
        url = field("url");
    }
    ProfileInput {
        url,
        username: field("username"),
        classification: field("classification"),
    }
}

fn load_lines(path: &Path) -> Result<Vec<ProfileInput>, LoadError> {
    let bytes = read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ProfileInput::from_url)
        .collect())
}
