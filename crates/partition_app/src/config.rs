use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use partition_engine::PartitionConfig;
use partition_logging::partition_info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Read a [`PartitionConfig`] from a RON file. Omitted fields take their defaults.
pub(crate) fn load_config(path: &Path) -> Result<PartitionConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: PartitionConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    partition_info!(
        "Loaded config from {:?}: {} primary, {} reference inputs, policy {}",
        path,
        config.primary.len(),
        config.references.len(),
        config.policy
    );
    Ok(config)
}
