use std::io;
use std::path::{Path, PathBuf};

use partition_core::{
    resolve_policy, select_final_profiles, AggregateStats, Aggregator, DuplicateDecider,
    DuplicatePolicy, InclusionFilter, Profile, Resolution,
};
use partition_logging::{partition_info, partition_warn};
use serde::Deserialize;
use thiserror::Error;

use crate::discover::{discover_files, DiscoverError};
use crate::loader::{load_profiles, LoadError};
use crate::output::{write_json, write_lines};
use crate::persist::PersistError;

/// Everything a partition run needs; the engine has no built-in paths.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartitionConfig {
    /// Files or directories whose profiles may appear in the output.
    pub primary: Vec<PathBuf>,
    /// Files or directories used only to detect duplicates.
    pub references: Vec<PathBuf>,
    pub output: PathBuf,
    /// Duplicate report destination; nothing is written when unset.
    pub report: Option<PathBuf>,
    pub policy: DuplicatePolicy,
    /// Missing inputs and unreadable files abort the run instead of being skipped.
    pub strict: bool,
    /// Also print the final URL list on stdout.
    pub echo: bool,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            primary: Vec::new(),
            references: Vec::new(),
            output: PathBuf::from("dist/combined_profiles.txt"),
            report: None,
            policy: DuplicatePolicy::Prompt,
            strict: false,
            echo: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input {path:?} is not accessible: {source}")]
    MissingInput { path: PathBuf, source: io::Error },
    #[error("no input files detected; configure primary or reference paths")]
    NoInputs,
    #[error(transparent)]
    Discover(#[from] DiscoverError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed writing {path:?}: {source}")]
    Output { path: PathBuf, source: PersistError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// One entry per file that loaded successfully, in ingest order.
    pub stats: Vec<AggregateStats>,
    pub total_unique: usize,
    pub duplicate_count: usize,
    pub resolution: Resolution,
    /// Profiles written to the output, in output order.
    pub kept: Vec<Profile>,
    /// Set when a duplicate report was written.
    pub report: Option<PathBuf>,
}

/// Label identifying a source file in profiles and reports.
pub fn source_label(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Discover, load, aggregate, resolve duplicates and write the outputs.
pub fn run_partition(
    config: &PartitionConfig,
    decider: &mut dyn DuplicateDecider,
) -> Result<RunSummary, PipelineError> {
    let primary_inputs = existing_inputs(&config.primary, config.strict)?;
    let reference_inputs = existing_inputs(&config.references, config.strict)?;

    let primary_files = discover_files(&primary_inputs)?;
    let all_inputs: Vec<PathBuf> = primary_inputs
        .into_iter()
        .chain(reference_inputs)
        .collect();
    let files = discover_files(&all_inputs)?;
    if files.is_empty() {
        return Err(PipelineError::NoInputs);
    }

    let mut aggregator = Aggregator::new();
    let mut stats = Vec::with_capacity(files.len());
    for path in &files {
        let inputs = match load_profiles(path) {
            Ok(inputs) => inputs,
            Err(err) if config.strict => return Err(err.into()),
            Err(err) => {
                partition_warn!("skipping {:?}: {}", path, err);
                continue;
            }
        };
        let stat = aggregator.add_profiles(inputs, &source_label(path));
        partition_info!(
            "ingested {} parsed={} added={} duplicates={} invalid={} missing_url={}",
            stat.source,
            stat.parsed,
            stat.added,
            stat.duplicates,
            stat.invalid,
            stat.missing_url
        );
        stats.push(stat);
    }

    let unique = aggregator.store().list();
    let duplicates = aggregator.duplicates();
    let resolution = resolve_policy(config.policy, &duplicates, decider);

    let filter = InclusionFilter::new(primary_files.iter().map(|p| source_label(p)));
    let kept = select_final_profiles(&unique, &duplicates, resolution, &filter);

    write_lines(&kept, &config.output).map_err(|source| PipelineError::Output {
        path: config.output.clone(),
        source,
    })?;

    let mut report = None;
    if let Some(path) = config.report.as_ref().filter(|_| !duplicates.is_empty()) {
        match write_json(path, &duplicates) {
            Ok(()) => {
                partition_info!("duplicate report written to {:?}", path);
                report = Some(path.clone());
            }
            Err(err) => partition_warn!("failed writing duplicate report {:?}: {}", path, err),
        }
    }

    partition_info!(
        "summary: sources={} total_unique={} duplicates={} kept={} policy={:?}",
        stats.len(),
        unique.len(),
        duplicates.len(),
        kept.len(),
        resolution
    );

    Ok(RunSummary {
        stats,
        total_unique: unique.len(),
        duplicate_count: duplicates.len(),
        resolution,
        kept,
        report,
    })
}

/// Drop blank entries and, unless strict, inputs that do not exist.
fn existing_inputs(paths: &[PathBuf], strict: bool) -> Result<Vec<PathBuf>, PipelineError> {
    let mut kept = Vec::with_capacity(paths.len());
    for path in paths {
        if path.as_os_str().is_empty() {
            continue;
        }
        match path.try_exists() {
            Ok(true) => kept.push(path.clone()),
            Ok(false) if !strict => {
                partition_warn!("{:?} not found, skipping (strict mode would fail)", path);
            }
            Ok(false) => {
                return Err(PipelineError::MissingInput {
                    path: path.clone(),
                    source: io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
                })
            }
            Err(source) => {
                return Err(PipelineError::MissingInput {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
    Ok(kept)
}
