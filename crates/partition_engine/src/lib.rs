//! Partition engine: file discovery, loading, output and the end-to-end run.
mod discover;
mod loader;
mod output;
mod persist;
mod pipeline;

pub use discover::{discover_files, DiscoverError};
pub use loader::{load_profiles, source_kind, LoadError, SourceKind};
pub use output::{write_json, write_lines};
pub use persist::{ensure_parent_dir, AtomicFileWriter, PersistError};
pub use pipeline::{run_partition, source_label, PartitionConfig, PipelineError, RunSummary};
