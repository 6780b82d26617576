//! Partition core: URL normalization, the profile store, aggregation and duplicate policy.
//!
//! Nothing in this crate touches the file system; see `partition_engine` for IO.
mod aggregator;
mod normalize;
mod policy;
mod profile;
mod store;

pub use aggregator::{AggregateStats, Aggregator, DuplicateRecord};
pub use normalize::normalize_url;
pub use policy::{
    resolve_policy, select_final_profiles, DuplicateDecider, DuplicatePolicy, InclusionFilter,
    PolicyParseError, Resolution,
};
pub use profile::{Profile, ProfileInput};
pub use store::{ProfileStore, StoreError};
