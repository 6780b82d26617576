use std::collections::BTreeMap;

use partition_logging::{partition_debug, partition_trace};
use serde::{Deserialize, Serialize};

use crate::{normalize_url, Profile, ProfileInput, ProfileStore};

/// Ingest counters for a single source. `added + duplicates + missing_url + invalid == parsed`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateStats {
    pub source: String,
    pub parsed: usize,
    pub added: usize,
    pub duplicates: usize,
    pub invalid: usize,
    pub missing_url: usize,
}

/// Conflict history for a URL that arrived from more than one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    #[serde(rename = "URL")]
    pub url: String,
    /// Store entry as it was when the first conflict arrived.
    #[serde(rename = "Existing")]
    pub existing: Profile,
    /// Later arrivals, in arrival order.
    #[serde(rename = "Conflicting")]
    pub conflicting: Vec<Profile>,
    #[serde(rename = "AllSources")]
    pub all_sources: Vec<String>,
    /// Non-empty classifications of the conflicting entries, in arrival order.
    #[serde(rename = "Classification")]
    pub classification: Vec<String>,
}

impl DuplicateRecord {
    fn open(url: String, existing: Profile) -> Self {
        Self {
            url,
            all_sources: existing
                .sources
                .iter()
                .filter(|s| !s.is_empty())
                .cloned()
                .collect(),
            existing,
            conflicting: Vec::with_capacity(1),
            classification: Vec::new(),
        }
    }

    fn push_conflict(&mut self, incoming: Profile) {
        for source in &incoming.sources {
            if source.is_empty() {
                continue;
            }
            if let Err(index) = self.all_sources.binary_search(source) {
                self.all_sources.insert(index, source.clone());
            }
        }
        if !incoming.classification.is_empty() {
            self.classification.push(incoming.classification.clone());
        }
        self.conflicting.push(incoming);
    }
}

/// Routes parsed records into the [`ProfileStore`] and tracks cross-source duplicates.
///
/// Single-owner: feed it one source at a time, in a fixed order, for deterministic results.
#[derive(Debug, Default)]
pub struct Aggregator {
    store: ProfileStore,
    duplicates: BTreeMap<String, DuplicateRecord>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn add_profiles<I>(&mut self, inputs: I, source: &str) -> AggregateStats
    where
        I: IntoIterator<Item = ProfileInput>,
    {
        let mut stats = AggregateStats {
            source: source.to_string(),
            ..Default::default()
        };

        for raw in inputs {
            stats.parsed += 1;
            let url = normalize_url(&raw.url);
            if url.is_empty() {
                stats.missing_url += 1;
                continue;
            }

            let profile = Profile {
                url: url.clone(),
                username: raw.username,
                classification: raw.classification,
                sources: vec![source.to_string()],
            };

            if self.store.has(&url) {
                stats.duplicates += 1;
                self.store.append_source(&url, source);
                self.record_duplicate(profile);
                continue;
            }

            match self.store.add(profile) {
                Ok(()) => stats.added += 1,
                Err(err) => {
                    partition_debug!("rejected profile from {}: {}", source, err);
                    stats.invalid += 1;
                }
            }
        }

        stats
    }

    fn record_duplicate(&mut self, incoming: Profile) {
        partition_trace!("duplicate {} from {:?}", incoming.url, incoming.sources);
        let store = &self.store;
        let record = self
            .duplicates
            .entry(incoming.url.clone())
            .or_insert_with_key(|url| {
                DuplicateRecord::open(url.clone(), store.get(url).unwrap_or_default())
            });
        record.push_conflict(incoming);
    }

    /// Deep copy of every duplicate record, sorted by URL.
    pub fn duplicates(&self) -> Vec<DuplicateRecord> {
        self.duplicates.values().cloned().collect()
    }

    /// Every conflicting profile across all records, records in URL order.
    pub fn flatten_duplicates(&self) -> Vec<Profile> {
        self.duplicates
            .values()
            .flat_map(|record| record.conflicting.iter().cloned())
            .collect()
    }
}
