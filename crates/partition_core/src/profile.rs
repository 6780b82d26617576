use serde::{Deserialize, Serialize};

/// A parsed record before normalization. Discarded once converted into a [`Profile`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileInput {
    pub url: String,
    pub username: String,
    pub classification: String,
}

impl ProfileInput {
    /// A record that only carries a URL, as produced by line-oriented sources.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Canonical profile, one per normalized URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Classification")]
    pub classification: String,
    /// Origin labels, sorted ascending without repeats.
    #[serde(rename = "Sources")]
    pub sources: Vec<String>,
}

impl Profile {
    /// Merge `source` into the origin labels, keeping them sorted and unique.
    pub fn merge_source(&mut self, source: &str) {
        if let Err(index) = self.sources.binary_search_by(|s| s.as_str().cmp(source)) {
            self.sources.insert(index, source.to_string());
        }
    }

    /// Restore the sorted, unique invariant on `sources` after a bulk assignment.
    pub(crate) fn tidy_sources(&mut self) {
        self.sources.sort();
        self.sources.dedup();
    }
}
