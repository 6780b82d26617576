use std::collections::HashMap;

use thiserror::Error;

use crate::Profile;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("profile URL required")]
    MissingUrl,
    #[error("profile already exists for URL {0}")]
    AlreadyExists(String),
}

/// Insertion-ordered profiles keyed by normalized URL.
///
/// Every read hands out a clone; callers never see the stored values.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    order: Vec<String>,
    items: HashMap<String, Profile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, url: &str) -> bool {
        self.items.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<Profile> {
        self.items.get(url).cloned()
    }

    pub fn add(&mut self, mut profile: Profile) -> Result<(), StoreError> {
        if profile.url.is_empty() {
            return Err(StoreError::MissingUrl);
        }
        if self.has(&profile.url) {
            return Err(StoreError::AlreadyExists(profile.url));
        }
        profile.tidy_sources();
        self.order.push(profile.url.clone());
        self.items.insert(profile.url.clone(), profile);
        Ok(())
    }

    /// Merge `source` into an existing profile. No-op when `url` is unknown.
    pub fn append_source(&mut self, url: &str, source: &str) {
        if let Some(existing) = self.items.get_mut(url) {
            existing.merge_source(source);
        }
    }

    /// Profiles in first-insertion order.
    pub fn list(&self) -> Vec<Profile> {
        self.order
            .iter()
            .filter_map(|url| self.items.get(url))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
