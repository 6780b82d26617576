use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DuplicateRecord, Profile};

/// How duplicates found during aggregation are treated in the final output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Ask a [`DuplicateDecider`] once for the whole batch.
    #[default]
    Prompt,
    Skip,
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyParseError {
    #[error("unknown duplicate policy {0:?}")]
    Unknown(String),
}

impl FromStr for DuplicatePolicy {
    type Err = PolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "prompt" => Ok(Self::Prompt),
            "skip" => Ok(Self::Skip),
            "keep" => Ok(Self::Keep),
            _ => Err(PolicyParseError::Unknown(value.to_string())),
        }
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicatePolicy::Prompt => write!(f, "prompt"),
            DuplicatePolicy::Skip => write!(f, "skip"),
            DuplicatePolicy::Keep => write!(f, "keep"),
        }
    }
}

/// A policy with the prompt step already answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    /// Only the first-seen entry of each duplicate URL survives.
    #[default]
    Skip,
    /// Conflicting entries are emitted after the first-seen ones.
    Keep,
}

impl Resolution {
    /// Interpret a typed answer. Anything other than `k`/`keep` means skip.
    pub fn from_answer(answer: &str) -> Self {
        match answer.trim().to_ascii_lowercase().as_str() {
            "k" | "keep" => Resolution::Keep,
            _ => Resolution::Skip,
        }
    }
}

/// Decides the batch policy when the configured policy is [`DuplicatePolicy::Prompt`].
pub trait DuplicateDecider {
    fn decide(&mut self, duplicates: &[DuplicateRecord]) -> Resolution;
}

impl<F> DuplicateDecider for F
where
    F: FnMut(&[DuplicateRecord]) -> Resolution,
{
    fn decide(&mut self, duplicates: &[DuplicateRecord]) -> Resolution {
        self(duplicates)
    }
}

/// Turn the configured policy into a concrete resolution.
///
/// The decider is only consulted for `Prompt` and only when duplicates exist.
pub fn resolve_policy(
    policy: DuplicatePolicy,
    duplicates: &[DuplicateRecord],
    decider: &mut dyn DuplicateDecider,
) -> Resolution {
    match policy {
        DuplicatePolicy::Skip => Resolution::Skip,
        DuplicatePolicy::Keep => Resolution::Keep,
        DuplicatePolicy::Prompt if duplicates.is_empty() => Resolution::Skip,
        DuplicatePolicy::Prompt => decider.decide(duplicates),
    }
}

/// Eligibility check applied to every profile before it is emitted.
#[derive(Debug, Clone, Default)]
pub struct InclusionFilter {
    primary: HashSet<String>,
}

impl InclusionFilter {
    pub fn new<I, S>(primary_sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            primary: primary_sources.into_iter().map(Into::into).collect(),
        }
    }

    /// A profile is eligible when one of its sources is primary and its
    /// classification is `yes`, `maybe` or empty (case-insensitive).
    pub fn allows(&self, profile: &Profile) -> bool {
        let class = profile.classification.trim().to_ascii_lowercase();
        let accepted = matches!(class.as_str(), "" | "yes" | "maybe");
        accepted && profile.sources.iter().any(|s| self.primary.contains(s))
    }
}

/// Assemble the output list: store entries in insertion order, then with
/// [`Resolution::Keep`] every conflicting entry, all passed through `filter`.
pub fn select_final_profiles(
    unique: &[Profile],
    duplicates: &[DuplicateRecord],
    resolution: Resolution,
    filter: &InclusionFilter,
) -> Vec<Profile> {
    let mut selected: Vec<Profile> = unique
        .iter()
        .filter(|profile| filter.allows(profile))
        .cloned()
        .collect();

    if resolution == Resolution::Keep {
        selected.extend(
            duplicates
                .iter()
                .flat_map(|record| record.conflicting.iter())
                .filter(|profile| filter.allows(profile))
                .cloned(),
        );
    }

    selected
}
