//! Fuzzy candidate filtering
//!
//! The matcher indexes three fields per candidate: group id, display name and
//! short description. A candidate matches when any field contains the query,
//! ignoring case. Queries of at least `min_typo_query_len` characters are also
//! matched against the individual words of those fields with a Levenshtein
//! transducer, so `comunity` still finds a group named "Rust Community".
//!
//! The index is rebuilt from scratch by every [`FuzzyMatcher::set_objects`]
//! call. Result order follows the indexed set and carries no ranking meaning.

use std::collections::HashMap;

use liblevenshtein::dictionary::dynamic_dawg_char::DynamicDawgChar;
use liblevenshtein::prelude::{Algorithm, Transducer};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::gather::Candidate;

/// Tolerance settings for the matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    /// Maximum edit distance for word matches (0 disables typo tolerance)
    pub max_typo_distance: usize,
    /// Shorter queries are matched by substring only
    pub min_typo_query_len: usize,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            max_typo_distance: 1,
            min_typo_query_len: 4,
        }
    }
}

/// Lowercased searchable fields of one candidate
struct IndexedKeys {
    id: String,
    display_name: String,
    short_description: String,
}

impl IndexedKeys {
    fn of(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id.to_lowercase(),
            display_name: candidate.display_name.to_lowercase(),
            short_description: candidate.short_description.to_lowercase(),
        }
    }

    fn contains(&self, needle: &str) -> bool {
        self.id.contains(needle)
            || self.display_name.contains(needle)
            || self.short_description.contains(needle)
    }

    fn words(&self) -> impl Iterator<Item = &str> {
        [&self.id, &self.display_name, &self.short_description]
            .into_iter()
            .flat_map(|field| field.split(|c: char| !c.is_alphanumeric()))
            .filter(|word| !word.is_empty())
    }
}

/// Reusable fuzzy index over a candidate set
pub struct FuzzyMatcher {
    config: FuzzyConfig,
    objects: Vec<Candidate>,
    keys: Vec<IndexedKeys>,
    /// Every distinct word of every indexed field, keyed by character so that
    /// edit distance counts characters rather than UTF-8 bytes
    words: DynamicDawgChar<()>,
    /// Word -> indices into `objects`
    word_owners: HashMap<String, Vec<usize>>,
}

impl FuzzyMatcher {
    pub fn new(config: FuzzyConfig) -> Self {
        Self {
            config,
            objects: Vec::new(),
            keys: Vec::new(),
            words: DynamicDawgChar::new(),
            word_owners: HashMap::new(),
        }
    }

    /// Replace the indexed set wholesale
    pub fn set_objects(&mut self, objects: Vec<Candidate>) {
        let keys: Vec<IndexedKeys> = objects.iter().map(IndexedKeys::of).collect();

        let words: DynamicDawgChar<()> = DynamicDawgChar::new();
        let mut word_owners: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, key) in keys.iter().enumerate() {
            for word in key.words() {
                let owners = word_owners.entry(word.to_string()).or_default();
                if owners.last() != Some(&index) {
                    owners.push(index);
                }
            }
        }
        for word in word_owners.keys() {
            words.insert(word);
        }

        trace!("Indexed {} candidates, {} distinct words", objects.len(), word_owners.len());

        self.objects = objects;
        self.keys = keys;
        self.words = words;
        self.word_owners = word_owners;
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Every indexed candidate matching `query`, in indexed order
    pub fn match_query(&self, query: &str) -> Vec<Candidate> {
        let needle = query.to_lowercase();
        let mut matched: Vec<bool> = self
            .objects
            .iter()
            .zip(&self.keys)
            .map(|(object, key)| object.id.contains(query) || key.contains(&needle))
            .collect();

        if self.config.max_typo_distance > 0
            && needle.chars().count() >= self.config.min_typo_query_len
        {
            let transducer = Transducer::new(self.words.clone(), Algorithm::Standard);
            for candidate in transducer.query_with_distance(&needle, self.config.max_typo_distance) {
                if let Some(owners) = self.word_owners.get(&candidate.term) {
                    for &index in owners {
                        matched[index] = true;
                    }
                }
            }
        }

        self.objects
            .iter()
            .zip(matched)
            .filter_map(|(object, hit)| hit.then(|| object.clone()))
            .collect()
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(FuzzyConfig::default())
    }
}
