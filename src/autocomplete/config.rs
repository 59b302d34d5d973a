//! Completion settings
//!
//! Settings come from the host as JSON (all fields optional) and can be
//! overridden from the environment:
//! - `COMMUNITY_AUTOCOMPLETE_FETCH_TIMEOUT_MS`: per-group profile lookup budget
//! - `COMMUNITY_AUTOCOMPLETE_TYPO_DISTANCE`: maximum edit distance for word matches

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::fuzzy::FuzzyConfig;

pub const FETCH_TIMEOUT_ENV: &str = "COMMUNITY_AUTOCOMPLETE_FETCH_TIMEOUT_MS";
pub const TYPO_DISTANCE_ENV: &str = "COMMUNITY_AUTOCOMPLETE_TYPO_DISTANCE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Width and height of avatar thumbnails, in pixels
    pub avatar_size: u32,
    pub fuzzy: FuzzyConfig,
    /// Budget for a single profile lookup; `None` waits indefinitely
    pub profile_fetch_timeout_ms: Option<u64>,
    /// Provider label shown above the results
    pub label: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            avatar_size: 24,
            fuzzy: FuzzyConfig::default(),
            profile_fetch_timeout_ms: None,
            label: "Communities".to_string(),
        }
    }
}

impl CompletionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Apply environment overrides on top of `base`
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env_or_default(base: Option<Self>) -> Self {
        let mut config = base.unwrap_or_default();
        config.apply_overrides(|name| std::env::var(name).ok());
        config
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(FETCH_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.profile_fetch_timeout_ms = Some(ms),
                Err(e) => warn!("Ignoring {}={:?}: {}", FETCH_TIMEOUT_ENV, raw, e),
            }
        }
        if let Some(raw) = lookup(TYPO_DISTANCE_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(distance) => self.fuzzy.max_typo_distance = distance,
                Err(e) => warn!("Ignoring {}={:?}: {}", TYPO_DISTANCE_ENV, raw, e),
            }
        }
    }

    pub fn profile_fetch_timeout(&self) -> Option<Duration> {
        self.profile_fetch_timeout_ms.map(Duration::from_millis)
    }
}
