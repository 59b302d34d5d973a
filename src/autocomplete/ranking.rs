//! Ranking and shaping of completion results
//!
//! Ranking algorithm (in order of priority):
//! 1. Position of the first occurrence of the query in the group id - lower is
//!    better, ids that do not contain the query at all sort last
//! 2. Length of the group id - shorter is better
//! 3. Lexicographic order of the group id - as tie-breaker
//!
//! Positions and lengths are counted in characters. The comparison is
//! case-sensitive, so fuzzy-only matches share the "not found" position.

use serde::{Deserialize, Serialize};

use super::gather::Candidate;
use super::sources::{PermalinkBuilder, ThumbnailResolver};
use super::trigger::SelectionRange;

/// Maximum number of completions returned for one query
pub const MAX_COMPLETIONS: usize = 4;

/// Text inserted after an accepted completion
pub const INSERTION_SUFFIX: &str = " ";

/// Avatar part of the presentation payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarPayload {
    /// Name used for placeholder avatars (initials)
    pub name: String,
    /// Sized thumbnail URL, absent when the group has no resolvable avatar
    pub url: Option<String>,
    pub width: u32,
    pub height: u32,
}

/// Presentation data handed to the host's renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPayload {
    /// Display name, or the group id when the name is empty
    pub title: String,
    pub avatar: AvatarPayload,
    pub description: String,
}

/// One completion offered to the composer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Text that replaces the trigger run, always the group id
    pub completion_text: String,
    pub insertion_suffix: String,
    pub link_target: String,
    pub display_payload: DisplayPayload,
    /// Span being replaced, identical to the trigger run's span
    pub range: SelectionRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    first_occurrence: usize,
    id_len: usize,
}

impl RankKey {
    fn of(candidate: &Candidate, query: &str) -> Self {
        Self {
            first_occurrence: first_occurrence(query, &candidate.id),
            id_len: candidate.id.chars().count(),
        }
    }
}

/// Character index of the first occurrence of `query` in `id`, `usize::MAX` if absent
fn first_occurrence(query: &str, id: &str) -> usize {
    match id.find(query) {
        Some(byte_index) => id[..byte_index].chars().count(),
        None => usize::MAX,
    }
}

/// Sort fuzzy matches into their final order (best first)
pub fn rank_candidates(mut candidates: Vec<Candidate>, query: &str) -> Vec<Candidate> {
    candidates.sort_by_cached_key(|candidate| (RankKey::of(candidate, query), candidate.id.clone()));
    candidates
}

/// Map ranked candidates to completion records, keeping at most [`MAX_COMPLETIONS`]
pub fn shape_completions(
    ranked: Vec<Candidate>,
    range: SelectionRange,
    permalinks: &dyn PermalinkBuilder,
    thumbnails: &dyn ThumbnailResolver,
    avatar_size: u32,
) -> Vec<CompletionRecord> {
    ranked
        .into_iter()
        .take(MAX_COMPLETIONS)
        .map(|candidate| {
            let title = if candidate.display_name.is_empty() {
                candidate.id.clone()
            } else {
                candidate.display_name
            };
            let url = candidate
                .avatar_ref
                .as_deref()
                .filter(|avatar_ref| !avatar_ref.is_empty())
                .and_then(|avatar_ref| thumbnails.resolve_thumbnail(avatar_ref, avatar_size, avatar_size));

            CompletionRecord {
                link_target: permalinks.group_permalink(&candidate.id),
                insertion_suffix: INSERTION_SUFFIX.to_string(),
                display_payload: DisplayPayload {
                    avatar: AvatarPayload {
                        name: title.clone(),
                        url,
                        width: avatar_size,
                        height: avatar_size,
                    },
                    title,
                    description: candidate.short_description,
                },
                completion_text: candidate.id,
                range,
            }
        })
        .collect()
}
