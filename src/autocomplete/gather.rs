//! Candidate gathering
//!
//! Builds the working candidate set for one completion request: every group the
//! user has joined, enriched with its profile. Profile lookups run concurrently
//! and fail independently; a failed lookup degrades to a stub candidate that
//! only carries the group id.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::future::join_all;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::error::{CompletionError, SourceError, SourceResult};
use super::sources::{GroupMembership, GroupProfile, Membership, ProfileSource, SessionContext};

/// A group offered for completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Stable group identifier, e.g. `+rust:example.org`
    pub id: String,
    pub display_name: String,
    pub avatar_ref: Option<String>,
    pub short_description: String,
}

impl Candidate {
    /// Candidate carrying only the group id
    pub fn stub(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: String::new(),
            avatar_ref: None,
            short_description: String::new(),
        }
    }

    pub fn from_profile(id: impl Into<String>, profile: GroupProfile) -> Self {
        Self {
            id: id.into(),
            display_name: profile.display_name,
            avatar_ref: profile.avatar_ref,
            short_description: profile.short_description,
        }
    }
}

/// Gather the candidate set for the current session
///
/// Fails only when the membership list itself is unavailable. The returned set
/// follows the membership source's order and holds at most one entry per id.
pub async fn gather_candidates(
    ctx: &SessionContext,
    fetch_timeout: Option<Duration>,
) -> Result<Vec<Candidate>, CompletionError> {
    let groups = ctx
        .memberships
        .list_groups()
        .await
        .map_err(CompletionError::MembershipUnavailable)?;

    let group_ids = joined_group_ids(groups);
    debug!("Fetching profiles for {} joined groups", group_ids.len());

    let profiles = ctx.profiles.as_ref();
    let candidates = join_all(
        group_ids
            .into_iter()
            .map(|group_id| fetch_candidate(profiles, group_id, fetch_timeout)),
    )
    .await;

    Ok(candidates)
}

/// Ids of joined groups, in source order, first occurrence wins
fn joined_group_ids(groups: Vec<GroupMembership>) -> Vec<String> {
    let mut seen = HashSet::new();
    groups
        .into_iter()
        .filter(|group| group.membership == Membership::Join)
        .filter_map(|group| {
            if seen.insert(group.group_id.clone()) {
                Some(group.group_id)
            } else {
                trace!("Dropping duplicate group id {}", group.group_id);
                None
            }
        })
        .collect()
}

async fn fetch_candidate(
    profiles: &dyn ProfileSource,
    group_id: String,
    fetch_timeout: Option<Duration>,
) -> Candidate {
    match fetch_profile(profiles, &group_id, fetch_timeout).await {
        Ok(profile) => Candidate::from_profile(group_id, profile),
        Err(e) => {
            warn!(group_id = %group_id, error = %e, "Group profile lookup failed, using stub");
            Candidate::stub(group_id)
        }
    }
}

async fn fetch_profile(
    profiles: &dyn ProfileSource,
    group_id: &str,
    fetch_timeout: Option<Duration>,
) -> SourceResult<GroupProfile> {
    // A panicking source must not take the sibling lookups down with it
    let lookup = AssertUnwindSafe(profiles.fetch_group_profile(group_id))
        .catch_unwind()
        .map(|outcome| {
            outcome.unwrap_or_else(|_| Err(SourceError::Other("profile lookup panicked".to_string())))
        });

    match fetch_timeout {
        Some(limit) => tokio::time::timeout(limit, lookup)
            .await
            .unwrap_or_else(|_| Err(SourceError::Timeout(timeout_millis(limit)))),
        None => lookup.await,
    }
}

/// Whole milliseconds in `limit`, saturating at `u64::MAX`
fn timeout_millis(limit: Duration) -> u64 {
    u64::try_from(limit.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PendingProfiles;

    #[async_trait::async_trait]
    impl ProfileSource for PendingProfiles {
        async fn fetch_group_profile(&self, _group_id: &str) -> SourceResult<GroupProfile> {
            futures::future::pending().await
        }
    }

    #[test]
    fn test_timeout_millis_saturates() {
        assert_eq!(timeout_millis(Duration::from_millis(250)), 250);
        assert_eq!(timeout_millis(Duration::from_secs(u64::MAX)), u64::MAX);
    }

    #[tokio::test]
    async fn test_pending_lookup_reports_timeout() {
        let result = fetch_profile(&PendingProfiles, "+a:x", Some(Duration::from_millis(20))).await;
        assert_eq!(result, Err(SourceError::Timeout(20)));
    }

    #[test]
    fn test_joined_ids_filter_and_dedup() {
        let groups = vec![
            GroupMembership::joined("+a:x"),
            GroupMembership::new("+b:x", Membership::Invite),
            GroupMembership::joined("+c:x"),
            GroupMembership::joined("+a:x"),
            GroupMembership::new("+d:x", Membership::Leave),
        ];
        assert_eq!(joined_group_ids(groups), vec!["+a:x".to_string(), "+c:x".to_string()]);
    }

    #[test]
    fn test_stub_has_empty_display_fields() {
        let stub = Candidate::stub("+a:x");
        assert_eq!(stub.id, "+a:x");
        assert!(stub.display_name.is_empty());
        assert!(stub.avatar_ref.is_none());
        assert!(stub.short_description.is_empty());
    }
}
