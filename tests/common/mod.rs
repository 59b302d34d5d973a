//! In-memory collaborators for completion tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;

use community_autocomplete::autocomplete::{
    CommunityProvider, CompletionConfig, GroupMembership, GroupProfile, MatrixToPermalinks,
    MediaThumbnailResolver, MembershipSource, ProfileSource, SessionContext, SourceError,
    SourceResult,
};

pub const HOMESERVER: &str = "https://matrix.example.org";

/// Membership list with a call counter
pub struct FixtureMemberships {
    groups: SourceResult<Vec<GroupMembership>>,
    pub calls: AtomicUsize,
}

impl FixtureMemberships {
    pub fn joined(ids: &[&str]) -> Self {
        Self::with_groups(ids.iter().map(|id| GroupMembership::joined(*id)).collect())
    }

    pub fn with_groups(groups: Vec<GroupMembership>) -> Self {
        Self {
            groups: Ok(groups),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: SourceError) -> Self {
        Self {
            groups: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MembershipSource for FixtureMemberships {
    async fn list_groups(&self) -> SourceResult<Vec<GroupMembership>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.groups.clone()
    }
}

/// How a fixture profile lookup behaves
pub enum ProfileBehavior {
    Found(GroupProfile),
    Fail(SourceError),
    Delay(Duration, GroupProfile),
    Panic,
}

/// Profile lookups keyed by group id; unknown ids fail with `NotFound`
#[derive(Default)]
pub struct FixtureProfiles {
    behaviors: HashMap<String, ProfileBehavior>,
    /// When set, every lookup waits here before answering
    barrier: Option<Arc<Barrier>>,
    pub calls: AtomicUsize,
}

impl FixtureProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, behavior: ProfileBehavior) -> Self {
        self.behaviors.insert(id.to_string(), behavior);
        self
    }

    pub fn found(self, id: &str, display_name: &str, avatar_ref: Option<&str>, description: &str) -> Self {
        self.with(id, ProfileBehavior::Found(profile(display_name, avatar_ref, description)))
    }

    pub fn rendezvous(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileSource for FixtureProfiles {
    async fn fetch_group_profile(&self, group_id: &str) -> SourceResult<GroupProfile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        match self.behaviors.get(group_id) {
            Some(ProfileBehavior::Found(profile)) => Ok(profile.clone()),
            Some(ProfileBehavior::Fail(error)) => Err(error.clone()),
            Some(ProfileBehavior::Delay(delay, profile)) => {
                tokio::time::sleep(*delay).await;
                Ok(profile.clone())
            }
            Some(ProfileBehavior::Panic) => panic!("profile store corrupted for {}", group_id),
            None => Err(SourceError::NotFound(group_id.to_string())),
        }
    }
}

pub fn profile(display_name: &str, avatar_ref: Option<&str>, description: &str) -> GroupProfile {
    GroupProfile {
        display_name: display_name.to_string(),
        avatar_ref: avatar_ref.map(str::to_string),
        short_description: description.to_string(),
    }
}

pub fn session(memberships: Arc<FixtureMemberships>, profiles: Arc<FixtureProfiles>) -> SessionContext {
    SessionContext::new(
        memberships,
        profiles,
        Arc::new(MatrixToPermalinks),
        Arc::new(MediaThumbnailResolver::parse(HOMESERVER).expect("valid homeserver")),
    )
}

pub fn provider(memberships: Arc<FixtureMemberships>, profiles: Arc<FixtureProfiles>) -> CommunityProvider {
    CommunityProvider::new(session(memberships, profiles), CompletionConfig::default())
}
