//! External collaborators consumed by the completion pipeline
//!
//! The pipeline never reaches for a global client. Everything it needs from the
//! outside world arrives through a [`SessionContext`], which makes every stage
//! testable with in-memory fixtures.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::SourceResult;

/// The current user's membership state in a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Membership {
    Join,
    Invite,
    Leave,
}

/// A group as reported by the membership source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMembership {
    pub group_id: String,
    pub membership: Membership,
}

impl GroupMembership {
    pub fn new(group_id: impl Into<String>, membership: Membership) -> Self {
        Self {
            group_id: group_id.into(),
            membership,
        }
    }

    pub fn joined(group_id: impl Into<String>) -> Self {
        Self::new(group_id, Membership::Join)
    }
}

/// Enriched profile data for a group
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupProfile {
    pub display_name: String,
    /// Opaque resource locator for the avatar (usually an `mxc://` URI)
    pub avatar_ref: Option<String>,
    pub short_description: String,
}

/// Lists the groups known to the current session
#[async_trait]
pub trait MembershipSource: Send + Sync {
    async fn list_groups(&self) -> SourceResult<Vec<GroupMembership>>;
}

/// Looks up the profile of a single group
///
/// Implementations are expected to be cache-backed. Failures are per group and
/// are recovered by the gatherer.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_group_profile(&self, group_id: &str) -> SourceResult<GroupProfile>;
}

/// Builds a shareable link for a group
pub trait PermalinkBuilder: Send + Sync {
    fn group_permalink(&self, group_id: &str) -> String;
}

/// Turns an avatar reference into a sized thumbnail URL
pub trait ThumbnailResolver: Send + Sync {
    fn resolve_thumbnail(&self, avatar_ref: &str, width: u32, height: u32) -> Option<String>;
}

/// Explicit session handle passed into the pipeline
#[derive(Clone)]
pub struct SessionContext {
    pub memberships: Arc<dyn MembershipSource>,
    pub profiles: Arc<dyn ProfileSource>,
    pub permalinks: Arc<dyn PermalinkBuilder>,
    pub thumbnails: Arc<dyn ThumbnailResolver>,
}

impl SessionContext {
    pub fn new(
        memberships: Arc<dyn MembershipSource>,
        profiles: Arc<dyn ProfileSource>,
        permalinks: Arc<dyn PermalinkBuilder>,
        thumbnails: Arc<dyn ThumbnailResolver>,
    ) -> Self {
        Self {
            memberships,
            profiles,
            permalinks,
            thumbnails,
        }
    }
}

const MATRIX_TO_BASE: &str = "https://matrix.to";

/// `https://matrix.to/#/<group id>` permalinks
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixToPermalinks;

impl PermalinkBuilder for MatrixToPermalinks {
    fn group_permalink(&self, group_id: &str) -> String {
        format!("{}/#/{}", MATRIX_TO_BASE, group_id)
    }
}

/// Resolves `mxc://server/media` references against a homeserver's media API
#[derive(Debug, Clone)]
pub struct MediaThumbnailResolver {
    homeserver: Url,
}

impl MediaThumbnailResolver {
    pub fn new(homeserver: Url) -> Self {
        Self { homeserver }
    }

    pub fn parse(homeserver: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(homeserver)?))
    }
}

impl ThumbnailResolver for MediaThumbnailResolver {
    fn resolve_thumbnail(&self, avatar_ref: &str, width: u32, height: u32) -> Option<String> {
        let (server, media_id) = avatar_ref.strip_prefix("mxc://")?.split_once('/')?;
        if server.is_empty() || media_id.is_empty() {
            return None;
        }

        let mut url = self.homeserver.clone();
        url.set_query(None);
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(["_matrix", "media", "r0", "thumbnail", server, media_id]);
        url.query_pairs_mut()
            .append_pair("width", &width.to_string())
            .append_pair("height", &height.to_string())
            .append_pair("method", "crop");

        Some(url.to_string())
    }
}
