//! Mention completion for message composers
//!
//! This module provides:
//! - Trigger detection for `+community` runs under the caret
//! - Guard rules that keep slash commands free of completions
//! - Concurrent, fault-isolated gathering of joined groups and their profiles
//! - Fuzzy filtering with liblevenshtein typo tolerance
//! - Deterministic ranking, capped at four results
//! - A provider interface and registry for hosts with several completion sources

pub mod community;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod gather;
pub mod guard;
pub mod provider;
pub mod ranking;
pub mod sources;
pub mod trigger;

pub use community::CommunityProvider;
pub use config::CompletionConfig;
pub use error::{CompletionError, SourceError, SourceResult};
pub use fuzzy::{FuzzyConfig, FuzzyMatcher};
pub use gather::{Candidate, gather_candidates};
pub use guard::is_guarded_command;
pub use provider::{
    AutocompleteProvider, CompletionRenderer, ContainerStyle, ProviderCompletions, ProviderRegistry,
    render_completions,
};
pub use ranking::{
    AvatarPayload, CompletionRecord, DisplayPayload, INSERTION_SUFFIX, MAX_COMPLETIONS, rank_candidates,
    shape_completions,
};
pub use sources::{
    GroupMembership, GroupProfile, MatrixToPermalinks, MediaThumbnailResolver, Membership,
    MembershipSource, PermalinkBuilder, ProfileSource, SessionContext, ThumbnailResolver,
};
pub use trigger::{SelectionRange, TriggerMatch, TriggerPattern, detect_trigger};
