//! Error types for the completion pipeline
//!
//! Collaborators report failures as [`SourceError`]. Only failures that abort a
//! whole request become a [`CompletionError`]; a failed profile lookup for a
//! single group is recovered inside the gatherer and never reaches this level.

use thiserror::Error;

/// Failure reported by an external data source (membership, profiles)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The backing service could not be reached
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The requested entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The lookup did not finish within the configured budget
    #[error("timed out after {0}ms")]
    Timeout(u64),

    #[error("{0}")]
    Other(String),
}

/// Failure of a whole completion request
#[derive(Debug, Error)]
pub enum CompletionError {
    /// The list of joined groups could not be obtained
    #[error("membership source unavailable")]
    MembershipUnavailable(#[source] SourceError),
}

pub type SourceResult<T> = Result<T, SourceError>;
