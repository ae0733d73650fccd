//! Port for reading and writing comment documents.
//!
//! Comments are written directly by clients; the backend only patches them
//! (normalization), stamps moderation decisions on them, and reads the
//! ratings of approved comments when recomputing a parent aggregate.

use async_trait::async_trait;

use crate::domain::{CommentPatch, CommentRef, DocumentId, ModerationDecision, ParentCollection, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } as Unavailable =>
            "comment store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } as Internal =>
            "comment store query failed: {message}",
    }
}

/// Port for comment document storage.
///
/// Writes are partial updates of an existing document. They never create a
/// comment; a missing target is reported as `Ok(false)` so callers decide
/// whether that is an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Apply a normalization patch to an existing comment.
    ///
    /// Returns `Ok(false)` when the comment does not exist.
    async fn apply_patch(
        &self,
        target: &CommentRef,
        patch: &CommentPatch,
    ) -> Result<bool, CommentRepositoryError>;

    /// Record a moderation decision: set the status, stamp the decision time
    /// with the store clock and record the moderator uid.
    ///
    /// Returns `Ok(false)` when the comment does not exist.
    async fn record_decision(
        &self,
        target: &CommentRef,
        decision: ModerationDecision,
        moderator: &UserId,
    ) -> Result<bool, CommentRepositoryError>;

    /// Stored ratings of every approved comment under a parent document.
    ///
    /// One entry per approved comment; `None` when its rating is absent.
    async fn approved_ratings(
        &self,
        parent: ParentCollection,
        parent_id: &DocumentId,
    ) -> Result<Vec<Option<f64>>, CommentRepositoryError>;
}

/// Fixture implementation that accepts every write and stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommentRepository;

#[async_trait]
impl CommentRepository for FixtureCommentRepository {
    async fn apply_patch(
        &self,
        _target: &CommentRef,
        _patch: &CommentPatch,
    ) -> Result<bool, CommentRepositoryError> {
        Ok(true)
    }

    async fn record_decision(
        &self,
        _target: &CommentRef,
        _decision: ModerationDecision,
        _moderator: &UserId,
    ) -> Result<bool, CommentRepositoryError> {
        Ok(true)
    }

    async fn approved_ratings(
        &self,
        _parent: ParentCollection,
        _parent_id: &DocumentId,
    ) -> Result<Vec<Option<f64>>, CommentRepositoryError> {
        Ok(Vec::new())
    }
}
