//! Driving port for approving and rejecting comments.

use async_trait::async_trait;

use crate::domain::{CallerIdentity, Error, ModerationDecision, ParentCollection};

/// One approve/reject invocation as received from a caller.
///
/// Ids are carried raw; the service validates them only after the caller has
/// been authorised.
#[derive(Debug, Clone, PartialEq)]
pub struct ModerateCommentRequest {
    /// Authenticated caller, if any.
    pub caller: Option<CallerIdentity>,
    /// Collection owning the comment.
    pub parent: ParentCollection,
    /// Approve or reject.
    pub decision: ModerationDecision,
    /// Value of the `poiId`/`categoryId` payload field.
    pub parent_id: Option<String>,
    /// Value of the `commentId` payload field.
    pub comment_id: Option<String>,
}

/// Driving port for comment moderation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentModerationCommand: Send + Sync {
    /// Apply a moderation decision.
    ///
    /// # Errors
    ///
    /// - `permission-denied` unless the caller carries the admin role.
    /// - `invalid-argument` when either id is missing or malformed.
    /// - `not-found` when the comment does not exist.
    async fn moderate(&self, request: ModerateCommentRequest) -> Result<(), Error>;
}

/// Fixture implementation accepting every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommentModerationCommand;

#[async_trait]
impl CommentModerationCommand for FixtureCommentModerationCommand {
    async fn moderate(&self, _request: ModerateCommentRequest) -> Result<(), Error> {
        Ok(())
    }
}
