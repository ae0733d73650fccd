//! Approve/reject moderation of comments.
//!
//! The four callable operations (approve or reject, on POI or category
//! comments) are one service parameterised by [`ParentCollection`] and
//! [`ModerationDecision`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{CommentModerationCommand, CommentRepository, ModerateCommentRequest};
use crate::domain::{
    CallerIdentity, CommentRef, CommentStatus, DocumentId, Error, ParentCollection,
};

const ADMIN_ONLY: &str = "Admin only";

/// Moderator verdict on a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModerationDecision {
    /// Publish the comment.
    Approve,
    /// Hide the comment.
    Reject,
}

impl ModerationDecision {
    /// Status the comment ends up in.
    pub const fn status(self) -> CommentStatus {
        match self {
            Self::Approve => CommentStatus::Approved,
            Self::Reject => CommentStatus::Rejected,
        }
    }
}

/// Moderation service implementing [`CommentModerationCommand`].
#[derive(Clone)]
pub struct CommentModerationService<R> {
    comments: Arc<R>,
}

impl<R> CommentModerationService<R> {
    /// Create the service over a comment repository.
    pub fn new(comments: Arc<R>) -> Self {
        Self { comments }
    }
}

fn require_admin(caller: Option<&CallerIdentity>) -> Result<&CallerIdentity, Error> {
    caller
        .filter(|caller| caller.is_admin())
        .ok_or_else(|| Error::permission_denied(ADMIN_ONLY))
}

/// Turn the raw payload ids into a comment address.
///
/// Absent and empty ids are reported with the same message the mobile
/// clients already match on.
fn resolve_target(
    parent: ParentCollection,
    parent_id: Option<String>,
    comment_id: Option<String>,
) -> Result<CommentRef, Error> {
    let required = || {
        Error::invalid_argument(format!("{} and commentId are required", parent.id_field()))
    };
    let (Some(parent_id), Some(comment_id)) = (
        parent_id.filter(|id| !id.is_empty()),
        comment_id.filter(|id| !id.is_empty()),
    ) else {
        return Err(required());
    };

    let parent_id = DocumentId::new(parent_id).map_err(|err| {
        required().with_details(json!({ "field": parent.id_field(), "reason": err.to_string() }))
    })?;
    let comment_id = DocumentId::new(comment_id).map_err(|err| {
        required().with_details(json!({ "field": "commentId", "reason": err.to_string() }))
    })?;
    Ok(CommentRef::new(parent, parent_id, comment_id))
}

#[async_trait]
impl<R> CommentModerationCommand for CommentModerationService<R>
where
    R: CommentRepository,
{
    async fn moderate(&self, request: ModerateCommentRequest) -> Result<(), Error> {
        let ModerateCommentRequest {
            caller,
            parent,
            decision,
            parent_id,
            comment_id,
        } = request;

        let moderator = require_admin(caller.as_ref())?;
        let target = resolve_target(parent, parent_id, comment_id)?;

        let found = self
            .comments
            .record_decision(&target, decision, moderator.uid())
            .await?;
        if !found {
            return Err(Error::not_found("comment not found")
                .with_details(json!({ "document": target.to_string() })));
        }

        info!(
            comment = %target,
            status = %decision.status(),
            moderator = %moderator.uid(),
            "comment moderated"
        );
        Ok(())
    }
}
