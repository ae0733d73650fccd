//! Normalization of newly created comments.
//!
//! Clients create comments directly, so every new POI comment is forced back
//! into moderation: status reset to `pending`, a server creation time, and a
//! rating on the 1..=5 scale.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    CommentCreatedEvent, CommentCreationTrigger, CommentRepository, SkipReason, TriggerOutcome,
};
use crate::domain::{CommentFields, CommentStatus, Error, ParentCollection, Rating};

/// Partial update computed for a new comment.
///
/// Only the entries that would change the stored document are set, so an
/// already-normalized comment produces an empty patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentPatch {
    /// New status, when the stored one is not `pending`.
    pub status: Option<CommentStatus>,
    /// Stamp `createdAt` with the store clock.
    pub stamp_created_at: bool,
    /// Normalized rating, when it differs from the stored one.
    pub rating: Option<Rating>,
}

impl CommentPatch {
    /// Compute the patch for a freshly created comment.
    ///
    /// # Examples
    /// ```
    /// use torotoro_backend::domain::{CommentFields, CommentPatch, CommentStatus};
    ///
    /// let patch = CommentPatch::for_new_comment(&CommentFields {
    ///     status: Some("approved".into()),
    ///     rating: Some(9.0),
    ///     ..CommentFields::default()
    /// });
    /// assert_eq!(patch.status, Some(CommentStatus::Pending));
    /// assert!(patch.stamp_created_at);
    /// assert_eq!(patch.rating.map(|r| r.value()), Some(5));
    /// ```
    pub fn for_new_comment(fields: &CommentFields) -> Self {
        let rating = Rating::normalize(fields.rating);
        Self {
            status: (!fields.has_status(CommentStatus::Pending)).then_some(CommentStatus::Pending),
            stamp_created_at: fields.created_at.is_none(),
            rating: (!fields.has_rating(rating)).then_some(rating),
        }
    }

    /// Whether applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && !self.stamp_created_at && self.rating.is_none()
    }
}

/// Comment creation handler that normalizes POI comments.
#[derive(Clone)]
pub struct CommentNormalizationService<R> {
    comments: Arc<R>,
}

impl<R> CommentNormalizationService<R> {
    /// Create the handler over a comment repository.
    pub fn new(comments: Arc<R>) -> Self {
        Self { comments }
    }
}

#[async_trait]
impl<R> CommentCreationTrigger for CommentNormalizationService<R>
where
    R: CommentRepository,
{
    async fn comment_created(&self, event: CommentCreatedEvent) -> Result<TriggerOutcome, Error> {
        let CommentCreatedEvent { target, value } = event;
        if target.parent() != ParentCollection::Pois {
            return Ok(TriggerOutcome::Skipped(SkipReason::UnsupportedParent));
        }
        let Some(fields) = value else {
            return Ok(TriggerOutcome::Skipped(SkipReason::MissingSnapshot));
        };

        let patch = CommentPatch::for_new_comment(&fields);
        if patch.is_empty() {
            debug!(comment = %target, "comment already normalized");
            return Ok(TriggerOutcome::Skipped(SkipReason::AlreadyNormalized));
        }

        if !self.comments.apply_patch(&target, &patch).await? {
            debug!(comment = %target, "comment deleted before normalization");
            return Ok(TriggerOutcome::Skipped(SkipReason::CommentGone));
        }

        info!(
            comment = %target,
            status_reset = patch.status.is_some(),
            stamped = patch.stamp_created_at,
            rating = ?patch.rating.map(Rating::value),
            "normalized new comment"
        );
        Ok(TriggerOutcome::Applied)
    }
}
