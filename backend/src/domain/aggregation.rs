//! Rating aggregate recomputation for POIs.
//!
//! When a POI comment enters the `approved` state the POI's `ratingAvg` and
//! `ratingCount` are recomputed from scratch over its approved comments. The
//! read and the write are separate statements; a later transition into
//! `approved` corrects any concurrent undercount.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    CommentRepository, CommentUpdateTrigger, CommentUpdatedEvent, ParentRatingRepository,
    SkipReason, TriggerOutcome,
};
use crate::domain::{CommentFields, CommentStatus, Error, ParentCollection, RatingAggregate};

/// Whether an update moved a comment into `approved`.
///
/// Re-approving an already approved comment does not count.
pub fn enters_approved(before: &CommentFields, after: &CommentFields) -> bool {
    !before.has_status(CommentStatus::Approved) && after.has_status(CommentStatus::Approved)
}

/// Comment update handler maintaining POI rating aggregates.
#[derive(Clone)]
pub struct RatingAggregationService<C, P> {
    comments: Arc<C>,
    parents: Arc<P>,
}

impl<C, P> RatingAggregationService<C, P> {
    /// Create the handler over the comment and parent repositories.
    pub fn new(comments: Arc<C>, parents: Arc<P>) -> Self {
        Self { comments, parents }
    }
}

#[async_trait]
impl<C, P> CommentUpdateTrigger for RatingAggregationService<C, P>
where
    C: CommentRepository,
    P: ParentRatingRepository,
{
    async fn comment_updated(&self, event: CommentUpdatedEvent) -> Result<TriggerOutcome, Error> {
        let CommentUpdatedEvent {
            target,
            before,
            after,
        } = event;
        if target.parent() != ParentCollection::Pois {
            return Ok(TriggerOutcome::Skipped(SkipReason::UnsupportedParent));
        }
        let (Some(before), Some(after)) = (before, after) else {
            return Ok(TriggerOutcome::Skipped(SkipReason::MissingSnapshot));
        };
        if !enters_approved(&before, &after) {
            return Ok(TriggerOutcome::Skipped(SkipReason::NotEnteringApproved));
        }

        let ratings = self
            .comments
            .approved_ratings(target.parent(), target.parent_id())
            .await?;
        let aggregate = RatingAggregate::from_ratings(ratings);

        let written = self
            .parents
            .write_aggregate(target.parent(), target.parent_id(), aggregate)
            .await?;
        if !written {
            debug!(parent = %target.parent_path(), "parent missing, aggregate dropped");
            return Ok(TriggerOutcome::Skipped(SkipReason::ParentGone));
        }

        info!(
            parent = %target.parent_path(),
            rating_avg = aggregate.rating_avg,
            rating_count = aggregate.rating_count,
            "rating aggregate recomputed"
        );
        Ok(TriggerOutcome::Applied)
    }
}
