//! PostgreSQL-backed `CommentRepository` implementation using Diesel.
//!
//! Patches and moderation decisions are single `UPDATE` statements keyed on
//! the full comment path, so they never create rows and report a missing
//! comment through the affected row count. Timestamps come from the
//! database clock.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Bool, Double, Nullable, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{
    CommentPatch, CommentRef, CommentStatus, DocumentId, ModerationDecision, ParentCollection,
    UserId,
};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error, row_was_updated};
use super::pool::{DbPool, PoolError};
use super::schema::comments;

const APPLY_PATCH_SQL: &str = r#"
UPDATE comments SET
    status = COALESCE($4, status),
    created_at = CASE WHEN $5 THEN now() ELSE created_at END,
    rating = COALESCE($6, rating)
WHERE parent_collection = $1 AND parent_id = $2 AND id = $3
"#;

const APPROVE_SQL: &str = r#"
UPDATE comments SET status = $4, approved_at = now(), approved_by = $5
WHERE parent_collection = $1 AND parent_id = $2 AND id = $3
"#;

const REJECT_SQL: &str = r#"
UPDATE comments SET status = $4, rejected_at = now(), rejected_by = $5
WHERE parent_collection = $1 AND parent_id = $2 AND id = $3
"#;

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    map_basic_pool_error(error, CommentRepositoryError::connection)
}

fn map_diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> CommentRepositoryError {
    move |error| {
        map_basic_diesel_error(
            error,
            operation,
            CommentRepositoryError::query,
            CommentRepositoryError::connection,
        )
    }
}

/// SQL statement stamping `decision` onto a comment.
fn decision_sql(decision: ModerationDecision) -> &'static str {
    match decision {
        ModerationDecision::Approve => APPROVE_SQL,
        ModerationDecision::Reject => REJECT_SQL,
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn apply_patch(
        &self,
        target: &CommentRef,
        patch: &CommentPatch,
    ) -> Result<bool, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = sql_query(APPLY_PATCH_SQL)
            .bind::<Text, _>(target.parent().collection_name())
            .bind::<Text, _>(target.parent_id().as_str())
            .bind::<Text, _>(target.comment_id().as_str())
            .bind::<Nullable<Text>, _>(patch.status.map(CommentStatus::as_str))
            .bind::<Bool, _>(patch.stamp_created_at)
            .bind::<Nullable<Double>, _>(patch.rating.map(|rating| f64::from(rating.value())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error("apply comment patch"))?;

        Ok(row_was_updated(affected))
    }

    async fn record_decision(
        &self,
        target: &CommentRef,
        decision: ModerationDecision,
        moderator: &UserId,
    ) -> Result<bool, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = sql_query(decision_sql(decision))
            .bind::<Text, _>(target.parent().collection_name())
            .bind::<Text, _>(target.parent_id().as_str())
            .bind::<Text, _>(target.comment_id().as_str())
            .bind::<Text, _>(decision.status().as_str())
            .bind::<Text, _>(moderator.as_str())
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error("record moderation decision"))?;

        Ok(row_was_updated(affected))
    }

    async fn approved_ratings(
        &self,
        parent: ParentCollection,
        parent_id: &DocumentId,
    ) -> Result<Vec<Option<f64>>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        comments::table
            .filter(comments::parent_collection.eq(parent.collection_name()))
            .filter(comments::parent_id.eq(parent_id.as_str()))
            .filter(comments::status.eq(CommentStatus::Approved.as_str()))
            .select(comments::rating)
            .load::<Option<f64>>(&mut conn)
            .await
            .map_err(map_diesel_error("load approved ratings"))
    }
}
