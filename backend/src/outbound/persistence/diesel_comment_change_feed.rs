//! PostgreSQL-backed `CommentChangeFeed` over the `comment_changes` outbox.
//!
//! Rows are written by triggers on `comments`, so inserts made directly by
//! clients are recorded as well as the backend's own patches. Acknowledging a
//! change deletes its row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{
    CommentChange, CommentChangeEvent, CommentChangeFeed, CommentChangeFeedError,
    CommentCreatedEvent, CommentUpdatedEvent,
};
use crate::domain::{CommentFields, CommentRef, DocumentId, ParentCollection};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::CommentChangeRow;
use super::pool::{DbPool, PoolError};
use super::schema::comment_changes;

/// Diesel-backed implementation of the change feed port.
#[derive(Clone)]
pub struct DieselCommentChangeFeed {
    pool: DbPool,
}

impl DieselCommentChangeFeed {
    /// Create a feed reader with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentChangeFeedError {
    map_basic_pool_error(error, CommentChangeFeedError::connection)
}

fn map_diesel_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> CommentChangeFeedError {
    move |error| {
        map_basic_diesel_error(
            error,
            operation,
            CommentChangeFeedError::query,
            CommentChangeFeedError::connection,
        )
    }
}

fn change_from_row(row: CommentChangeRow) -> Result<CommentChange, String> {
    let parent = row
        .parent_collection
        .parse::<ParentCollection>()
        .map_err(|err| err.to_string())?;
    let parent_id = DocumentId::new(row.parent_id).map_err(|err| err.to_string())?;
    let comment_id = DocumentId::new(row.comment_id).map_err(|err| err.to_string())?;
    let target = CommentRef::new(parent, parent_id, comment_id);

    let after = CommentFields {
        status: row.after_status,
        created_at: row.after_created_at,
        rating: row.after_rating,
        user_id: row.after_user_id,
    };
    let event = match row.kind.as_str() {
        "created" => CommentChangeEvent::Created(CommentCreatedEvent {
            target,
            value: Some(after),
        }),
        "updated" => CommentChangeEvent::Updated(CommentUpdatedEvent {
            target,
            before: Some(CommentFields {
                status: row.before_status,
                created_at: row.before_created_at,
                rating: row.before_rating,
                user_id: row.before_user_id,
            }),
            after: Some(after),
        }),
        other => return Err(format!("unknown change kind `{other}`")),
    };

    Ok(CommentChange {
        sequence: row.sequence,
        event,
    })
}

#[async_trait]
impl CommentChangeFeed for DieselCommentChangeFeed {
    async fn pending_changes(
        &self,
        limit: usize,
    ) -> Result<Vec<CommentChange>, CommentChangeFeedError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = comment_changes::table
            .order(comment_changes::sequence.asc())
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(CommentChangeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error("load pending comment changes"))?;

        let mut changes = Vec::with_capacity(rows.len());
        let mut unreadable = Vec::new();
        for row in rows {
            let sequence = row.sequence;
            match change_from_row(row) {
                Ok(change) => changes.push(change),
                Err(reason) => {
                    warn!(sequence, %reason, "discarding unreadable comment change");
                    unreadable.push(sequence);
                }
            }
        }

        if !unreadable.is_empty() {
            let discarded =
                comment_changes::table.filter(comment_changes::sequence.eq_any(unreadable));
            diesel::delete(discarded)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error("discard unreadable comment changes"))?;
        }

        Ok(changes)
    }

    async fn acknowledge(&self, sequence: i64) -> Result<(), CommentChangeFeedError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(comment_changes::table.find(sequence))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error("acknowledge comment change"))
    }
}
