//! Port for the outbox of comment writes awaiting delivery.
//!
//! Every insert into and update of a comment is recorded by the store in
//! write order. The relay reads the oldest entries, hands each to the
//! matching trigger handler and acknowledges it once handled, so a write made
//! by a client or by a moderation call reaches the handlers exactly as a
//! change-feed delivery would.

use async_trait::async_trait;

use super::comment_triggers::{CommentCreatedEvent, CommentUpdatedEvent};
use super::define_port_error;

define_port_error! {
    /// Errors raised by change feed adapters.
    pub enum CommentChangeFeedError {
        /// Store connection could not be established.
        Connection { message: String } as Unavailable =>
            "comment change feed connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } as Internal =>
            "comment change feed query failed: {message}",
    }
}

/// What happened to the comment.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentChangeEvent {
    Created(CommentCreatedEvent),
    Updated(CommentUpdatedEvent),
}

/// One recorded comment write.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentChange {
    /// Position in the feed; strictly increasing in write order.
    pub sequence: i64,
    pub event: CommentChangeEvent,
}

/// Port over the recorded comment writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentChangeFeed: Send + Sync {
    /// Oldest unacknowledged changes in write order, at most `limit`.
    async fn pending_changes(
        &self,
        limit: usize,
    ) -> Result<Vec<CommentChange>, CommentChangeFeedError>;

    /// Drop a handled change from the feed. Acknowledging an unknown
    /// sequence is not an error.
    async fn acknowledge(&self, sequence: i64) -> Result<(), CommentChangeFeedError>;
}

/// Fixture feed with nothing pending.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommentChangeFeed;

#[async_trait]
impl CommentChangeFeed for FixtureCommentChangeFeed {
    async fn pending_changes(
        &self,
        _limit: usize,
    ) -> Result<Vec<CommentChange>, CommentChangeFeedError> {
        Ok(Vec::new())
    }

    async fn acknowledge(&self, _sequence: i64) -> Result<(), CommentChangeFeedError> {
        Ok(())
    }
}
