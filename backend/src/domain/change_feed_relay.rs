//! Delivery of recorded comment writes to the trigger handlers.
//!
//! The relay reads the change feed in write order, dispatches creations to
//! normalization and updates to aggregation, and acknowledges each change
//! only after its handler returned. A handler failure stops the pass and
//! leaves that change at the head of the feed, so the next pass retries it
//! before anything newer. Both handlers are idempotent, which makes a
//! redelivery after a lost acknowledgement harmless.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use crate::domain::Error;
use crate::domain::ports::{
    CommentChange, CommentChangeEvent, CommentChangeFeed, CommentCreationTrigger,
    CommentUpdateTrigger, TriggerOutcome,
};

/// Changes read per feed query.
pub const DEFAULT_RELAY_BATCH_SIZE: usize = 100;

/// Relay from the comment change feed to the trigger handlers.
#[derive(Clone)]
pub struct ChangeFeedRelay {
    feed: Arc<dyn CommentChangeFeed>,
    created: Arc<dyn CommentCreationTrigger>,
    updated: Arc<dyn CommentUpdateTrigger>,
    batch_size: usize,
}

impl ChangeFeedRelay {
    /// Relay `feed` into the creation and update handlers.
    pub fn new(
        feed: Arc<dyn CommentChangeFeed>,
        created: Arc<dyn CommentCreationTrigger>,
        updated: Arc<dyn CommentUpdateTrigger>,
    ) -> Self {
        Self {
            feed,
            created,
            updated,
            batch_size: DEFAULT_RELAY_BATCH_SIZE,
        }
    }

    /// Read at most `batch_size` changes per query; zero is raised to one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Deliver one batch of pending changes.
    ///
    /// Returns how many changes were handled and acknowledged.
    ///
    /// # Errors
    /// Returns the first feed or handler failure. Changes before it stay
    /// acknowledged; the failed change and those after it stay pending.
    pub async fn relay_pending(&self) -> Result<usize, Error> {
        let changes = self.feed.pending_changes(self.batch_size).await?;
        let mut relayed = 0;
        for CommentChange { sequence, event } in changes {
            let outcome = self.dispatch(event).await?;
            debug!(sequence, ?outcome, "relayed comment change");
            self.feed.acknowledge(sequence).await?;
            relayed += 1;
        }
        Ok(relayed)
    }

    async fn dispatch(&self, event: CommentChangeEvent) -> Result<TriggerOutcome, Error> {
        match event {
            CommentChangeEvent::Created(event) => self.created.comment_created(event).await,
            CommentChangeEvent::Updated(event) => self.updated.comment_updated(event).await,
        }
    }

    /// Drain everything currently pending, one batch at a time.
    ///
    /// Stops at the first failure and returns how many changes were handled
    /// before it.
    pub async fn drain(&self) -> Result<usize, Error> {
        let mut total = 0;
        loop {
            let relayed = self.relay_pending().await?;
            total += relayed;
            if relayed < self.batch_size {
                return Ok(total);
            }
        }
    }

    /// Poll the feed every `poll_interval` until the task is dropped.
    ///
    /// Failures are logged and retried on the next tick.
    pub async fn run(self, poll_interval: Duration) {
        let mut ticker = time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match self.drain().await {
                Ok(0) => {}
                Ok(relayed) => debug!(relayed, "comment change feed drained"),
                Err(error) => warn!(%error, "comment change relay failed; retrying next tick"),
            }
        }
    }
}
