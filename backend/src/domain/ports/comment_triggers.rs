//! Driving ports for comment change events.
//!
//! The store's change feed delivers one event per created or updated comment
//! document. Handlers are independent of each other and of the callable
//! operations; they report whether they changed anything so the feed can
//! tell a no-op from a failure.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{CommentFields, CommentRef, Error};

/// A comment document was created.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentCreatedEvent {
    /// The new document.
    pub target: CommentRef,
    /// Field values at creation; `None` when the feed carried no snapshot.
    pub value: Option<CommentFields>,
}

/// A comment document was updated.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentUpdatedEvent {
    /// The updated document.
    pub target: CommentRef,
    /// Field values before the write.
    pub before: Option<CommentFields>,
    /// Field values after the write.
    pub after: Option<CommentFields>,
}

/// Why a handler left the store untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// The event carried no document snapshot.
    MissingSnapshot,
    /// The handler does not act on this parent collection.
    UnsupportedParent,
    /// The comment already satisfies the normalization rules.
    AlreadyNormalized,
    /// The comment was deleted before the write.
    CommentGone,
    /// The update did not move the comment into `approved`.
    NotEnteringApproved,
    /// The parent document does not exist.
    ParentGone,
}

impl SkipReason {
    /// Stable string form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingSnapshot => "missing-snapshot",
            Self::UnsupportedParent => "unsupported-parent",
            Self::AlreadyNormalized => "already-normalized",
            Self::CommentGone => "comment-gone",
            Self::NotEnteringApproved => "not-entering-approved",
            Self::ParentGone => "parent-gone",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of handling one change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The handler wrote to the store.
    Applied,
    /// The handler deliberately did nothing.
    Skipped(SkipReason),
}

/// Handler for comment creation events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentCreationTrigger: Send + Sync {
    /// React to a newly created comment.
    async fn comment_created(&self, event: CommentCreatedEvent) -> Result<TriggerOutcome, Error>;
}

/// Handler for comment update events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentUpdateTrigger: Send + Sync {
    /// React to an updated comment.
    async fn comment_updated(&self, event: CommentUpdatedEvent) -> Result<TriggerOutcome, Error>;
}

/// Fixture handler that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCommentTriggers;

#[async_trait]
impl CommentCreationTrigger for FixtureCommentTriggers {
    async fn comment_created(&self, _event: CommentCreatedEvent) -> Result<TriggerOutcome, Error> {
        Ok(TriggerOutcome::Skipped(SkipReason::UnsupportedParent))
    }
}

#[async_trait]
impl CommentUpdateTrigger for FixtureCommentTriggers {
    async fn comment_updated(&self, _event: CommentUpdatedEvent) -> Result<TriggerOutcome, Error> {
        Ok(TriggerOutcome::Skipped(SkipReason::UnsupportedParent))
    }
}
