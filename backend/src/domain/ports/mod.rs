//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_grant_command;
mod comment_change_feed;
mod comment_moderation_command;
mod comment_repository;
mod comment_triggers;
mod identity_claims_repository;
mod parent_rating_repository;

#[cfg(test)]
pub use admin_grant_command::MockAdminGrantCommand;
pub use admin_grant_command::{AdminGrantCommand, FixtureAdminGrantCommand, GrantAdminRequest};
#[cfg(test)]
pub use comment_change_feed::MockCommentChangeFeed;
pub use comment_change_feed::{
    CommentChange, CommentChangeEvent, CommentChangeFeed, CommentChangeFeedError,
    FixtureCommentChangeFeed,
};
#[cfg(test)]
pub use comment_moderation_command::MockCommentModerationCommand;
pub use comment_moderation_command::{
    CommentModerationCommand, FixtureCommentModerationCommand, ModerateCommentRequest,
};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{
    CommentRepository, CommentRepositoryError, FixtureCommentRepository,
};
#[cfg(test)]
pub use comment_triggers::{MockCommentCreationTrigger, MockCommentUpdateTrigger};
pub use comment_triggers::{
    CommentCreatedEvent, CommentCreationTrigger, CommentUpdateTrigger, CommentUpdatedEvent,
    FixtureCommentTriggers, SkipReason, TriggerOutcome,
};
#[cfg(test)]
pub use identity_claims_repository::MockIdentityClaimsRepository;
pub use identity_claims_repository::{
    FixtureIdentityClaimsRepository, IdentityClaimsRepository, IdentityClaimsRepositoryError,
};
#[cfg(test)]
pub use parent_rating_repository::MockParentRatingRepository;
pub use parent_rating_repository::{
    FixtureParentRatingRepository, ParentRatingRepository, ParentRatingRepositoryError,
};
