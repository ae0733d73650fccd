//! Domain primitives, services and ports.
//!
//! Purpose: define the comment moderation model independently of HTTP and of
//! the document store. Services implement the driving ports in [`ports`] and
//! reach the outside world only through the driven ports declared there.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - CommentRef / CommentFields / CommentStatus: comment documents.
//! - Rating / RatingAggregate: star ratings and parent aggregates.
//! - CallerIdentity / CustomClaims / UserId: who is calling.
//! - CommentNormalizationService, CommentModerationService,
//!   RatingAggregationService, AdminGrantService: the operations.
//! - ChangeFeedRelay: delivers recorded comment writes to the handlers.

pub mod admin_grant;
pub mod aggregation;
pub mod change_feed_relay;
pub mod comment;
pub mod error;
pub mod identity;
pub mod moderation;
pub mod normalization;
pub mod ports;
pub mod rating;
pub mod trace_id;

pub use self::admin_grant::{AdminGrantPolicy, AdminGrantService};
pub use self::aggregation::{RatingAggregationService, enters_approved};
pub use self::change_feed_relay::{ChangeFeedRelay, DEFAULT_RELAY_BATCH_SIZE};
pub use self::comment::{
    CommentFields, CommentRef, CommentStatus, DocumentId, DocumentPathError, ParentCollection,
};
pub use self::error::{Error, ErrorCode};
pub use self::identity::{ADMIN_ROLE, CallerIdentity, CustomClaims, UserId, UserIdValidationError};
pub use self::moderation::{CommentModerationService, ModerationDecision};
pub use self::normalization::{CommentNormalizationService, CommentPatch};
pub use self::rating::{Rating, RatingAggregate};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use torotoro_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::permission_denied("Admin only"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
