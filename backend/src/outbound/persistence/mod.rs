//! PostgreSQL persistence adapters using Diesel.
//!
//! The document store of the moderation service is realised as relational
//! tables: `pois`, `categories`, `comments` (keyed by parent collection,
//! parent id and comment id) and `user_claims`. Triggers on `comments` record
//! every insert and update in the `comment_changes` outbox, which stands in
//! for the document store's change feed.
//!
//! - **Thin adapters**: repositories only translate between rows and domain
//!   types. Deciding what to write stays in the domain services.
//! - **Internal models**: `schema.rs` and `models.rs` never leak to the
//!   domain layer.
//! - **Async pooling**: `bb8` pools through `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use torotoro_backend::outbound::persistence::{DbPool, DieselCommentRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/torotoro")).await?;
//! let comments = DieselCommentRepository::new(pool);
//! ```

mod diesel_comment_change_feed;
mod diesel_comment_repository;
pub(crate) mod diesel_helpers;
mod diesel_identity_claims_repository;
mod diesel_parent_rating_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_change_feed::DieselCommentChangeFeed;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_identity_claims_repository::DieselIdentityClaimsRepository;
pub use diesel_parent_rating_repository::DieselParentRatingRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
