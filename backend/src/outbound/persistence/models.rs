//! Diesel row structs. Internal to the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{comment_changes, user_claims};

/// Insert row for `user_claims`; conflicts are resolved by the caller.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_claims)]
pub(crate) struct NewUserClaimsRow<'a> {
    pub uid: &'a str,
    pub role: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

/// One outbox row as recorded by the `comments` triggers.
///
/// `before_*` columns are empty for creations.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = comment_changes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentChangeRow {
    pub sequence: i64,
    pub parent_collection: String,
    pub parent_id: String,
    pub comment_id: String,
    pub kind: String,
    pub before_status: Option<String>,
    pub before_created_at: Option<DateTime<Utc>>,
    pub before_rating: Option<f64>,
    pub before_user_id: Option<String>,
    pub after_status: Option<String>,
    pub after_created_at: Option<DateTime<Utc>>,
    pub after_rating: Option<f64>,
    pub after_user_id: Option<String>,
}
