//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Points of interest carrying the legacy comment aggregate.
    pois (id) {
        id -> Text,
        /// Mean approved rating, two decimals.
        rating_avg -> Float8,
        rating_count -> Int4,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Categories; same aggregate columns as `pois`.
    categories (id) {
        id -> Text,
        rating_avg -> Float8,
        rating_count -> Int4,
        updated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Comments under either parent collection.
    ///
    /// Every column except the key is nullable because clients write the
    /// rows directly and the backend only patches them.
    comments (parent_collection, parent_id, id) {
        /// `pois` or `categories`.
        parent_collection -> Text,
        parent_id -> Text,
        id -> Text,
        status -> Nullable<Text>,
        created_at -> Nullable<Timestamptz>,
        rating -> Nullable<Float8>,
        user_id -> Nullable<Text>,
        approved_at -> Nullable<Timestamptz>,
        approved_by -> Nullable<Text>,
        rejected_at -> Nullable<Timestamptz>,
        rejected_by -> Nullable<Text>,
    }
}

diesel::table! {
    /// Custom claims read by the gateway when it verifies identity tokens.
    user_claims (uid) {
        uid -> Text,
        role -> Nullable<Text>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Outbox of comment writes recorded by database triggers.
    comment_changes (sequence) {
        sequence -> Int8,
        parent_collection -> Text,
        parent_id -> Text,
        comment_id -> Text,
        /// `created` or `updated`.
        kind -> Text,
        before_status -> Nullable<Text>,
        before_created_at -> Nullable<Timestamptz>,
        before_rating -> Nullable<Float8>,
        before_user_id -> Nullable<Text>,
        after_status -> Nullable<Text>,
        after_created_at -> Nullable<Timestamptz>,
        after_rating -> Nullable<Float8>,
        after_user_id -> Nullable<Text>,
        recorded_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    pois,
    categories,
    comments,
    comment_changes,
    user_claims
);
