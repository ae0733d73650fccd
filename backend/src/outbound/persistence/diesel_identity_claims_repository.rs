//! PostgreSQL-backed `IdentityClaimsRepository` implementation.
//!
//! Claims are upserted by uid; the identity does not need a row beforehand.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{IdentityClaimsRepository, IdentityClaimsRepositoryError};
use crate::domain::{CustomClaims, UserId};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewUserClaimsRow;
use super::pool::{DbPool, PoolError};
use super::schema::user_claims;

/// Diesel-backed implementation of the identity claims port.
#[derive(Clone)]
pub struct DieselIdentityClaimsRepository {
    pool: DbPool,
}

impl DieselIdentityClaimsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IdentityClaimsRepositoryError {
    map_basic_pool_error(error, IdentityClaimsRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> IdentityClaimsRepositoryError {
    map_basic_diesel_error(
        error,
        "replace custom claims",
        IdentityClaimsRepositoryError::query,
        IdentityClaimsRepositoryError::connection,
    )
}

#[async_trait]
impl IdentityClaimsRepository for DieselIdentityClaimsRepository {
    async fn replace_custom_claims(
        &self,
        uid: &UserId,
        claims: &CustomClaims,
    ) -> Result<(), IdentityClaimsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserClaimsRow {
            uid: uid.as_str(),
            role: claims.role.as_deref(),
            updated_at: Utc::now(),
        };

        diesel::insert_into(user_claims::table)
            .values(&row)
            .on_conflict(user_claims::uid)
            .do_update()
            .set((
                user_claims::role.eq(excluded(user_claims::role)),
                user_claims::updated_at.eq(excluded(user_claims::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
