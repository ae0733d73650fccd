//! PostgreSQL-backed `ParentRatingRepository` implementation.

use async_trait::async_trait;
use diesel::sql_query;
use diesel::sql_types::{Double, Integer, Text};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ParentRatingRepository, ParentRatingRepositoryError};
use crate::domain::{DocumentId, ParentCollection, RatingAggregate};

use super::diesel_helpers::{map_basic_diesel_error, map_basic_pool_error, row_was_updated};
use super::pool::{DbPool, PoolError};

const UPDATE_POI_AGGREGATE_SQL: &str = r#"
UPDATE pois SET rating_avg = $2, rating_count = $3, updated_at = now()
WHERE id = $1
"#;

const UPDATE_CATEGORY_AGGREGATE_SQL: &str = r#"
UPDATE categories SET rating_avg = $2, rating_count = $3, updated_at = now()
WHERE id = $1
"#;

/// Diesel-backed implementation of the parent rating port.
#[derive(Clone)]
pub struct DieselParentRatingRepository {
    pool: DbPool,
}

impl DieselParentRatingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ParentRatingRepositoryError {
    map_basic_pool_error(error, ParentRatingRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ParentRatingRepositoryError {
    map_basic_diesel_error(
        error,
        "write rating aggregate",
        ParentRatingRepositoryError::query,
        ParentRatingRepositoryError::connection,
    )
}

fn aggregate_sql(parent: ParentCollection) -> &'static str {
    match parent {
        ParentCollection::Pois => UPDATE_POI_AGGREGATE_SQL,
        ParentCollection::Categories => UPDATE_CATEGORY_AGGREGATE_SQL,
    }
}

/// Clamp a count into the `int4` column range.
fn count_for_db(count: u32) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

#[async_trait]
impl ParentRatingRepository for DieselParentRatingRepository {
    async fn write_aggregate(
        &self,
        parent: ParentCollection,
        parent_id: &DocumentId,
        aggregate: RatingAggregate,
    ) -> Result<bool, ParentRatingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = sql_query(aggregate_sql(parent))
            .bind::<Text, _>(parent_id.as_str())
            .bind::<Double, _>(aggregate.rating_avg)
            .bind::<Integer, _>(count_for_db(aggregate.rating_count))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        debug!(
            parent = %parent,
            parent_id = %parent_id,
            affected,
            "rating aggregate written"
        );
        Ok(row_was_updated(affected))
    }
}
