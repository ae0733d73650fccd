//! Port for writing rating aggregates onto parent documents.

use async_trait::async_trait;

use crate::domain::{DocumentId, ParentCollection, RatingAggregate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by parent rating adapters.
    pub enum ParentRatingRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } as Unavailable =>
            "parent store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } as Internal =>
            "parent store query failed: {message}",
    }
}

/// Port for parent (POI or category) aggregate storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParentRatingRepository: Send + Sync {
    /// Overwrite `ratingAvg` and `ratingCount` and stamp `updatedAt` with the
    /// store clock.
    ///
    /// Returns `Ok(false)` when the parent document does not exist.
    async fn write_aggregate(
        &self,
        parent: ParentCollection,
        parent_id: &DocumentId,
        aggregate: RatingAggregate,
    ) -> Result<bool, ParentRatingRepositoryError>;
}

/// Fixture implementation that accepts every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureParentRatingRepository;

#[async_trait]
impl ParentRatingRepository for FixtureParentRatingRepository {
    async fn write_aggregate(
        &self,
        _parent: ParentCollection,
        _parent_id: &DocumentId,
        _aggregate: RatingAggregate,
    ) -> Result<bool, ParentRatingRepositoryError> {
        Ok(true)
    }
}
