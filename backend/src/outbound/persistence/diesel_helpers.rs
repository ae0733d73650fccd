//! Error mapping shared by the Diesel repositories.
//!
//! Every port error in this layer has the same two-variant shape: a
//! connection failure (reported as unavailable) and a query failure (reported
//! as internal). These helpers take the port's constructors so each adapter
//! maps errors the same way.

use tracing::debug;

use super::pool::PoolError;

/// Map a pool error through the port's connection constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

/// Map a Diesel error through the port's query or connection constructor.
///
/// A closed connection is a connection failure; everything else, including
/// `NotFound`, is a query failure.
pub fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    operation: &str,
    query: Q,
    connection: C,
) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            %operation,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::BrokenTransactionManager => connection("database connection error"),
        _ => query("database error"),
    }
}

/// Whether an `UPDATE` touched the targeted row.
pub fn row_was_updated(affected_rows: usize) -> bool {
    affected_rows > 0
}
