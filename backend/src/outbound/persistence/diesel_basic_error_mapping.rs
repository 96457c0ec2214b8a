//! Shared Diesel error mapping for the repositories.
//!
//! Each repository supplies constructors for its own error enum; the
//! classification of pool and Diesel failures lives here once.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Constraint-level failure a repository may want to report specifically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintViolation {
    Unique,
    ForeignKey,
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Classify a Diesel error as a unique or foreign-key violation.
pub(crate) fn constraint_violation(error: &DieselError) -> Option<ConstraintViolation> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            Some(ConstraintViolation::Unique)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            Some(ConstraintViolation::ForeignKey)
        }
        _ => None,
    }
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound` and query-builder failures map to query errors; a closed
/// connection maps to a connection error.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}
