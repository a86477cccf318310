//! Error mapping helpers shared by the repository implementations

use chatter_core::DomainError;

/// Lower a sqlx error into the domain taxonomy.
///
/// Busy and locked conditions become [`DomainError::StorageConflict`] so
/// callers can retry; everything else is surfaced as a database error with
/// the driver message preserved.
pub(crate) fn map_db_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(ref db) = e {
        if is_busy(db.as_ref()) {
            return DomainError::StorageConflict(db.message().to_string());
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map a unique constraint violation to the conflict produced by
/// `on_conflict`, delegating everything else to [`map_db_error`].
pub(crate) fn map_unique_violation<F>(e: sqlx::Error, on_conflict: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            return on_conflict();
        }
    }
    map_db_error(e)
}

/// SQLITE_BUSY (5) and SQLITE_LOCKED (6), including their extended forms.
fn is_busy(db: &dyn sqlx::error::DatabaseError) -> bool {
    db.code()
        .and_then(|code| code.parse::<i64>().ok())
        .is_some_and(|code| matches!(code & 0xff, 5 | 6))
}
