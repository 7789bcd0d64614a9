//! Storage error types

use thiserror::Error;

/// Errors surfaced by the ledger storage boundary.
///
/// `NotFound` is kept apart from everything else because callers branch on
/// it (404 instead of 500).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage operation timed out")]
    Timeout,

    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "NOT_FOUND",
            StoreError::Conflict(_) => "CONFLICT",
            StoreError::Timeout => "TIMEOUT",
            StoreError::Database(_) => "DATABASE_ERROR",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            StoreError::NotFound(_) => 404,
            StoreError::Conflict(_) => 403,
            StoreError::Timeout => 503,
            StoreError::Database(_) => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound("record"),
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            e => StoreError::Database(e.to_string()),
        }
    }
}

/// Map a foreign-key violation on insert to `NotFound` for the referenced
/// row; any other error goes through the regular conversion.
pub(crate) fn fk_as_not_found(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_foreign_key_violation() {
            let entity = match db.constraint() {
                Some(c) if c.contains("transfer_id") => "transfer",
                Some(c) if c.contains("owner") => "user",
                _ => "account",
            };
            return StoreError::NotFound(entity);
        }
    }
    StoreError::from(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn test_pool_timeout_maps_to_timeout() {
        assert_eq!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Timeout
        );
    }

    #[test]
    fn test_other_errors_are_opaque() {
        let err = StoreError::from(sqlx::Error::PoolClosed);
        assert!(!err.is_not_found());
        assert_eq!(err.code(), "DATABASE_ERROR");
    }

    #[test]
    fn test_display() {
        assert_eq!(StoreError::NotFound("account").to_string(), "account not found");
    }
}
