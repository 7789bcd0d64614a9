//! Transfer Error Types

use thiserror::Error;

use crate::store::StoreError;

/// Transfer engine error types.
///
/// Preconditions are rejected before any storage write. Every storage
/// failure after the transaction has begun is reported as `Failed`; the
/// transaction has been rolled back by then.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Source and destination account cannot be the same")]
    SameAccount,

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Transfer cancelled by caller")]
    Cancelled,

    #[error("Transfer failed: {0}")]
    Failed(StoreError),
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::SameAccount => "SAME_ACCOUNT",
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            TransferError::Cancelled => "CANCELLED",
            TransferError::Failed(_) => "TRANSFER_FAILED",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::SameAccount | TransferError::InvalidAmount => 400,
            TransferError::AccountNotFound => 404,
            TransferError::Cancelled => 499,
            TransferError::Failed(StoreError::Timeout) => StoreError::Timeout.http_status(),
            TransferError::Failed(_) => 500,
        }
    }
}

impl From<StoreError> for TransferError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound("account") => TransferError::AccountNotFound,
            e => TransferError::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TransferError::SameAccount.code(), "SAME_ACCOUNT");
        assert_eq!(TransferError::AccountNotFound.code(), "ACCOUNT_NOT_FOUND");
        assert_eq!(
            TransferError::Failed(StoreError::Timeout).code(),
            "TRANSFER_FAILED"
        );
    }

    #[test]
    fn test_http_status() {
        assert_eq!(TransferError::InvalidAmount.http_status(), 400);
        assert_eq!(TransferError::AccountNotFound.http_status(), 404);
        assert_eq!(
            TransferError::Failed(StoreError::Database("boom".into())).http_status(),
            500
        );
    }

    #[test]
    fn test_timeout_status_matches_storage_timeout() {
        assert_eq!(TransferError::Failed(StoreError::Timeout).http_status(), 503);
        assert_eq!(
            TransferError::Failed(StoreError::Timeout).http_status(),
            StoreError::Timeout.http_status()
        );
    }

    #[test]
    fn test_missing_account_is_distinct_from_storage_failure() {
        assert_eq!(
            TransferError::from(StoreError::NotFound("account")),
            TransferError::AccountNotFound
        );
        assert!(matches!(
            TransferError::from(StoreError::Conflict("x".into())),
            TransferError::Failed(_)
        ));
    }
}
