//! Access Gate checks run before the transfer engine.
//!
//! The engine trusts its caller on ownership and currency; both are settled
//! here against the stored accounts.

use axum::http::StatusCode;
use thiserror::Error;

use super::types::{ApiError, error_codes};
use crate::store::{Account, Store, StoreError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("account [{0}] not found")]
    AccountNotFound(i64),

    #[error("account [{account_id}] currency mismatch: {actual} vs {expected}")]
    CurrencyMismatch {
        account_id: i64,
        expected: String,
        actual: String,
    },

    #[error("account [{account_id}] doesn't belong to the authenticated user")]
    NotOwner { account_id: i64 },

    #[error(transparent)]
    Store(StoreError),
}

impl AccessError {
    pub fn code(&self) -> &'static str {
        match self {
            AccessError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            AccessError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
            AccessError::NotOwner { .. } => "PERMISSION_DENIED",
            AccessError::Store(e) => e.code(),
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            AccessError::AccountNotFound(_) => 404,
            AccessError::CurrencyMismatch { .. } => 400,
            AccessError::NotOwner { .. } => 403,
            AccessError::Store(e) => e.http_status(),
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(e: AccessError) -> Self {
        let code = match &e {
            AccessError::AccountNotFound(_) => error_codes::ACCOUNT_NOT_FOUND,
            AccessError::CurrencyMismatch { .. } => error_codes::CURRENCY_MISMATCH,
            AccessError::NotOwner { .. } => error_codes::PERMISSION_DENIED,
            AccessError::Store(inner) => return ApiError::from(inner.clone()),
        };
        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ApiError::new(status, code, e.to_string())
    }
}

async fn load_account(store: &dyn Store, id: i64) -> Result<Account, AccessError> {
    match store.get_account(id).await {
        Ok(account) => Ok(account),
        Err(e) if e.is_not_found() => Err(AccessError::AccountNotFound(id)),
        Err(e) => Err(AccessError::Store(e)),
    }
}

pub fn check_currency(account: &Account, currency: &str) -> Result<(), AccessError> {
    if account.currency != currency {
        return Err(AccessError::CurrencyMismatch {
            account_id: account.id,
            expected: currency.to_string(),
            actual: account.currency.clone(),
        });
    }
    Ok(())
}

pub fn check_owner(account: &Account, username: &str) -> Result<(), AccessError> {
    if account.owner != username {
        return Err(AccessError::NotOwner {
            account_id: account.id,
        });
    }
    Ok(())
}

/// Checks, in order: source exists, source currency, caller owns source,
/// destination exists, destination currency.
///
/// Returns both accounts as read before the transfer.
pub async fn authorize_transfer(
    store: &dyn Store,
    username: &str,
    from_account_id: i64,
    to_account_id: i64,
    currency: &str,
) -> Result<(Account, Account), AccessError> {
    let from = load_account(store, from_account_id).await?;
    check_currency(&from, currency)?;
    check_owner(&from, username)?;

    let to = load_account(store, to_account_id).await?;
    check_currency(&to, currency)?;

    Ok((from, to))
}
