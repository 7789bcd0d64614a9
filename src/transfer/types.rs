//! Transfer engine input and output types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::TransferError;
use crate::store::{Account, Entry, Transfer};

/// Input of one atomic transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTxParams {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: i64,
}

impl TransferTxParams {
    /// Precondition check, run before the storage transaction begins
    pub fn validate(&self) -> Result<(), TransferError> {
        if self.from_account_id == self.to_account_id {
            return Err(TransferError::SameAccount);
        }
        if self.amount <= 0 {
            return Err(TransferError::InvalidAmount);
        }
        Ok(())
    }
}

/// Everything one committed transfer wrote, as of its commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TransferTxResult {
    pub transfer: Transfer,
    pub from_account: Account,
    pub to_account: Account,
    pub from_entry: Entry,
    pub to_entry: Entry,
}
