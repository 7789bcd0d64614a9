//! Transfer Engine
//!
//! Moves money between two accounts inside one storage transaction:
//!
//! ```text
//! BEGIN
//!   INSERT transfer (from, to, amount)
//!   INSERT entry (from, -amount)
//!   INSERT entry (to,   +amount)
//!   UPDATE balance of min(from, to)   -- row lock #1
//!   UPDATE balance of max(from, to)   -- row lock #2
//! COMMIT            (any error: ROLLBACK)
//! ```
//!
//! Row locks are always taken lowest account id first, so two transfers over
//! the same pair of accounts in opposite directions can never wait on each
//! other in a cycle. The engine keeps no state and does not retry.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::error::TransferError;
use super::types::{TransferTxParams, TransferTxResult};
use crate::store::{CreateEntryParams, CreateTransferParams, LedgerTx, Store, StoreError};

/// Order in which the row locks of two accounts are acquired: lowest id first.
///
/// Symmetric in its arguments, so both directions of a transfer between the
/// same accounts agree on the order.
pub fn lock_order(a: i64, b: i64) -> (i64, i64) {
    if a <= b { (a, b) } else { (b, a) }
}

pub struct TransferEngine {
    store: Arc<dyn Store>,
    timeout: Duration,
}

impl TransferEngine {
    /// `timeout` bounds a whole transfer, lock waits included.
    pub fn new(store: Arc<dyn Store>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Execute one transfer atomically with the configured timeout.
    pub async fn execute_transfer(
        &self,
        params: TransferTxParams,
    ) -> Result<TransferTxResult, TransferError> {
        self.execute_transfer_within(params, self.timeout).await
    }

    /// Execute one transfer, giving up after `timeout`.
    ///
    /// On timeout the in-flight transaction is dropped, which rolls it back
    /// and releases its row locks.
    pub async fn execute_transfer_within(
        &self,
        params: TransferTxParams,
        timeout: Duration,
    ) -> Result<TransferTxResult, TransferError> {
        params.validate()?;

        match tokio::time::timeout(timeout, self.run(params)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    from_account_id = params.from_account_id,
                    to_account_id = params.to_account_id,
                    timeout_ms = timeout.as_millis() as u64,
                    "Transfer timed out, rolled back"
                );
                Err(TransferError::Failed(StoreError::Timeout))
            }
        }
    }

    /// Execute one transfer unless `cancel` completes first.
    pub async fn execute_transfer_until<F>(
        &self,
        params: TransferTxParams,
        cancel: F,
    ) -> Result<TransferTxResult, TransferError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.execute_transfer(params) => result,
            _ = cancel => {
                warn!(
                    from_account_id = params.from_account_id,
                    to_account_id = params.to_account_id,
                    "Transfer cancelled by caller, rolled back"
                );
                Err(TransferError::Cancelled)
            }
        }
    }

    async fn run(&self, params: TransferTxParams) -> Result<TransferTxResult, TransferError> {
        debug!(
            from_account_id = params.from_account_id,
            to_account_id = params.to_account_id,
            amount = params.amount,
            store = self.store.name(),
            "Transfer begin"
        );

        let mut tx = self.store.begin().await?;

        match apply(tx.as_mut(), &params).await {
            Ok(result) => {
                tx.commit().await?;
                info!(
                    transfer_id = result.transfer.id,
                    from_account_id = params.from_account_id,
                    to_account_id = params.to_account_id,
                    amount = params.amount,
                    "Transfer committed"
                );
                Ok(result)
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "Rollback failed, connection will discard the transaction");
                }
                debug!(error = %e, "Transfer rolled back");
                Err(e.into())
            }
        }
    }
}

async fn apply(
    tx: &mut dyn LedgerTx,
    params: &TransferTxParams,
) -> Result<TransferTxResult, StoreError> {
    let transfer = tx
        .create_transfer(CreateTransferParams {
            from_account_id: params.from_account_id,
            to_account_id: params.to_account_id,
            amount: params.amount,
        })
        .await?;

    let from_entry = tx
        .create_entry(CreateEntryParams {
            account_id: params.from_account_id,
            transfer_id: transfer.id,
            amount: -params.amount,
        })
        .await?;

    let to_entry = tx
        .create_entry(CreateEntryParams {
            account_id: params.to_account_id,
            transfer_id: transfer.id,
            amount: params.amount,
        })
        .await?;

    let delta = |id: i64| {
        if id == params.from_account_id {
            -params.amount
        } else {
            params.amount
        }
    };

    let (first, second) = lock_order(params.from_account_id, params.to_account_id);
    let first_account = tx.add_account_balance(first, delta(first)).await?;
    let second_account = tx.add_account_balance(second, delta(second)).await?;

    let (from_account, to_account) = if first == params.from_account_id {
        (first_account, second_account)
    } else {
        (second_account, first_account)
    };

    Ok(TransferTxResult {
        transfer,
        from_account,
        to_account,
        from_entry,
        to_entry,
    })
}
