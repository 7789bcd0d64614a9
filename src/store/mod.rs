//! Ledger storage boundary
//!
//! - `Store`: row-level CRUD for users, accounts, entries and transfers
//! - `LedgerTx`: one open storage transaction used by the transfer engine
//! - `PgStore`: PostgreSQL implementation (sqlx)
//! - `MemoryStore`: in-process implementation with the same locking rules
//!
//! Account balances are only written through `LedgerTx::add_account_balance`.

pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use models::{
    Account, CreateAccountParams, CreateEntryParams, CreateTransferParams, CreateUserParams,
    Entry, ListAccountsParams, ListEntriesParams, ListTransfersParams, SUPPORTED_CURRENCIES,
    Transfer, UpdateUserParams, User, is_supported_currency,
};
pub use postgres::PgStore;

/// Transaction isolation level used for transfer transactions.
///
/// `ReadCommitted` is enough for transfers: balances change only through
/// `balance = balance + delta`, which reads the latest committed row under its lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    /// Statement that must run first inside the transaction
    pub fn set_statement(self) -> &'static str {
        match self {
            IsolationLevel::ReadCommitted => "SET TRANSACTION ISOLATION LEVEL READ COMMITTED",
            IsolationLevel::RepeatableRead => "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ",
            IsolationLevel::Serializable => "SET TRANSACTION ISOLATION LEVEL SERIALIZABLE",
        }
    }
}

/// Row-level access to the ledger tables.
///
/// Single-row lookups return `StoreError::NotFound` for a missing row.
#[async_trait]
pub trait Store: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn create_user(&self, params: CreateUserParams) -> Result<User, StoreError>;
    async fn get_user(&self, username: &str) -> Result<User, StoreError>;
    async fn update_user(&self, params: UpdateUserParams) -> Result<User, StoreError>;

    async fn create_account(&self, params: CreateAccountParams) -> Result<Account, StoreError>;
    async fn get_account(&self, id: i64) -> Result<Account, StoreError>;
    async fn list_accounts(&self, params: ListAccountsParams) -> Result<Vec<Account>, StoreError>;
    async fn delete_account(&self, id: i64) -> Result<(), StoreError>;

    async fn get_entry(&self, id: i64) -> Result<Entry, StoreError>;
    async fn list_entries(&self, params: ListEntriesParams) -> Result<Vec<Entry>, StoreError>;

    async fn get_transfer(&self, id: i64) -> Result<Transfer, StoreError>;
    async fn list_transfers(&self, params: ListTransfersParams)
    -> Result<Vec<Transfer>, StoreError>;

    /// Open a transaction. Entries and transfers are insert-only and can
    /// only be written through one.
    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError>;
}

/// An open storage transaction.
///
/// Nothing written through it is visible to others before `commit`.
/// Dropping it without committing rolls it back and releases its row locks.
#[async_trait]
pub trait LedgerTx: Send {
    async fn create_transfer(
        &mut self,
        params: CreateTransferParams,
    ) -> Result<Transfer, StoreError>;

    async fn create_entry(&mut self, params: CreateEntryParams) -> Result<Entry, StoreError>;

    /// Lock the account row, add `delta` to its balance and return the
    /// updated row. The lock is held until commit or rollback.
    async fn add_account_balance(&mut self, id: i64, delta: i64) -> Result<Account, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolation_level_from_config() {
        let level: IsolationLevel = serde_yaml::from_str("repeatable_read").unwrap();
        assert_eq!(level, IsolationLevel::RepeatableRead);
        assert!(level.set_statement().ends_with("REPEATABLE READ"));
    }
}
