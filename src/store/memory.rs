//! In-process ledger storage.
//!
//! Mirrors the PostgreSQL transaction semantics the transfer engine relies
//! on: `add_account_balance` takes an exclusive per-account row lock that is
//! held until commit or rollback, and writes are staged and only become
//! visible on commit. A wrong lock order deadlocks here exactly as it would
//! in the database.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex as RowLock, OwnedMutexGuard};

use super::models::*;
use super::{LedgerTx, Store, StoreError};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<String, User>,
    accounts: BTreeMap<i64, Account>,
    transfers: BTreeMap<i64, Transfer>,
    entries: BTreeMap<i64, Entry>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: Mutex<Tables>,
    row_locks: Mutex<HashMap<i64, Arc<RowLock<()>>>>,
    account_seq: AtomicI64,
    transfer_seq: AtomicI64,
    entry_seq: AtomicI64,
}

impl Inner {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Database("lock poisoned".to_string()))
    }

    fn row_lock(&self, id: i64) -> Result<Arc<RowLock<()>>, StoreError> {
        let mut locks = self
            .row_locks
            .lock()
            .map_err(|_| StoreError::Database("lock poisoned".to_string()))?;
        Ok(locks.entry(id).or_default().clone())
    }
}

/// Ledger storage kept in memory.
///
/// Intended for tests and local development. Cloning shares the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Same value as the `password_changed_at` column default
fn never_changed() -> DateTime<Utc> {
    DateTime::from_timestamp(-62_135_596_800, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

fn page<T: Clone>(rows: impl Iterator<Item = T>, limit: i64, offset: i64) -> Vec<T> {
    rows.skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.tables().map(|_| ())
    }

    async fn create_user(&self, params: CreateUserParams) -> Result<User, StoreError> {
        let mut tables = self.inner.tables()?;
        if tables.users.contains_key(&params.username) {
            return Err(StoreError::Conflict(format!(
                "username {} already exists",
                params.username
            )));
        }
        if tables.users.values().any(|u| u.email == params.email) {
            return Err(StoreError::Conflict(format!(
                "email {} already exists",
                params.email
            )));
        }

        let user = User {
            username: params.username,
            hashed_password: params.hashed_password,
            full_name: params.full_name,
            email: params.email,
            password_changed_at: never_changed(),
            created_at: Utc::now(),
        };
        tables.users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, username: &str) -> Result<User, StoreError> {
        self.inner
            .tables()?
            .users
            .get(username)
            .cloned()
            .ok_or(StoreError::NotFound("user"))
    }

    async fn update_user(&self, params: UpdateUserParams) -> Result<User, StoreError> {
        let mut tables = self.inner.tables()?;
        if !tables.users.contains_key(&params.username) {
            return Err(StoreError::NotFound("user"));
        }
        if let Some(email) = &params.email {
            if tables
                .users
                .values()
                .any(|u| u.username != params.username && &u.email == email)
            {
                return Err(StoreError::Conflict(format!("email {} already exists", email)));
            }
        }

        let user = tables
            .users
            .get_mut(&params.username)
            .ok_or(StoreError::NotFound("user"))?;
        if let Some(full_name) = params.full_name {
            user.full_name = full_name;
        }
        if let Some(email) = params.email {
            user.email = email;
        }
        if let Some(hashed_password) = params.hashed_password {
            user.hashed_password = hashed_password;
            user.password_changed_at = Utc::now();
        }
        Ok(user.clone())
    }

    async fn create_account(&self, params: CreateAccountParams) -> Result<Account, StoreError> {
        let mut tables = self.inner.tables()?;
        if tables
            .accounts
            .values()
            .any(|a| a.owner == params.owner && a.currency == params.currency)
        {
            return Err(StoreError::Conflict(format!(
                "{} already has a {} account",
                params.owner, params.currency
            )));
        }

        let account = Account {
            id: self.inner.account_seq.fetch_add(1, Ordering::SeqCst) + 1,
            owner: params.owner,
            balance: params.balance,
            currency: params.currency,
            created_at: Utc::now(),
        };
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get_account(&self, id: i64) -> Result<Account, StoreError> {
        self.inner
            .tables()?
            .accounts
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("account"))
    }

    async fn list_accounts(&self, params: ListAccountsParams) -> Result<Vec<Account>, StoreError> {
        let tables = self.inner.tables()?;
        Ok(page(
            tables
                .accounts
                .values()
                .filter(|a| a.owner == params.owner)
                .cloned(),
            params.limit,
            params.offset,
        ))
    }

    async fn delete_account(&self, id: i64) -> Result<(), StoreError> {
        // Waits for any open transaction holding the row, like DELETE in PostgreSQL.
        let lock = self.inner.row_lock(id)?;
        let _row = lock.lock_owned().await;

        let mut tables = self.inner.tables()?;
        if !tables.accounts.contains_key(&id) {
            return Err(StoreError::NotFound("account"));
        }
        if tables.entries.values().any(|e| e.account_id == id) {
            return Err(StoreError::Conflict(
                "account has ledger history".to_string(),
            ));
        }
        tables.accounts.remove(&id);
        Ok(())
    }

    async fn get_entry(&self, id: i64) -> Result<Entry, StoreError> {
        self.inner
            .tables()?
            .entries
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("entry"))
    }

    async fn list_entries(&self, params: ListEntriesParams) -> Result<Vec<Entry>, StoreError> {
        let tables = self.inner.tables()?;
        Ok(page(
            tables
                .entries
                .values()
                .filter(|e| e.account_id == params.account_id)
                .cloned(),
            params.limit,
            params.offset,
        ))
    }

    async fn get_transfer(&self, id: i64) -> Result<Transfer, StoreError> {
        self.inner
            .tables()?
            .transfers
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("transfer"))
    }

    async fn list_transfers(
        &self,
        params: ListTransfersParams,
    ) -> Result<Vec<Transfer>, StoreError> {
        let tables = self.inner.tables()?;
        Ok(page(
            tables
                .transfers
                .values()
                .filter(|t| {
                    t.from_account_id == params.from_account_id
                        || t.to_account_id == params.to_account_id
                })
                .cloned(),
            params.limit,
            params.offset,
        ))
    }

    async fn begin(&self) -> Result<Box<dyn LedgerTx>, StoreError> {
        Ok(Box::new(MemoryTx {
            inner: self.inner.clone(),
            held: HashMap::new(),
            balances: HashMap::new(),
            transfers: Vec::new(),
            entries: Vec::new(),
        }))
    }
}

/// Staged writes plus the row locks taken so far
struct MemoryTx {
    inner: Arc<Inner>,
    held: HashMap<i64, OwnedMutexGuard<()>>,
    balances: HashMap<i64, Account>,
    transfers: Vec<Transfer>,
    entries: Vec<Entry>,
}

impl MemoryTx {
    fn account_exists(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.tables()?.accounts.contains_key(&id))
    }

    fn transfer_exists(&self, id: i64) -> Result<bool, StoreError> {
        if self.transfers.iter().any(|t| t.id == id) {
            return Ok(true);
        }
        Ok(self.inner.tables()?.transfers.contains_key(&id))
    }
}

#[async_trait]
impl LedgerTx for MemoryTx {
    async fn create_transfer(
        &mut self,
        params: CreateTransferParams,
    ) -> Result<Transfer, StoreError> {
        if params.amount <= 0 || params.from_account_id == params.to_account_id {
            return Err(StoreError::Database(
                "transfers check constraint violated".to_string(),
            ));
        }
        if !self.account_exists(params.from_account_id)?
            || !self.account_exists(params.to_account_id)?
        {
            return Err(StoreError::NotFound("account"));
        }

        let transfer = Transfer {
            id: self.inner.transfer_seq.fetch_add(1, Ordering::SeqCst) + 1,
            from_account_id: params.from_account_id,
            to_account_id: params.to_account_id,
            amount: params.amount,
            created_at: Utc::now(),
        };
        self.transfers.push(transfer.clone());
        Ok(transfer)
    }

    async fn create_entry(&mut self, params: CreateEntryParams) -> Result<Entry, StoreError> {
        if !self.account_exists(params.account_id)? {
            return Err(StoreError::NotFound("account"));
        }
        if !self.transfer_exists(params.transfer_id)? {
            return Err(StoreError::NotFound("transfer"));
        }

        let entry = Entry {
            id: self.inner.entry_seq.fetch_add(1, Ordering::SeqCst) + 1,
            account_id: params.account_id,
            transfer_id: params.transfer_id,
            amount: params.amount,
            created_at: Utc::now(),
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    async fn add_account_balance(&mut self, id: i64, delta: i64) -> Result<Account, StoreError> {
        if !self.account_exists(id)? {
            return Err(StoreError::NotFound("account"));
        }

        if !self.held.contains_key(&id) {
            let lock = self.inner.row_lock(id)?;
            let guard = lock.lock_owned().await;
            self.held.insert(id, guard);
        }

        // Read after acquiring the lock so the last committed balance is seen.
        let current = match self.balances.get(&id) {
            Some(staged) => staged.clone(),
            None => self
                .inner
                .tables()?
                .accounts
                .get(&id)
                .cloned()
                .ok_or(StoreError::NotFound("account"))?,
        };

        let balance = current
            .balance
            .checked_add(delta)
            .ok_or_else(|| StoreError::Database("bigint out of range".to_string()))?;
        let updated = Account { balance, ..current };
        self.balances.insert(id, updated.clone());
        Ok(updated)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let MemoryTx {
            inner,
            held,
            balances,
            transfers,
            entries,
        } = *self;

        {
            let mut tables = inner.tables()?;
            // Check every referenced row first: a failed commit writes nothing.
            let referenced = balances
                .keys()
                .copied()
                .chain(entries.iter().map(|e| e.account_id))
                .chain(
                    transfers
                        .iter()
                        .flat_map(|t| [t.from_account_id, t.to_account_id]),
                );
            for id in referenced {
                if !tables.accounts.contains_key(&id) {
                    return Err(StoreError::NotFound("account"));
                }
            }

            for (id, staged) in balances {
                if let Some(row) = tables.accounts.get_mut(&id) {
                    row.balance = staged.balance;
                }
            }
            for transfer in transfers {
                tables.transfers.insert(transfer.id, transfer);
            }
            for entry in entries {
                tables.entries.insert(entry.id, entry);
            }
        }

        // Row locks are released only after the writes are visible.
        drop(held);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        drop(self);
        Ok(())
    }
}
