//! Simple Bank - ledger backend
//!
//! Accounts, double-entry ledger rows and atomic transfers between accounts,
//! served over an HTTP API gated by stateless access tokens.
//!
//! # Modules
//!
//! - [`store`] - Ledger storage traits, models, PostgreSQL and in-memory backends
//! - [`transfer`] - Transfer engine (atomic, deadlock-free)
//! - [`token`] - Access token maker
//! - [`auth`] - Password hashing and bearer-token extraction
//! - [`gateway`] - HTTP API (Access Gate)
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`config`] / [`logging`] - Process setup

pub mod auth;
pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod store;
pub mod token;
pub mod transfer;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use store::{MemoryStore, PgStore, Store, StoreError};
pub use token::{Payload, TokenError, TokenMaker};
pub use transfer::{TransferEngine, TransferError, TransferTxParams, TransferTxResult, lock_order};
