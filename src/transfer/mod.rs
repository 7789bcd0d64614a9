//! Atomic fund transfers between two accounts
//!
//! - `engine`: `TransferEngine` and the `lock_order` rule
//! - `types`: `TransferTxParams` / `TransferTxResult`
//! - `error`: `TransferError`

pub mod engine;
pub mod error;
pub mod types;

pub use engine::{TransferEngine, lock_order};
pub use error::TransferError;
pub use types::{TransferTxParams, TransferTxResult};
