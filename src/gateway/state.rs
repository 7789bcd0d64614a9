use std::sync::Arc;

use chrono::Duration;

use crate::store::Store;
use crate::token::TokenMaker;
use crate::transfer::TransferEngine;

/// Gateway application state (shared)
#[derive(Clone)]
pub struct AppState {
    /// Ledger storage (PostgreSQL or in-memory)
    pub store: Arc<dyn Store>,
    /// Transfer engine over the same store
    pub engine: Arc<TransferEngine>,
    /// Token maker, built once from the configured key
    pub token_maker: Arc<TokenMaker>,
    /// Lifetime of access tokens issued at login
    pub access_token_duration: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        transfer_timeout: std::time::Duration,
        token_maker: TokenMaker,
        access_token_duration: Duration,
    ) -> Self {
        Self {
            engine: Arc::new(TransferEngine::new(store.clone(), transfer_timeout)),
            store,
            token_maker: Arc::new(token_maker),
            access_token_duration,
        }
    }
}
