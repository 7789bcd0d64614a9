use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::store::IsolationLevel;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    /// PostgreSQL connection URL for the ledger tables
    #[serde(default)]
    pub postgres_url: Option<String>,
    pub token: TokenConfig,
    #[serde(default)]
    pub transfer: TransferConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenConfig {
    /// Symmetric signing key, must be exactly 32 bytes
    pub symmetric_key: String,
    #[serde(default = "default_access_token_duration")]
    pub access_token_duration_secs: u64,
}

fn default_access_token_duration() -> u64 {
    15 * 60
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransferConfig {
    /// Upper bound for one transfer transaction, including lock waits
    pub timeout_ms: u64,
    pub isolation: IsolationLevel,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            isolation: IsolationLevel::ReadCommitted,
        }
    }
}

impl AppConfig {
    /// Load `config/<env>.yaml` and apply environment overrides.
    pub fn load(env: &str) -> Result<Self> {
        Self::load_from(format!("config/{}.yaml", env))
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config yaml: {}", path.display()))?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// `PORT`, `DATABASE_URL` and `TOKEN_SYMMETRIC_KEY` win over the file.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.gateway.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port number: {}", port))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.postgres_url = Some(url);
        }
        if let Some(key) = lookup("TOKEN_SYMMETRIC_KEY") {
            self.token.symmetric_key = key;
        }
        Ok(())
    }
}
