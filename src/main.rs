//! Simple Bank - service entry point
//!
//! ```text
//! simplebank [--env dev] server [--in-memory]   serve the HTTP API
//! simplebank [--env dev] init-db                create the ledger tables
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use simplebank::config::AppConfig;
use simplebank::db::{Database, schema};
use simplebank::gateway::{self, AppState};
use simplebank::logging::init_logging;
use simplebank::store::{MemoryStore, PgStore, Store};
use simplebank::token::TokenMaker;

#[derive(Parser, Debug)]
#[command(name = "simplebank", version, about = "Ledger backend with atomic transfers")]
struct Cli {
    /// Config profile, loads config/<env>.yaml
    #[arg(long, short, env = "APP_ENV", default_value = "dev")]
    env: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API
    Server {
        /// Keep the ledger in process memory instead of PostgreSQL
        #[arg(long)]
        in_memory: bool,
    },
    /// Create the ledger tables if missing
    InitDb,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.env)?;
    let _guard = init_logging(&config)?;

    tracing::info!(
        env = %cli.env,
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        "Starting simplebank"
    );

    match cli.command {
        Command::Server { in_memory } => serve(&config, in_memory).await,
        Command::InitDb => {
            let db = connect(&config).await?;
            schema::init_schema(db.pool()).await
        }
    }
}

async fn connect(config: &AppConfig) -> Result<Database> {
    let url = config
        .postgres_url
        .as_deref()
        .context("postgres_url is not configured (set it in the config file or DATABASE_URL)")?;
    Database::connect(url)
        .await
        .context("Failed to connect to PostgreSQL")
}

async fn serve(config: &AppConfig, in_memory: bool) -> Result<()> {
    // Fails on a wrong-length key before anything else is started.
    let token_maker = TokenMaker::new(config.token.symmetric_key.as_bytes())
        .context("Invalid token.symmetric_key")?;

    let store: Arc<dyn Store> = if in_memory {
        tracing::warn!("Using in-memory ledger, data is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        let db = connect(config).await?;
        schema::init_schema(db.pool()).await?;
        Arc::new(PgStore::new(db, config.transfer.isolation))
    };

    let access_token_duration = chrono::Duration::try_seconds(
        i64::try_from(config.token.access_token_duration_secs)
            .context("token.access_token_duration_secs out of range")?,
    )
    .context("token.access_token_duration_secs out of range")?;

    let state = AppState::new(
        store,
        Duration::from_millis(config.transfer.timeout_ms),
        token_maker,
        access_token_duration,
    );

    gateway::run_server(&config.gateway, Arc::new(state)).await
}
