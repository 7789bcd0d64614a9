use anyhow::{Context, Result};
use sqlx::PgPool;

/// Create the ledger tables if they do not exist yet.
///
/// Every statement is idempotent, so this runs on each server start.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Initializing ledger schema...");

    for (name, ddl) in STATEMENTS {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to create {}", name))?;
    }

    tracing::info!("Ledger schema ready");
    Ok(())
}

const STATEMENTS: &[(&str, &str)] = &[
    ("users table", CREATE_USERS_TABLE),
    ("accounts table", CREATE_ACCOUNTS_TABLE),
    ("accounts owner index", CREATE_ACCOUNTS_OWNER_INDEX),
    ("transfers table", CREATE_TRANSFERS_TABLE),
    ("transfers index", CREATE_TRANSFERS_INDEX),
    ("entries table", CREATE_ENTRIES_TABLE),
    ("entries index", CREATE_ENTRIES_INDEX),
];

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username            VARCHAR PRIMARY KEY,
    hashed_password     VARCHAR NOT NULL,
    full_name           VARCHAR NOT NULL,
    email               VARCHAR UNIQUE NOT NULL,
    password_changed_at TIMESTAMPTZ NOT NULL DEFAULT '0001-01-01 00:00:00Z',
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id         BIGSERIAL PRIMARY KEY,
    owner      VARCHAR NOT NULL REFERENCES users (username),
    balance    BIGINT NOT NULL,
    currency   VARCHAR(3) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT owner_currency_key UNIQUE (owner, currency)
)
"#;

const CREATE_ACCOUNTS_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS accounts_owner_idx ON accounts (owner)";

const CREATE_TRANSFERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transfers (
    id              BIGSERIAL PRIMARY KEY,
    from_account_id BIGINT NOT NULL REFERENCES accounts (id),
    to_account_id   BIGINT NOT NULL REFERENCES accounts (id),
    amount          BIGINT NOT NULL CHECK (amount > 0),
    created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CHECK (from_account_id <> to_account_id)
)
"#;

const CREATE_TRANSFERS_INDEX: &str = "CREATE INDEX IF NOT EXISTS transfers_from_to_idx \
     ON transfers (from_account_id, to_account_id)";

const CREATE_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS entries (
    id          BIGSERIAL PRIMARY KEY,
    account_id  BIGINT NOT NULL REFERENCES accounts (id),
    transfer_id BIGINT NOT NULL REFERENCES transfers (id),
    amount      BIGINT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_ENTRIES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS entries_account_idx ON entries (account_id)";
