use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::TokenError;

/// Claims carried inside an access token. Never mutated after issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub id: Uuid,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
}

impl Payload {
    pub fn new(username: &str, duration: Duration) -> Result<Self, TokenError> {
        Self::new_at(username, duration, Utc::now())
    }

    /// Payload issued at `now`, with a fresh random id.
    pub fn new_at(
        username: &str,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, TokenError> {
        let expired_at = now
            .checked_add_signed(duration)
            .ok_or_else(|| TokenError::Issue("token duration out of range".to_string()))?;

        Ok(Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            issued_at: now,
            expired_at,
        })
    }

    /// Expired strictly after `expired_at`.
    pub fn valid_at(&self, now: DateTime<Utc>) -> Result<(), TokenError> {
        if now > self.expired_at {
            return Err(TokenError::ExpiredToken);
        }
        Ok(())
    }
}
