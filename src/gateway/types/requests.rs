//! Request / response DTOs
//!
//! Requests derive `validator::Validate`; handlers call `validate()` before
//! touching the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::store::{User, is_supported_currency};

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ValidationError::new("alphanum"))
    }
}

fn validate_currency(currency: &str) -> Result<(), ValidationError> {
    if is_supported_currency(currency) {
        Ok(())
    } else {
        Err(ValidationError::new("currency"))
    }
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1), custom(function = "validate_username"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 6))]
    #[schema(example = "secret123")]
    pub password: String,
    #[validate(length(min = 1))]
    #[schema(example = "Alice Liddell")]
    pub full_name: String,
    #[validate(email)]
    #[schema(example = "alice@example.com")]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginUserRequest {
    #[validate(length(min = 1), custom(function = "validate_username"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 6))]
    #[schema(example = "secret123")]
    pub password: String,
}

/// Partial profile update for the authenticated user; absent fields are kept.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    #[schema(example = "Alice Liddell")]
    pub full_name: Option<String>,
    #[validate(email)]
    #[schema(example = "alice@example.org")]
    pub email: Option<String>,
    #[validate(length(min = 6))]
    #[schema(example = "n3w-secret")]
    pub password: Option<String>,
}

/// User as returned by the API (no password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password_changed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            password_changed_at: user.password_changed_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginUserResponse {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAccountRequest {
    #[validate(custom(function = "validate_currency"))]
    #[schema(example = "USD")]
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAccountsQuery {
    /// 1-based page number
    #[validate(range(min = 1))]
    pub page_id: i32,
    #[validate(range(min = 5, max = 10))]
    pub page_size: i32,
}

impl ListAccountsQuery {
    pub fn offset(&self) -> i64 {
        (i64::from(self.page_id) - 1) * i64::from(self.page_size)
    }
}

// ============================================================================
// Transfers
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTransferRequest {
    #[validate(range(min = 1))]
    pub from_account_id: i64,
    #[validate(range(min = 1))]
    pub to_account_id: i64,
    #[validate(range(min = 1))]
    pub amount: i64,
    /// Must match the currency of both accounts
    #[validate(custom(function = "validate_currency"))]
    #[schema(example = "USD")]
    pub currency: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_req(username: &str, password: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            password: password.to_string(),
            full_name: "Alice".to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn test_create_user_validation() {
        assert!(user_req("alice_1", "secret123", "a@b.io").validate().is_ok());
        assert!(user_req("alice-1", "secret123", "a@b.io").validate().is_err());
        assert!(user_req("alice", "short", "a@b.io").validate().is_err());
        assert!(user_req("alice", "secret123", "not-an-email").validate().is_err());
        assert!(user_req("", "secret123", "a@b.io").validate().is_err());
    }

    #[test]
    fn test_update_user_validation() {
        assert!(UpdateUserRequest::default().validate().is_ok());
        let valid = UpdateUserRequest {
            full_name: Some("Alice".to_string()),
            email: Some("a@b.io".to_string()),
            password: Some("secret123".to_string()),
        };
        assert!(valid.validate().is_ok());

        let short = UpdateUserRequest {
            password: Some("short".to_string()),
            ..Default::default()
        };
        assert!(short.validate().is_err());
        let bad_email = UpdateUserRequest {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(bad_email.validate().is_err());
        let blank_name = UpdateUserRequest {
            full_name: Some(String::new()),
            ..Default::default()
        };
        assert!(blank_name.validate().is_err());
    }

    #[test]
    fn test_list_accounts_query_bounds() {
        let q = |page_id, page_size| ListAccountsQuery { page_id, page_size };
        assert!(q(1, 5).validate().is_ok());
        assert!(q(3, 10).validate().is_ok());
        assert!(q(0, 5).validate().is_err());
        assert!(q(1, 4).validate().is_err());
        assert!(q(1, 11).validate().is_err());
        assert_eq!(q(3, 5).offset(), 10);
    }

    #[test]
    fn test_transfer_request_validation() {
        let req = |from, to, amount, currency: &str| CreateTransferRequest {
            from_account_id: from,
            to_account_id: to,
            amount,
            currency: currency.to_string(),
        };
        assert!(req(1, 2, 10, "USD").validate().is_ok());
        assert!(req(0, 2, 10, "USD").validate().is_err());
        assert!(req(1, 2, 0, "USD").validate().is_err());
        assert!(req(1, 2, 10, "JPY").validate().is_err());
    }
}
