//! API Response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `error_codes`: Standard error code constants
//! - `ApiError` / `ApiResult`: handler error plumbing

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthError;
use crate::store::StoreError;
use crate::transfer::TransferError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const SAME_ACCOUNT: i32 = 1002;
    pub const CURRENCY_MISMATCH: i32 = 1003;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const INVALID_AUTH_FORMAT: i32 = 2002;
    pub const INVALID_TOKEN: i32 = 2003;
    pub const TOKEN_EXPIRED: i32 = 2004;
    pub const INVALID_CREDENTIALS: i32 = 2005;

    // Permission errors (3xxx)
    pub const PERMISSION_DENIED: i32 = 3001;

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4000;
    pub const ACCOUNT_NOT_FOUND: i32 = 4001;
    pub const USER_NOT_FOUND: i32 = 4002;
    pub const ALREADY_EXISTS: i32 = 4009;
    pub const REQUEST_CANCELLED: i32 = 4099;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    pub const TIMEOUT: i32 = 5004;
}

// ============================================================================
// Handler errors
// ============================================================================

pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// 200 OK with the success envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// Error rendered as `(status, ApiResponse { code, msg })`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, error_codes::PERMISSION_DENIED, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, msg)
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            msg,
        )
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }

    pub fn into_err<T>(self) -> ApiResult<T> {
        Err(self)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.code, self.msg))).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::new(e.code.http_status(), e.code.code(), e.message)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound("account") => Self::new(
                StatusCode::NOT_FOUND,
                error_codes::ACCOUNT_NOT_FOUND,
                "account not found",
            ),
            StoreError::NotFound("user") => Self::new(
                StatusCode::NOT_FOUND,
                error_codes::USER_NOT_FOUND,
                "user not found",
            ),
            StoreError::NotFound(entity) => Self::not_found(format!("{} not found", entity)),
            // Unique violations are reported as forbidden, matching the public API.
            StoreError::Conflict(msg) => {
                Self::new(StatusCode::FORBIDDEN, error_codes::ALREADY_EXISTS, msg)
            }
            StoreError::Timeout => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                error_codes::TIMEOUT,
                "storage timed out",
            ),
            StoreError::Database(msg) => {
                tracing::error!(error = %msg, "Storage failure");
                Self::internal("internal error")
            }
        }
    }
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        let status =
            StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let msg = e.to_string();
        match e {
            TransferError::SameAccount => Self::new(status, error_codes::SAME_ACCOUNT, msg),
            TransferError::InvalidAmount => Self::new(status, error_codes::INVALID_PARAMETER, msg),
            TransferError::AccountNotFound => {
                Self::new(status, error_codes::ACCOUNT_NOT_FOUND, msg)
            }
            TransferError::Cancelled => Self::new(status, error_codes::REQUEST_CANCELLED, msg),
            TransferError::Failed(StoreError::Timeout) => {
                Self::new(status, error_codes::TIMEOUT, msg)
            }
            TransferError::Failed(inner) => {
                tracing::error!(error = %inner, "Transfer failed");
                Self::new(status, error_codes::INTERNAL_ERROR, "transfer failed")
            }
        }
    }
}
