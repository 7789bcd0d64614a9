//! Authentication error types.
//!
//! Rendered in the same `ApiResponse` envelope as every other API error.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::gateway::types::{ApiResponse, error_codes};
use crate::token::TokenError;

/// Authentication error codes (2001-2005).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AuthErrorCode {
    /// Authorization header absent
    MissingAuth = error_codes::MISSING_AUTH,
    /// Authorization header is not `Bearer <token>`
    InvalidFormat = error_codes::INVALID_AUTH_FORMAT,
    /// Token malformed or signature mismatch
    InvalidToken = error_codes::INVALID_TOKEN,
    /// Token signature valid but past its expiry
    ExpiredToken = error_codes::TOKEN_EXPIRED,
    /// Username/password pair rejected at login
    InvalidCredentials = error_codes::INVALID_CREDENTIALS,
}

impl AuthErrorCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MissingAuth => "MISSING_AUTH",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::ExpiredToken => "EXPIRED_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
        }
    }

    /// All authentication failures are 401.
    pub fn http_status(self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

/// Authentication error with message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub code: AuthErrorCode,
    pub message: String,
}

impl AuthError {
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_code(code: AuthErrorCode) -> Self {
        let message = match code {
            AuthErrorCode::MissingAuth => "Missing Authorization header",
            AuthErrorCode::InvalidFormat => "Invalid Authorization header format",
            AuthErrorCode::InvalidToken => "Invalid token",
            AuthErrorCode::ExpiredToken => "Token has expired",
            AuthErrorCode::InvalidCredentials => "Invalid username or password",
        };
        Self::new(code, message)
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::ExpiredToken => Self::from_code(AuthErrorCode::ExpiredToken),
            _ => Self::from_code(AuthErrorCode::InvalidToken),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.code.code(), self.message);
        (self.code.http_status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AuthErrorCode::MissingAuth.code(), 2001);
        assert_eq!(AuthErrorCode::InvalidCredentials.code(), 2005);
    }

    #[test]
    fn test_expired_and_invalid_stay_distinct() {
        assert_eq!(
            AuthError::from(TokenError::ExpiredToken).code,
            AuthErrorCode::ExpiredToken
        );
        assert_eq!(
            AuthError::from(TokenError::InvalidToken).code,
            AuthErrorCode::InvalidToken
        );
    }

    #[test]
    fn test_into_response_status() {
        let resp = AuthError::from_code(AuthErrorCode::InvalidToken).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
