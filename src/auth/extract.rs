//! Bearer-token authentication for Axum handlers.
//!
//! Handlers take an [`AuthenticatedUser`] argument; the request is rejected
//! with an [`AuthError`] before the handler runs if the token does not verify.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};

use super::error::{AuthError, AuthErrorCode};
use crate::gateway::state::AppState;
use crate::token::{Payload, TokenMaker};

/// Identity resolved from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub payload: Payload,
}

/// Extract the Authorization header from request.
pub fn extract_auth_header(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AuthError::from_code(AuthErrorCode::MissingAuth))
}

/// Parse `Bearer <token>`. The scheme is case-insensitive.
pub fn parse_bearer(auth_header: &str) -> Result<&str, AuthError> {
    let mut fields = auth_header.split_whitespace();
    let (Some(scheme), Some(token), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(AuthError::from_code(AuthErrorCode::InvalidFormat));
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::new(
            AuthErrorCode::InvalidFormat,
            format!("Unsupported authorization type {}", scheme),
        ));
    }
    Ok(token)
}

/// Header parsing plus token verification, independent of the router state.
pub fn authenticate(headers: &HeaderMap, maker: &TokenMaker) -> Result<AuthenticatedUser, AuthError> {
    let token = parse_bearer(extract_auth_header(headers)?)?;
    let payload = maker.verify_token(token)?;
    Ok(AuthenticatedUser {
        username: payload.username.clone(),
        payload,
    })
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(&parts.headers, &state.token_maker).inspect_err(|e| {
            tracing::debug!(code = e.code.name(), "Request authentication failed");
        })?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::Duration;

    fn maker() -> TokenMaker {
        TokenMaker::new(b"12345678901234567890123456789012").unwrap()
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc").unwrap(), "abc");
        assert_eq!(parse_bearer("bearer abc").unwrap(), "abc");
        assert_eq!(
            parse_bearer("Basic abc").unwrap_err().code,
            AuthErrorCode::InvalidFormat
        );
        assert_eq!(
            parse_bearer("Bearer").unwrap_err().code,
            AuthErrorCode::InvalidFormat
        );
        assert_eq!(
            parse_bearer("Bearer a b").unwrap_err().code,
            AuthErrorCode::InvalidFormat
        );
    }

    #[test]
    fn test_authenticate() {
        let maker = maker();
        let (token, payload) = maker.create_token("alice", Duration::minutes(1)).unwrap();

        let user = authenticate(&headers(&format!("Bearer {token}")), &maker).unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.payload, payload);
    }

    #[test]
    fn test_authenticate_rejections() {
        let maker = maker();

        assert_eq!(
            authenticate(&HeaderMap::new(), &maker).unwrap_err().code,
            AuthErrorCode::MissingAuth
        );
        assert_eq!(
            authenticate(&headers("Bearer nope"), &maker).unwrap_err().code,
            AuthErrorCode::InvalidToken
        );

        let (expired, _) = maker.create_token("alice", -Duration::minutes(1)).unwrap();
        assert_eq!(
            authenticate(&headers(&format!("Bearer {expired}")), &maker)
                .unwrap_err()
                .code,
            AuthErrorCode::ExpiredToken
        );
    }
}
