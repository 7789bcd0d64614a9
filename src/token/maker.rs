use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::error::TokenError;
use super::payload::Payload;

/// Required length of the symmetric signing key, in bytes
pub const SYMMETRIC_KEY_SIZE: usize = 32;

/// Issues and verifies HS256-signed access tokens.
///
/// Built once at startup and shared by reference; verification consults no
/// server-side state.
#[derive(Clone)]
pub struct TokenMaker {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenMaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenMaker")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

impl TokenMaker {
    /// Fails unless `symmetric_key` is exactly [`SYMMETRIC_KEY_SIZE`] bytes.
    pub fn new(symmetric_key: &[u8]) -> Result<Self, TokenError> {
        if symmetric_key.len() != SYMMETRIC_KEY_SIZE {
            return Err(TokenError::InvalidKeySize {
                expected: SYMMETRIC_KEY_SIZE,
                actual: symmetric_key.len(),
            });
        }

        // Expiry is checked against the payload's own timestamps.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding: EncodingKey::from_secret(symmetric_key),
            decoding: DecodingKey::from_secret(symmetric_key),
            validation,
        })
    }

    pub fn create_token(
        &self,
        username: &str,
        duration: Duration,
    ) -> Result<(String, Payload), TokenError> {
        self.create_token_at(username, duration, Utc::now())
    }

    pub fn create_token_at(
        &self,
        username: &str,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<(String, Payload), TokenError> {
        let payload = Payload::new_at(username, duration, now)?;
        let token = encode(&Header::new(Algorithm::HS256), &payload, &self.encoding)
            .map_err(|e| TokenError::Issue(e.to_string()))?;
        Ok((token, payload))
    }

    pub fn verify_token(&self, token: &str) -> Result<Payload, TokenError> {
        self.verify_token_at(token, Utc::now())
    }

    /// Signature first, then expiry: a tampered token is never reported as
    /// expired.
    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Payload, TokenError> {
        let payload = decode::<Payload>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::InvalidToken)?
            .claims;
        payload.valid_at(now)?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8; 32] = b"12345678901234567890123456789012";

    fn maker() -> TokenMaker {
        TokenMaker::new(KEY).unwrap()
    }

    #[test]
    fn test_wrong_key_size_fails_at_construction() {
        for len in [0, 16, 31, 33, 64] {
            let key = vec![7u8; len];
            assert_eq!(
                TokenMaker::new(&key).unwrap_err(),
                TokenError::InvalidKeySize {
                    expected: SYMMETRIC_KEY_SIZE,
                    actual: len
                }
            );
        }
    }

    #[test]
    fn test_create_and_verify() {
        let maker = maker();
        let duration = Duration::minutes(1);
        let (token, issued) = maker.create_token("alice", duration).unwrap();
        assert!(!token.is_empty());

        let payload = maker.verify_token(&token).unwrap();
        assert_eq!(payload, issued);
        assert_eq!(payload.username, "alice");
        assert_eq!(payload.expired_at, payload.issued_at + duration);
    }

    #[test]
    fn test_expiry_boundary() {
        let maker = maker();
        let now = Utc::now();
        let duration = Duration::seconds(30);
        let (token, payload) = maker.create_token_at("alice", duration, now).unwrap();

        let eps = Duration::milliseconds(1);
        assert!(maker.verify_token_at(&token, payload.expired_at - eps).is_ok());
        assert_eq!(
            maker.verify_token_at(&token, payload.expired_at + eps),
            Err(TokenError::ExpiredToken)
        );
    }

    #[test]
    fn test_expired_token() {
        let maker = maker();
        let (token, _) = maker.create_token("alice", -Duration::minutes(1)).unwrap();
        assert_eq!(maker.verify_token(&token), Err(TokenError::ExpiredToken));
    }

    #[test]
    fn test_any_byte_flip_is_invalid_not_expired() {
        let maker = maker();
        // Already expired: a flip must still report invalid, never expired.
        let (token, _) = maker.create_token("alice", -Duration::minutes(1)).unwrap();

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            assert_eq!(
                maker.verify_token(&tampered),
                Err(TokenError::InvalidToken),
                "byte {i} flipped"
            );
        }
    }

    #[test]
    fn test_other_key_rejects() {
        let (token, _) = maker().create_token("alice", Duration::minutes(1)).unwrap();
        let other = TokenMaker::new(b"abcdefghijabcdefghijabcdefghijab").unwrap();
        assert_eq!(other.verify_token(&token), Err(TokenError::InvalidToken));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let maker = maker();
        for token in ["", "abc", "a.b.c", "..."] {
            assert_eq!(maker.verify_token(token), Err(TokenError::InvalidToken));
        }
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", maker());
        assert!(!rendered.contains("1234567890"));
    }
}
