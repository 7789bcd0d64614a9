use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    #[error("Token is invalid")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Failed to issue token: {0}")]
    Issue(String),
}

impl TokenError {
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidKeySize { .. } => "INVALID_KEY_SIZE",
            TokenError::InvalidToken => "INVALID_TOKEN",
            TokenError::ExpiredToken => "EXPIRED_TOKEN",
            TokenError::Issue(_) => "TOKEN_ISSUE_FAILED",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            TokenError::InvalidToken | TokenError::ExpiredToken => 401,
            TokenError::InvalidKeySize { .. } | TokenError::Issue(_) => 500,
        }
    }
}
