//! Caller authentication
//!
//! - `password`: argon2 hashing for stored credentials
//! - `extract`: `Authorization: Bearer <token>` -> [`AuthenticatedUser`]
//! - `error`: [`AuthError`] rendered as a 401 API response

pub mod error;
pub mod extract;
pub mod password;

pub use error::{AuthError, AuthErrorCode};
pub use extract::{AuthenticatedUser, authenticate, extract_auth_header, parse_bearer};
pub use password::{PasswordError, check_password, hash_password};
