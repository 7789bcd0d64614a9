//! Token Maker
//!
//! Stateless access tokens: HS256 JWTs (jsonwebtoken) over a [`Payload`],
//! signed with one process-wide symmetric key held by [`TokenMaker`].

pub mod error;
pub mod maker;
pub mod payload;

pub use error::TokenError;
pub use maker::{SYMMETRIC_KEY_SIZE, TokenMaker};
pub use payload::Payload;
