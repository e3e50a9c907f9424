//! # drivehub-auth
//!
//! Verification of the HS256 bearer tokens that identify the calling user.
//! Tokens are issued by an external identity service; the encoder here is
//! used by tests and tooling to mint compatible tokens.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
