//! Public link token generation.

use rand::Rng;

/// Random bytes behind each public link token.
pub const TOKEN_BYTES: usize = 32;

/// Generates a random public link token: 64 lowercase hex characters.
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
    hex::encode(bytes)
}
