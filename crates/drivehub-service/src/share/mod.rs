//! Sharing: user grants and public link tokens.

pub mod link;
pub mod service;

pub use link::generate_token;
pub use service::ShareService;
