//! HTTP request handlers, one module per API area.

pub mod activity;
pub mod blob;
pub mod health;
pub mod resource;
pub mod share;
pub mod storage;
pub mod user;
