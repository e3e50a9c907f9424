//! # drivehub-entity
//!
//! Domain entity models for DriveHub. Every struct in this crate
//! represents a database row or a domain value object. Row types derive
//! `sqlx::FromRow`; API-facing types serialize in camelCase.

pub mod activity;
pub mod resource;
pub mod share;
pub mod user;
