//! End-to-end tests against a PostgreSQL database.
//!
//! Set `DRIVEHUB_TEST_DATABASE_URL` to run them.

mod helpers;
mod resource_test;
mod share_test;
