// SPDX-License-Identifier: AGPL-3.0-or-later

//! Helpers for writing tests against a fully migrated store and a running
//! HTTP API.
mod client;
mod db;
mod node;
mod runner;

pub use client::{http_test_client, TestClient};
pub use db::initialize_db;
pub use node::TestNode;
pub use runner::test_runner;

/// Database connection string used by all tests.
pub const TEST_DATABASE_URL: &str = "sqlite::memory:";
