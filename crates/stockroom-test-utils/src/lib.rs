// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Stockroom integration tests.
//!
//! Provides a mock tabular store for fast, deterministic tests without a
//! running database.
//!
//! # Components
//!
//! - [`StoreFixture`] - HTTP mock of the store with table-level helpers

pub mod store;

pub use store::{StoreFixture, StoreFixtureBuilder, TEST_API_KEY, query_pairs};
