// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for a PostgREST-style tabular store.
//!
//! Declarative query intent (table, projection with embedded relations,
//! filters, order, limit) is accumulated in typed builders and turned into
//! exactly one HTTP request when the builder is executed. Failures come back
//! as [`StoreError`]; nothing is retried.
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use stockroom_postgrest::{FilterBuilder, RestClient};
//!
//! let client = RestClient::with_base_url("http://127.0.0.1:54321")?;
//! let open = client
//!     .table("order_items")
//!     .select("product_id, quantity, orders!inner(status)")
//!     .eq("orders.status", "Reservado")
//!     .execute()
//!     .await?;
//! # let _ = open;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod bucket;
pub mod client;
pub mod error;
pub mod filter;
pub mod params;
pub mod query;

pub use bucket::Bucket;
pub use client::RestClient;
pub use error::{ApiErrorBody, StoreError};
pub use filter::{CompareOp, Direction, Filter, PatternOp};
pub use params::QueryParams;
pub use query::{
    DeleteQuery, FilterBuilder, InsertQuery, ReturningInsert, SelectQuery, Table, UpdateQuery,
};
