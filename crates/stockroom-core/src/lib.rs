// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Stockroom.
//!
//! Holds the error type, the domain rows read from the tabular store, the
//! order lifecycle, and the adapter trait implemented by remote backends.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StockroomError;
pub use traits::StoreAdapter;
pub use types::{
    CustomerId, CustomerProduct, HealthStatus, NewOrder, OPEN_STATES, Order, OrderId, OrderLine,
    OrderStatus, Product, ProductId,
};
