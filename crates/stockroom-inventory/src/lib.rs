// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stock availability for Stockroom.
//!
//! Reservation lines of open orders are normalized once
//! ([`normalize_reservations`]), aggregated into a [`StockLedger`]
//! (`available = stock_quantity - reserved`), and read by every view:
//! inventory listing, alerts, the dashboard, and per-customer catalogs.
//! The aggregation is synchronous and pure; [`repository`] does the I/O.

pub mod alerts;
pub mod catalog;
pub mod dashboard;
pub mod ledger;
pub mod lifecycle;
pub mod repository;
pub mod reservation;

pub use alerts::{
    DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_OUT_OF_STOCK_THRESHOLD, StockAlert, StockLevel,
    StockThresholds, stock_alerts,
};
pub use catalog::{CatalogEntry, CustomerProductRow, customer_catalog};
pub use dashboard::DashboardSummary;
pub use ledger::StockLedger;
pub use lifecycle::{StatusChange, check_transition, status_change_payload};
pub use repository::OrderItem;
pub use reservation::{RawReservationRow, ReservationLine, normalize_reservations};
