// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared across the Stockroom workspace.

use thiserror::Error;

/// The primary error type for operations that span crates
/// (repository calls, CLI commands, adapter health checks).
#[derive(Debug, Error)]
pub enum StockroomError {
    /// Configuration errors (invalid TOML, missing credentials, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The tabular store rejected or failed a request.
    #[error("store error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A row expected to exist was not returned by the store.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A multi-request write stopped half-way. The first request committed,
    /// a later one failed, and nothing was rolled back.
    #[error("partial write: order {order_id} was created but {step} failed: {source}")]
    PartialWrite {
        order_id: String,
        step: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An order status change that the lifecycle does not allow.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
