// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait for remote store backends.

use async_trait::async_trait;

use crate::error::StockroomError;
use crate::types::HealthStatus;

/// A remote backend the dashboard talks to (the tabular store, object storage).
///
/// Provides identity and a connectivity probe so `stockroom doctor` can
/// report on every backend the same way.
#[async_trait]
pub trait StoreAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this backend.
    fn name(&self) -> &str;

    /// Returns the semantic version of the adapter implementation.
    fn version(&self) -> semver::Version;

    /// Probes the backend and reports its current status.
    async fn health_check(&self) -> Result<HealthStatus, StockroomError>;
}
