// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! StoreAdapter implementation for the REST client.

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use stockroom_core::{HealthStatus, StockroomError, StoreAdapter};

use crate::client::RestClient;
use crate::error::StoreError;

#[async_trait]
impl StoreAdapter for RestClient {
    fn name(&self) -> &str {
        "postgrest"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    /// GETs the table endpoint root.
    ///
    /// Unreachable store or rejected credentials (401/403) are unhealthy; any
    /// other rejection means the store is up but misbehaving.
    async fn health_check(&self) -> Result<HealthStatus, StockroomError> {
        let url = RestClient::parse_url(&format!("{}/", self.rest_base()))?;
        let request = self.request(Method::GET, url);
        let status = match self.dispatch(request, "health").await {
            Ok(_) => HealthStatus::Healthy,
            Err(StoreError::Store { status, body }) if status == 401 || status == 403 => {
                HealthStatus::Unhealthy(format!("credentials rejected ({status}): {body}"))
            }
            Err(StoreError::Store { status, body }) => {
                HealthStatus::Degraded(format!("store returned {status}: {body}"))
            }
            Err(other) => HealthStatus::Unhealthy(other.to_string()),
        };
        debug!(?status, "store health probed");
        Ok(status)
    }
}
