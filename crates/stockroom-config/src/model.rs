// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model: `[store]`, `[inventory]`, `[logging]`.
//!
//! Every section denies unknown fields so a misspelled key fails the load
//! instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level Stockroom configuration.
///
/// Every section may be omitted; an empty file yields a client for a local
/// store with the default stock thresholds.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StockroomConfig {
    /// Tabular store connection settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Inventory presentation thresholds.
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the REST tabular store and its object storage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Base URL of the store, without a trailing path (e.g. `https://abc.supabase.co`).
    #[serde(default = "default_store_url")]
    pub url: String,

    /// Path prefix of the table endpoints.
    #[serde(default = "default_rest_path")]
    pub rest_path: String,

    /// Path prefix of the object storage endpoints.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,

    /// Static API key sent as the `apikey` header. `None` sends no key.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Bearer token for the `Authorization` header. Falls back to `api_key`.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            rest_path: default_rest_path(),
            storage_path: default_storage_path(),
            api_key: None,
            bearer_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// The token sent after `Bearer`, if any.
    pub fn effective_bearer(&self) -> Option<&str> {
        self.bearer_token
            .as_deref()
            .or(self.api_key.as_deref())
    }
}

fn default_store_url() -> String {
    "http://127.0.0.1:54321".to_string()
}

fn default_rest_path() -> String {
    "/rest/v1".to_string()
}

fn default_storage_path() -> String {
    "/storage/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Thresholds used to label available stock.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryConfig {
    /// Available quantity strictly below this is "low stock".
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,

    /// Available quantity at or below this is "out of stock".
    #[serde(default = "default_out_of_stock_threshold")]
    pub out_of_stock_threshold: i64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: default_low_stock_threshold(),
            out_of_stock_threshold: default_out_of_stock_threshold(),
        }
    }
}

fn default_low_stock_threshold() -> i64 {
    10
}

fn default_out_of_stock_threshold() -> i64 {
    0
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_falls_back_to_api_key() {
        let mut store = StoreConfig {
            api_key: Some("anon-key".into()),
            ..StoreConfig::default()
        };
        assert_eq!(store.effective_bearer(), Some("anon-key"));

        store.bearer_token = Some("user-jwt".into());
        assert_eq!(store.effective_bearer(), Some("user-jwt"));
    }

    #[test]
    fn no_credentials_means_no_bearer() {
        assert_eq!(StoreConfig::default().effective_bearer(), None);
    }

    #[test]
    fn inventory_defaults_match_dashboard_labels() {
        let inventory = InventoryConfig::default();
        assert_eq!(inventory.low_stock_threshold, 10);
        assert_eq!(inventory.out_of_stock_threshold, 0);
    }
}
