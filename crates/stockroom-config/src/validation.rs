// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rules serde cannot express: URL schemes, path prefixes, a positive timeout,
//! and threshold ordering.

use crate::diagnostic::ConfigError;
use crate::model::StockroomConfig;

/// Log levels accepted by `logging.level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Checks every rule and reports all violations together.
pub fn validate_config(config: &StockroomConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let url = config.store.url.trim();
    if url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "store.url must not be empty".to_string(),
        });
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("store.url `{url}` must start with http:// or https://"),
        });
    }

    for (key, value) in [
        ("store.rest_path", &config.store.rest_path),
        ("store.storage_path", &config.store.storage_path),
    ] {
        if !value.starts_with('/') {
            errors.push(ConfigError::Validation {
                message: format!("{key} `{value}` must start with `/`"),
            });
        }
    }

    if config.store.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "store.timeout_secs must be greater than 0".to_string(),
        });
    }

    if let Some(key) = &config.store.api_key {
        if key.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "store.api_key must not be blank when set".to_string(),
            });
        }
    }

    let inventory = &config.inventory;
    if inventory.low_stock_threshold <= inventory.out_of_stock_threshold {
        errors.push(ConfigError::Validation {
            message: format!(
                "inventory.low_stock_threshold ({}) must be greater than inventory.out_of_stock_threshold ({})",
                inventory.low_stock_threshold, inventory.out_of_stock_threshold
            ),
        });
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
