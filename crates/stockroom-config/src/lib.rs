// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Stockroom.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `STOCKROOM_*` environment overrides, and miette
//! diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use stockroom_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("store: {}", config.store.url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, ConfigSources, render_errors, render_errors_to_string};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::StockroomConfig;

/// Loads the merged file hierarchy plus `STOCKROOM_*` overrides and validates
/// the result. Parse failures come back as diagnostics pointing into whichever
/// file caused them.
pub fn load_and_validate() -> Result<StockroomConfig, Vec<ConfigError>> {
    finish(loader::load_config(), collect_toml_sources)
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<StockroomConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path), || {
        let mut sources = ConfigSources::new();
        if let Ok(content) = std::fs::read_to_string(path) {
            sources.add(path.display().to_string(), content);
        }
        sources
    })
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<StockroomConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content), || {
        ConfigSources::inline(toml_content)
    })
}

fn finish(
    loaded: Result<StockroomConfig, figment::Error>,
    sources: impl FnOnce() -> ConfigSources,
) -> Result<StockroomConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            tracing::debug!(store = %config.store.url, "configuration loaded");
            Ok(config)
        }
        Err(err) => Err(ConfigError::from_figment(err, &sources())),
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> ConfigSources {
    let mut sources = ConfigSources::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG_FILE) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG_FILE).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG_FILE.to_string());
        sources.add(path, content);
    }

    if let Some(path) = loader::user_config_path() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.add(path.display().to_string(), content);
        }
    }

    let system_path = Path::new(loader::SYSTEM_CONFIG_PATH);
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.add(system_path.display().to_string(), content);
    }

    sources
}
