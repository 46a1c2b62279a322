// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./stockroom.toml` > `~/.config/stockroom/stockroom.toml`
//! > `/etc/stockroom/stockroom.toml` with environment variable overrides via
//! the `STOCKROOM_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::StockroomConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/stockroom/stockroom.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "stockroom.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("stockroom").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/stockroom/stockroom.toml` (system-wide)
/// 3. `~/.config/stockroom/stockroom.toml` (user XDG config)
/// 4. `./stockroom.toml` (local directory)
/// 5. `STOCKROOM_*` environment variables
pub fn load_config() -> Result<StockroomConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<StockroomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StockroomConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StockroomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StockroomConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(StockroomConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// `Env::split("_")` would turn `STOCKROOM_STORE_API_KEY` into
/// `store.api.key`; only the first segment names the section.
fn env_provider() -> Env {
    Env::prefixed("STOCKROOM_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a prefix-stripped env var name to its dotted config key.
pub(crate) fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in ["store", "inventory", "logging"] {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}
