// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockroom doctor`: is the config sane and does the store answer?

use std::time::{Duration, Instant};

use colored::Colorize;
use serde::Serialize;

use stockroom_config::model::StockroomConfig;
use stockroom_core::{HealthStatus, StockroomError, StoreAdapter};
use stockroom_postgrest::RestClient;

use crate::output::{Output, header};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    fn label(self, color: bool) -> String {
        match (self, color) {
            (CheckStatus::Pass, false) => "[OK]  ".to_string(),
            (CheckStatus::Warn, false) => "[WARN]".to_string(),
            (CheckStatus::Fail, false) => "[FAIL]".to_string(),
            (CheckStatus::Pass, true) => "✓".green().to_string(),
            (CheckStatus::Warn, true) => "!".yellow().to_string(),
            (CheckStatus::Fail, true) => "✗".red().to_string(),
        }
    }
}

/// One line of the doctor report.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(d.as_millis())
}

/// Checks configuration, credentials, and store reachability, in that order.
pub async fn run_doctor(
    config: &StockroomConfig,
    client: &RestClient,
    out: &Output,
) -> Result<(), StockroomError> {
    let results = vec![
        check_config(config),
        check_credentials(config),
        check_store(client).await,
    ];
    out.emit(&results, |color| render_doctor(&results, color))
}

pub fn render_doctor(results: &[CheckResult], color: bool) -> String {
    let mut text = header("stockroom doctor", 50);
    for result in results {
        let message = match (result.status, color) {
            (CheckStatus::Warn, true) => result.message.yellow().to_string(),
            (CheckStatus::Fail, true) => result.message.red().to_string(),
            _ => result.message.clone(),
        };
        text.push_str(&format!(
            "    {} {:<20} {message} ({}ms)\n",
            result.status.label(color),
            result.name,
            result.duration.as_millis()
        ));
    }

    let issues = results
        .iter()
        .filter(|r| r.status != CheckStatus::Pass)
        .count();
    match issues {
        0 => text.push_str("\n  All checks passed.\n\n"),
        1 => text.push_str("\n  1 issue found.\n\n"),
        n => text.push_str(&format!("\n  {n} issues found.\n\n")),
    }
    text
}

/// The configuration already loaded and validated; report what it points at.
fn check_config(config: &StockroomConfig) -> CheckResult {
    let start = Instant::now();
    CheckResult {
        name: "Configuration".to_string(),
        status: CheckStatus::Pass,
        message: format!(
            "valid (store {}, low stock < {})",
            config.store.url, config.inventory.low_stock_threshold
        ),
        duration: start.elapsed(),
    }
}

fn check_credentials(config: &StockroomConfig) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match (&config.store.api_key, &config.store.bearer_token) {
        (Some(_), Some(_)) => (CheckStatus::Pass, "api key and bearer token set"),
        (Some(_), None) => (CheckStatus::Pass, "api key set (also used as bearer)"),
        (None, Some(_)) => (CheckStatus::Warn, "bearer token set without api key"),
        (None, None) => (
            CheckStatus::Warn,
            "no api key; requests are sent anonymously",
        ),
    };
    CheckResult {
        name: "Credentials".to_string(),
        status,
        message: message.to_string(),
        duration: start.elapsed(),
    }
}

async fn check_store(client: &RestClient) -> CheckResult {
    let start = Instant::now();
    let (status, message) = match client.health_check().await {
        Ok(HealthStatus::Healthy) => (
            CheckStatus::Pass,
            format!("reachable at {}", client.rest_base()),
        ),
        Ok(HealthStatus::Degraded(reason)) => (CheckStatus::Warn, reason),
        Ok(HealthStatus::Unhealthy(reason)) => (CheckStatus::Fail, reason),
        Err(e) => (CheckStatus::Fail, e.to_string()),
    };
    CheckResult {
        name: "Store".to_string(),
        status,
        message,
        duration: start.elapsed(),
    }
}
