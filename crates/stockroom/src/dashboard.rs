// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockroom dashboard` command implementation.

use std::fmt::Write as _;

use colored::Colorize;
use serde::Serialize;

use stockroom_core::{Order, StockroomError};
use stockroom_inventory::{DashboardSummary, StockThresholds, repository};
use stockroom_postgrest::RestClient;

use crate::output::{Output, header, quantity};

/// Orders shown under the headline figures.
const RECENT_ORDERS: usize = 5;

#[derive(Debug, Serialize)]
pub struct DashboardReport {
    #[serde(flatten)]
    pub summary: DashboardSummary,
    pub recent_orders: Vec<Order>,
}

pub async fn run_dashboard(
    client: &RestClient,
    thresholds: &StockThresholds,
    out: &Output,
) -> Result<(), StockroomError> {
    let (summary, recent_orders) = tokio::try_join!(
        repository::load_dashboard(client, thresholds),
        repository::fetch_recent_orders(client, RECENT_ORDERS)
    )?;
    let report = DashboardReport {
        summary,
        recent_orders,
    };
    out.emit(&report, |color| render_dashboard(&report, color))
}

pub fn render_dashboard(report: &DashboardReport, color: bool) -> String {
    let s = &report.summary;
    let mut text = header("stockroom dashboard", 50);

    let _ = writeln!(text, "    Products:      {}", s.product_count);
    let _ = writeln!(text, "    Stock:         {}", s.total_stock);
    let _ = writeln!(text, "    Reserved:      {}", s.total_reserved);
    let _ = writeln!(
        text,
        "    Available:     {}",
        quantity(s.total_available, color)
    );
    let _ = writeln!(text, "    Stock value:   {:.2}", s.stock_value);

    let alerts = format!(
        "{} out of stock, {} low",
        s.out_of_stock_count, s.low_stock_count
    );
    let alerts = if color && s.out_of_stock_count + s.low_stock_count > 0 {
        alerts.yellow().to_string()
    } else {
        alerts
    };
    let _ = writeln!(text, "    Alerts:        {alerts}");

    text.push_str("\n    Orders\n");
    for (status, count) in &s.orders_by_status {
        let _ = writeln!(text, "      {:<12} {count}", status.to_string());
    }
    if s.orders_untracked > 0 {
        let _ = writeln!(text, "      {:<12} {}", "other", s.orders_untracked);
    }

    if !report.recent_orders.is_empty() {
        text.push_str("\n    Recent\n");
        for order in &report.recent_orders {
            let _ = writeln!(
                text,
                "      {:<12} {:<10} {:>10.2}  {}",
                order.id.to_string(),
                order.status.map_or_else(|| "-".to_string(), |s| s.to_string()),
                order.total_amount,
                order.created_at.as_deref().unwrap_or("-")
            );
        }
    }
    text.push('\n');
    text
}
