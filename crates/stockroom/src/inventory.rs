// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockroom inventory` and `stockroom alerts`.

use std::fmt::Write as _;

use serde::Serialize;

use stockroom_core::{Product, ProductId, StockroomError};
use stockroom_inventory::{
    StockAlert, StockLedger, StockLevel, StockThresholds, repository, stock_alerts,
};
use stockroom_postgrest::RestClient;

use crate::output::{Output, header, level_label, quantity};

/// One line of the inventory listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow {
    pub product_id: ProductId,
    pub name: String,
    pub stock_quantity: i64,
    pub reserved: i64,
    pub available: i64,
    pub level: StockLevel,
}

pub fn inventory_rows(
    products: &[Product],
    ledger: &StockLedger,
    thresholds: &StockThresholds,
) -> Vec<InventoryRow> {
    products
        .iter()
        .filter_map(|p| {
            let available = ledger.available(&p.id)?;
            Some(InventoryRow {
                product_id: p.id.clone(),
                name: p.name.clone(),
                stock_quantity: p.stock_quantity,
                reserved: ledger.reserved(&p.id),
                available,
                level: thresholds.classify(available),
            })
        })
        .collect()
}

pub async fn run_inventory(
    client: &RestClient,
    thresholds: &StockThresholds,
    out: &Output,
) -> Result<(), StockroomError> {
    let (products, ledger) = repository::load_ledger(client).await?;
    let rows = inventory_rows(&products, &ledger, thresholds);
    out.emit(&rows, |color| render_inventory(&rows, color))
}

pub fn render_inventory(rows: &[InventoryRow], color: bool) -> String {
    let mut text = header("stockroom inventory", 72);
    if rows.is_empty() {
        text.push_str("    No products.\n\n");
        return text;
    }
    let _ = writeln!(
        text,
        "    {:<30} {:>8} {:>9} {:>10}  Status",
        "Product", "Stock", "Reserved", "Available"
    );
    for row in rows {
        let _ = writeln!(
            text,
            "    {:<30} {:>8} {:>9} {:>10}  {}",
            truncate(&row.name, 30),
            row.stock_quantity,
            row.reserved,
            quantity(row.available, color),
            level_label(row.level, color)
        );
    }
    text.push('\n');
    text
}

pub async fn run_alerts(
    client: &RestClient,
    thresholds: &StockThresholds,
    out: &Output,
) -> Result<(), StockroomError> {
    let (products, ledger) = repository::load_ledger(client).await?;
    let alerts = stock_alerts(&products, &ledger, thresholds);
    out.emit(&alerts, |color| render_alerts(&alerts, thresholds, color))
}

pub fn render_alerts(alerts: &[StockAlert], thresholds: &StockThresholds, color: bool) -> String {
    let mut text = header("stockroom alerts", 60);
    if alerts.is_empty() {
        let _ = writeln!(
            text,
            "    All products have at least {} available.\n",
            thresholds.low
        );
        return text;
    }
    for alert in alerts {
        let _ = writeln!(
            text,
            "    {} {:<30} available {} (stock {}, reserved {})",
            level_label(alert.level, color),
            truncate(&alert.name, 30),
            quantity(alert.available, color),
            alert.stock_quantity,
            alert.reserved
        );
    }
    let out = alerts
        .iter()
        .filter(|a| a.level == StockLevel::OutOfStock)
        .count();
    let _ = writeln!(
        text,
        "\n  {out} out of stock, {} low.\n",
        alerts.len() - out
    );
    text
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
