// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockroom catalog` command implementation.

use std::fmt::Write as _;

use stockroom_core::{CustomerId, StockroomError};
use stockroom_inventory::{CatalogEntry, StockThresholds, repository};
use stockroom_postgrest::RestClient;

use crate::inventory::truncate;
use crate::output::{Output, header, level_label, quantity};

pub async fn run_catalog(
    client: &RestClient,
    customer_id: &CustomerId,
    thresholds: &StockThresholds,
    out: &Output,
) -> Result<(), StockroomError> {
    let entries = repository::load_customer_catalog(client, customer_id, thresholds).await?;
    out.emit(&entries, |color| render_catalog(customer_id, &entries, color))
}

pub fn render_catalog(customer_id: &CustomerId, entries: &[CatalogEntry], color: bool) -> String {
    let mut text = header(&format!("catalog of {customer_id}"), 78);
    if entries.is_empty() {
        text.push_str("    No products linked to this customer.\n\n");
        return text;
    }
    let _ = writeln!(
        text,
        "    {:<30} {:<14} {:>10} {:>10}  Status",
        "Product", "Brand", "Price", "Available"
    );
    for entry in entries {
        let (available, status) = match (entry.available, entry.level) {
            (Some(a), Some(level)) => (quantity(a, color), level_label(level, color)),
            _ => ("-".to_string(), "[MISSING]".to_string()),
        };
        let _ = writeln!(
            text,
            "    {:<30} {:<14} {:>10.2} {:>10}  {}",
            truncate(&entry.name, 30),
            truncate(&entry.brand, 14),
            entry.price,
            available,
            status
        );
    }
    text.push('\n');
    text
}
