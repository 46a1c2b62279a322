// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `stockroom reservations` and `stockroom set-status`.

use std::fmt::Write as _;

use chrono::Utc;
use colored::Colorize;
use serde::Serialize;

use stockroom_core::{Order, OrderId, OrderStatus, ProductId, StockroomError};
use stockroom_inventory::{ReservationLine, repository};
use stockroom_postgrest::RestClient;

use crate::output::{Output, header};

#[derive(Debug, Serialize)]
pub struct ProductReservations {
    pub product_id: ProductId,
    pub total_reserved: i64,
    pub lines: Vec<ReservationLine>,
}

pub async fn run_reservations(
    client: &RestClient,
    product_id: &ProductId,
    out: &Output,
) -> Result<(), StockroomError> {
    let lines = repository::product_reservations(client, product_id).await?;
    let report = ProductReservations {
        product_id: product_id.clone(),
        total_reserved: lines.iter().map(|l| l.quantity).sum(),
        lines,
    };
    out.emit(&report, |_| render_reservations(&report))
}

pub fn render_reservations(report: &ProductReservations) -> String {
    let mut text = header(&format!("reservations of {}", report.product_id), 60);
    if report.lines.is_empty() {
        text.push_str("    No open reservations for this product.\n\n");
        return text;
    }
    for line in &report.lines {
        let _ = writeln!(
            text,
            "    {:<12} {:<28} {:>6}  {}",
            line.order_id.as_ref().map(|o| o.to_string()).unwrap_or_default(),
            line.customer_name.as_deref().unwrap_or("-"),
            line.quantity,
            line.created_at.as_deref().unwrap_or("-")
        );
    }
    let _ = writeln!(text, "\n  {} reserved in total.\n", report.total_reserved);
    text
}

pub async fn run_set_status(
    client: &RestClient,
    order_id: &OrderId,
    status: OrderStatus,
    out: &Output,
) -> Result<(), StockroomError> {
    let order = repository::update_order_status(client, order_id, status, Utc::now()).await?;
    out.emit(&order, |color| render_status_change(&order, color))
}

pub fn render_status_change(order: &Order, color: bool) -> String {
    let status = order
        .status
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    let status = if color {
        status.green().to_string()
    } else {
        status
    };
    let stamp = order
        .faturado_at
        .as_deref()
        .or(order.delivered_at.as_deref())
        .map(|t| format!(" at {t}"))
        .unwrap_or_default();
    format!("  order {} is now {status}{stamp}\n", order.id)
}
