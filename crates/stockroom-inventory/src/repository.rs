// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store reads and writes behind the inventory views.
//!
//! Independent reads are issued concurrently and joined before aggregation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use stockroom_core::{
    CustomerId, NewOrder, OPEN_STATES, Order, OrderId, OrderLine, OrderStatus, Product, ProductId,
    StockroomError,
};
use stockroom_postgrest::{FilterBuilder, RestClient};

use crate::alerts::StockThresholds;
use crate::catalog::{CatalogEntry, CustomerProductRow, customer_catalog, embedded_products};
use crate::dashboard::DashboardSummary;
use crate::ledger::StockLedger;
use crate::lifecycle::{check_transition, status_change_payload};
use crate::reservation::{RawReservationRow, ReservationLine, normalize_reservations};

pub const PRODUCTS: &str = "products";
pub const ORDERS: &str = "orders";
pub const ORDER_LINES: &str = "order_products";
pub const CUSTOMER_PRODUCTS: &str = "customer_products";

/// Projection for reservation reads; the inner join drops lines whose order
/// fails the status filter.
const RESERVATION_COLUMNS: &str =
    "product_id, quantity, order_id, orders!inner(id, status, created_at, customers(name))";

/// Every product, ordered by name.
pub async fn fetch_products(client: &RestClient) -> Result<Vec<Product>, StockroomError> {
    let products = client
        .table(PRODUCTS)
        .select("*")
        .order_asc("name")
        .execute_as()
        .await?;
    Ok(products)
}

/// Line items of open orders, across all products.
pub async fn fetch_open_reservations(
    client: &RestClient,
) -> Result<Vec<ReservationLine>, StockroomError> {
    let rows: Vec<RawReservationRow> = client
        .table(ORDER_LINES)
        .select(RESERVATION_COLUMNS)
        .in_list("orders.status", OPEN_STATES)
        .execute_as()
        .await?;
    Ok(normalize_reservations(rows))
}

/// Products and their ledger, fetched concurrently.
pub async fn load_ledger(
    client: &RestClient,
) -> Result<(Vec<Product>, StockLedger), StockroomError> {
    let (products, lines) =
        tokio::try_join!(fetch_products(client), fetch_open_reservations(client))?;
    let ledger = StockLedger::compute(&products, &lines);
    debug!(
        products = products.len(),
        reservations = lines.len(),
        "stock ledger computed"
    );
    Ok((products, ledger))
}

/// Open reservation lines of one product, newest order first.
pub async fn product_reservations(
    client: &RestClient,
    product_id: &ProductId,
) -> Result<Vec<ReservationLine>, StockroomError> {
    let rows: Vec<RawReservationRow> = client
        .table(ORDER_LINES)
        .select(RESERVATION_COLUMNS)
        .eq("product_id", product_id)
        .in_list("orders.status", OPEN_STATES)
        .execute_as()
        .await?;
    let mut lines = normalize_reservations(rows);
    lines.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(lines)
}

/// Every order, newest first.
pub async fn fetch_orders(client: &RestClient) -> Result<Vec<Order>, StockroomError> {
    let orders = client
        .table(ORDERS)
        .select("*")
        .order_desc("created_at")
        .execute_as()
        .await?;
    Ok(orders)
}

/// The `limit` most recent orders.
pub async fn fetch_recent_orders(
    client: &RestClient,
    limit: usize,
) -> Result<Vec<Order>, StockroomError> {
    let orders = client
        .table(ORDERS)
        .select("*")
        .order_desc("created_at")
        .limit(limit)
        .execute_as()
        .await?;
    Ok(orders)
}

/// Dashboard figures from products, open reservations and orders.
pub async fn load_dashboard(
    client: &RestClient,
    thresholds: &StockThresholds,
) -> Result<DashboardSummary, StockroomError> {
    let (products, lines, orders) = tokio::try_join!(
        fetch_products(client),
        fetch_open_reservations(client),
        fetch_orders(client)
    )?;
    let ledger = StockLedger::compute(&products, &lines);
    Ok(DashboardSummary::build(
        &products, &ledger, &orders, thresholds,
    ))
}

/// Catalog of one customer with availability of each listed product.
pub async fn load_customer_catalog(
    client: &RestClient,
    customer_id: &CustomerId,
    thresholds: &StockThresholds,
) -> Result<Vec<CatalogEntry>, StockroomError> {
    let rows: Vec<CustomerProductRow> = client
        .table(CUSTOMER_PRODUCTS)
        .select("*, products(*)")
        .eq("customer_id", customer_id)
        .execute_as()
        .await?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let product_ids: Vec<&ProductId> = rows.iter().map(|r| &r.link.product_id).collect();
    let reservations: Vec<RawReservationRow> = client
        .table(ORDER_LINES)
        .select(RESERVATION_COLUMNS)
        .in_list("product_id", product_ids)
        .in_list("orders.status", OPEN_STATES)
        .execute_as()
        .await?;

    let products = embedded_products(&rows);
    let ledger = StockLedger::compute(&products, &normalize_reservations(reservations));
    Ok(customer_catalog(&rows, &ledger, thresholds))
}

/// One line of a new order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: f64,
    pub brand: Option<String>,
}

/// Creates an order in `Reservado` and its lines.
///
/// The header and the lines are two separate requests. If the lines fail the
/// header already exists; the error is [`StockroomError::PartialWrite`] and
/// names the order so the caller can repair or delete it.
pub async fn place_order(
    client: &RestClient,
    customer_id: &CustomerId,
    items: &[OrderItem],
) -> Result<Order, StockroomError> {
    let header = NewOrder {
        customer_id: customer_id.clone(),
        status: OrderStatus::Reservado,
        total_amount: items
            .iter()
            .map(|i| i.unit_price * i.quantity as f64)
            .sum(),
    };
    let created: Vec<Order> = client
        .table(ORDERS)
        .insert(&header)
        .returning()
        .execute_as()
        .await?;
    let order = created
        .into_iter()
        .next()
        .ok_or_else(|| StockroomError::Internal("order insert returned no row".into()))?;

    if items.is_empty() {
        return Ok(order);
    }

    let lines: Vec<OrderLine> = items
        .iter()
        .map(|item| OrderLine {
            id: None,
            order_id: order.id.clone(),
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            unit_price: Some(item.unit_price),
            custom_brand: item.brand.clone(),
        })
        .collect();
    if let Err(e) = client.table(ORDER_LINES).insert(&lines).execute().await {
        warn!(order_id = %order.id, error = %e, "order created without its lines");
        return Err(StockroomError::PartialWrite {
            order_id: order.id.to_string(),
            step: "order lines insert".into(),
            source: Box::new(e),
        });
    }

    info!(order_id = %order.id, lines = lines.len(), "order placed");
    Ok(order)
}

/// Moves an order forward in its lifecycle and stamps the matching timestamp.
pub async fn update_order_status(
    client: &RestClient,
    order_id: &OrderId,
    status: OrderStatus,
    now: DateTime<Utc>,
) -> Result<Order, StockroomError> {
    let current: Vec<Order> = client
        .table(ORDERS)
        .select("*")
        .eq("id", order_id)
        .execute_as()
        .await?;
    let current = current.into_iter().next().ok_or_else(|| StockroomError::NotFound {
        entity: "order".into(),
        id: order_id.to_string(),
    })?;
    let from = current
        .status
        .ok_or_else(|| StockroomError::InvalidTransition {
            from: "untracked status".into(),
            to: status.to_string(),
        })?;
    check_transition(from, status)?;

    let updated: Vec<Order> = client
        .table(ORDERS)
        .update(&status_change_payload(status, now))
        .eq("id", order_id)
        .execute_as()
        .await?;
    let updated = updated.into_iter().next().ok_or_else(|| StockroomError::NotFound {
        entity: "order".into(),
        id: order_id.to_string(),
    })?;
    info!(order_id = %order_id, from = %from, to = %status, "order status changed");
    Ok(updated)
}
