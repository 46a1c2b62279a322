// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reservation lines as read from `order_products`, and their normalization.
//!
//! The store hands back line items in two shapes:
//!
//! - flat: `{product_id, quantity, order_status}`
//! - joined: `{product_id, quantity, orders: {status, ...}}`, where the
//!   embedded order may also arrive as a one-element array
//!
//! [`normalize_reservations`] is the single place the open-order predicate is
//! applied. Everything downstream trusts its output.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use stockroom_core::types::null_as_default;
use stockroom_core::{OrderId, OrderStatus, ProductId};

/// One `order_products` row in either shape.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawReservationRow {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    /// Flat shape.
    #[serde(default)]
    pub order_status: Option<String>,
    /// Joined shape.
    #[serde(default)]
    pub orders: Option<JoinedOrders>,
}

/// Embedded parent order; PostgREST returns an object for a many-to-one
/// embed, some views return an array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum JoinedOrders {
    One(JoinedOrder),
    Many(Vec<JoinedOrder>),
}

impl JoinedOrders {
    fn first(&self) -> Option<&JoinedOrder> {
        match self {
            JoinedOrders::One(order) => Some(order),
            JoinedOrders::Many(orders) => orders.first(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct JoinedOrder {
    #[serde(default)]
    pub id: Option<OrderId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub customers: Option<JoinedCustomer>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct JoinedCustomer {
    #[serde(default)]
    pub name: Option<String>,
}

impl RawReservationRow {
    /// Builds a flat row.
    pub fn flat(product_id: &str, quantity: i64, status: OrderStatus) -> Self {
        Self {
            product_id: Some(ProductId::from(product_id)),
            quantity,
            order_status: Some(status.to_string()),
            ..Self::default()
        }
    }

    fn order(&self) -> Option<&JoinedOrder> {
        self.orders.as_ref().and_then(JoinedOrders::first)
    }

    /// Parent order status. The flat column wins over the embed; states this
    /// crate does not know (e.g. a cancelled order) read as `None`.
    pub fn status(&self) -> Option<OrderStatus> {
        let raw = self
            .order_status
            .as_deref()
            .or_else(|| self.order().and_then(|o| o.status.as_deref()))?;
        OrderStatus::from_str(raw).ok()
    }
}

/// A line item of an open order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationLine {
    pub product_id: ProductId,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ReservationLine {
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            order_id: None,
            customer_name: None,
            created_at: None,
        }
    }
}

/// Keeps the rows whose parent order is open and flattens them.
///
/// Rows without a product reference cannot be attributed and are dropped.
pub fn normalize_reservations<I>(rows: I) -> Vec<ReservationLine>
where
    I: IntoIterator<Item = RawReservationRow>,
{
    let mut lines = Vec::new();
    let mut closed = 0usize;
    for row in rows {
        if !row.status().is_some_and(OrderStatus::is_open) {
            closed += 1;
            continue;
        }
        let order = row.order().cloned().unwrap_or_default();
        let Some(product_id) = row.product_id else {
            debug!("skipping reservation row without product_id");
            continue;
        };
        lines.push(ReservationLine {
            product_id,
            quantity: row.quantity,
            order_id: row.order_id.or(order.id),
            customer_name: order.customers.and_then(|c| c.name),
            created_at: order.created_at,
        });
    }
    debug!(open = lines.len(), closed, "reservation rows normalized");
    lines
}
