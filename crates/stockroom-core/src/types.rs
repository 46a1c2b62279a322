// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain rows and identifiers shared across the workspace.
//!
//! Rows mirror the store's tables (`products`, `orders`, `order_products`).
//! Numeric columns that the store may return as `null` decode to zero, the
//! same reading every dashboard view applies.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Opaque product identifier (UUID string in the store).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

/// Opaque order identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

/// Opaque customer identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub String);

macro_rules! id_conversions {
    ($($ty:ident),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $ty {
                fn from(s: &str) -> Self {
                    Self(s.to_string())
                }
            }

            impl From<String> for $ty {
                fn from(s: String) -> Self {
                    Self(s)
                }
            }
        )*
    };
}

id_conversions!(ProductId, OrderId, CustomerId);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend is fully operational.
    Healthy,
    /// Backend answered but something is off.
    Degraded(String),
    /// Backend is not reachable or refused the credentials.
    Unhealthy(String),
}

/// Lifecycle state of an order.
///
/// The wire strings are the ones stored in the `orders.status` column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
    Deserialize,
)]
pub enum OrderStatus {
    /// Open order; its lines hold stock.
    Reservado,
    /// Goods left the warehouse; stock is consumed, not reserved.
    Entregue,
    /// Invoiced. Terminal.
    Faturado,
}

/// Order states whose lines count against available stock.
pub const OPEN_STATES: &[OrderStatus] = &[OrderStatus::Reservado];

impl OrderStatus {
    /// All states in lifecycle order.
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Reservado,
        OrderStatus::Entregue,
        OrderStatus::Faturado,
    ];

    /// Whether lines of an order in this state reserve stock.
    pub fn is_open(self) -> bool {
        OPEN_STATES.contains(&self)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Transitions only move forward; skipping delivery straight to
    /// invoicing is allowed.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        next > self
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Faturado
    }
}

/// Decode `null` as the type's default.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode an order status, reading `null` and states outside the lifecycle
/// (a cancelled order, say) as `None` instead of failing the whole row set.
pub fn lenient_status<'de, D>(deserializer: D) -> Result<Option<OrderStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// A row of the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Physical count on the shelf.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock_quantity: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub base_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Creates a product with only the fields the aggregator reads.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, stock_quantity: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stock_quantity,
            base_price: 0.0,
            sku: None,
            unit: None,
            brand: None,
            description: None,
        }
    }
}

/// A row of the `orders` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    /// `None` when the stored status is null or not one this crate tracks.
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<OrderStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_amount: f64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub delivered_at: Option<String>,
    #[serde(default)]
    pub faturado_at: Option<String>,
}

/// Body for creating a new order header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub status: OrderStatus,
    pub total_amount: f64,
}

/// A row of the `order_products` table (one line item of an order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub order_id: OrderId,
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_brand: Option<String>,
}

/// A row of the `customer_products` table: a product offered to one customer
/// with optional overrides of name, price and brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_brand: Option<String>,
}
