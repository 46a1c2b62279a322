// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stock level classification and alert lists.

use serde::Serialize;
use strum::Display;

use stockroom_config::model::InventoryConfig;
use stockroom_core::{Product, ProductId};

use crate::ledger::StockLedger;

/// Available quantity below this is low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Available quantity at or below this is out of stock.
pub const DEFAULT_OUT_OF_STOCK_THRESHOLD: i64 = 0;

/// Cut-offs used to label available quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockThresholds {
    pub low: i64,
    pub out_of_stock: i64,
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_STOCK_THRESHOLD,
            out_of_stock: DEFAULT_OUT_OF_STOCK_THRESHOLD,
        }
    }
}

impl From<&InventoryConfig> for StockThresholds {
    fn from(config: &InventoryConfig) -> Self {
        Self {
            low: config.low_stock_threshold,
            out_of_stock: config.out_of_stock_threshold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    Low,
    Healthy,
}

impl StockThresholds {
    pub fn classify(&self, available: i64) -> StockLevel {
        if available <= self.out_of_stock {
            StockLevel::OutOfStock
        } else if available < self.low {
            StockLevel::Low
        } else {
            StockLevel::Healthy
        }
    }
}

/// A product that needs restocking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockAlert {
    pub product_id: ProductId,
    pub name: String,
    pub stock_quantity: i64,
    pub reserved: i64,
    pub available: i64,
    pub level: StockLevel,
}

/// Out-of-stock products first, then low-stock ones; each group ordered by
/// available quantity, then name.
pub fn stock_alerts(
    products: &[Product],
    ledger: &StockLedger,
    thresholds: &StockThresholds,
) -> Vec<StockAlert> {
    let mut alerts: Vec<StockAlert> = products
        .iter()
        .filter_map(|p| {
            let available = ledger.available(&p.id)?;
            let level = thresholds.classify(available);
            (level != StockLevel::Healthy).then(|| StockAlert {
                product_id: p.id.clone(),
                name: p.name.clone(),
                stock_quantity: p.stock_quantity,
                reserved: ledger.reserved(&p.id),
                available,
                level,
            })
        })
        .collect();
    alerts.sort_by(|a, b| {
        a.level
            .cmp_rank()
            .cmp(&b.level.cmp_rank())
            .then(a.available.cmp(&b.available))
            .then_with(|| a.name.cmp(&b.name))
    });
    alerts
}

impl StockLevel {
    fn cmp_rank(self) -> u8 {
        match self {
            StockLevel::OutOfStock => 0,
            StockLevel::Low => 1,
            StockLevel::Healthy => 2,
        }
    }
}
