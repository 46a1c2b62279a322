// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Headline figures for the dashboard.

use std::collections::BTreeMap;

use serde::Serialize;

use stockroom_core::{Order, OrderStatus, Product};

use crate::alerts::{StockLevel, StockThresholds};
use crate::ledger::StockLedger;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub product_count: usize,
    /// Physical units on the shelf.
    pub total_stock: i64,
    /// Units held by open orders, including lines for products not loaded.
    pub total_reserved: i64,
    /// Sum of per-product availability. Reservations on products outside the
    /// loaded set count in `total_reserved` but not here, so this can differ
    /// from `total_stock - total_reserved`.
    pub total_available: i64,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    /// `Σ base_price × stock_quantity`.
    pub stock_value: f64,
    /// Every lifecycle state is present, zero when no order is in it.
    pub orders_by_status: BTreeMap<OrderStatus, usize>,
    /// Orders whose status is null or outside the lifecycle (e.g. cancelled).
    pub orders_untracked: usize,
}

impl DashboardSummary {
    pub fn build(
        products: &[Product],
        ledger: &StockLedger,
        orders: &[Order],
        thresholds: &StockThresholds,
    ) -> Self {
        let mut low_stock_count = 0;
        let mut out_of_stock_count = 0;
        for product in products {
            let Some(available) = ledger.available(&product.id) else {
                continue;
            };
            match thresholds.classify(available) {
                StockLevel::OutOfStock => out_of_stock_count += 1,
                StockLevel::Low => low_stock_count += 1,
                StockLevel::Healthy => {}
            }
        }

        let mut orders_by_status: BTreeMap<OrderStatus, usize> =
            OrderStatus::ALL.iter().map(|s| (*s, 0)).collect();
        let mut orders_untracked = 0;
        for order in orders {
            match order.status {
                Some(status) => *orders_by_status.entry(status).or_default() += 1,
                None => orders_untracked += 1,
            }
        }

        Self {
            product_count: products.len(),
            total_stock: products.iter().map(|p| p.stock_quantity).sum(),
            total_reserved: ledger.total_reserved(),
            total_available: ledger.total_available(),
            low_stock_count,
            out_of_stock_count,
            stock_value: products
                .iter()
                .map(|p| p.base_price * p.stock_quantity as f64)
                .sum(),
            orders_by_status,
            orders_untracked,
        }
    }

    pub fn open_orders(&self) -> usize {
        self.orders_by_status
            .iter()
            .filter(|(status, _)| status.is_open())
            .map(|(_, count)| count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::ReservationLine;
    use stockroom_core::OrderId;

    fn order(id: &str, status: Option<OrderStatus>) -> Order {
        Order {
            id: OrderId::from(id),
            customer_id: None,
            status,
            total_amount: 0.0,
            created_at: None,
            delivered_at: None,
            faturado_at: None,
        }
    }

    #[test]
    fn summary_counts_stock_orders_and_alerts() {
        let mut rice = Product::new("A", "Arroz", 100);
        rice.base_price = 5.5;
        let mut beans = Product::new("B", "Feijao", 5);
        beans.base_price = 8.0;
        let products = vec![rice, beans, Product::new("C", "Cafe", 12)];
        let lines = vec![
            ReservationLine::new("A", 95),
            ReservationLine::new("B", 10),
            ReservationLine::new("X", 4),
        ];
        let ledger = StockLedger::compute(&products, &lines);
        let orders = vec![
            order("o1", Some(OrderStatus::Reservado)),
            order("o2", Some(OrderStatus::Reservado)),
            order("o3", Some(OrderStatus::Faturado)),
            order("o4", None),
        ];

        let summary = DashboardSummary::build(&products, &ledger, &orders, &StockThresholds::default());
        assert_eq!(summary.product_count, 3);
        assert_eq!(summary.total_stock, 117);
        assert_eq!(summary.total_reserved, 109);
        assert_eq!(summary.total_available, 5 + -5 + 12);
        // The 4 units on unknown product X are reserved but never available.
        assert_eq!(summary.total_stock - summary.total_reserved, summary.total_available - 4);
        assert_eq!(summary.low_stock_count, 1);
        assert_eq!(summary.out_of_stock_count, 1);
        assert!((summary.stock_value - 590.0).abs() < f64::EPSILON);
        assert_eq!(summary.orders_by_status[&OrderStatus::Reservado], 2);
        assert_eq!(summary.orders_by_status[&OrderStatus::Entregue], 0);
        assert_eq!(summary.orders_by_status[&OrderStatus::Faturado], 1);
        assert_eq!(summary.orders_untracked, 1);
        assert_eq!(summary.open_orders(), 2);
    }

    #[test]
    fn empty_inputs_give_zeroes() {
        let summary = DashboardSummary::build(
            &[],
            &StockLedger::default(),
            &[],
            &StockThresholds::default(),
        );
        assert_eq!(summary.product_count, 0);
        assert_eq!(summary.total_reserved, 0);
        assert_eq!(summary.orders_by_status.len(), 3);
        assert_eq!(summary.orders_untracked, 0);
    }
}
