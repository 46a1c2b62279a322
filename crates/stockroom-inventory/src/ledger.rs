// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reserved totals and available stock.
//!
//! `available = stock_quantity - reserved`, per product, with no clamping.
//! A negative figure means the product is over-reserved and is reported as is.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use stockroom_core::{Product, ProductId};

use crate::reservation::ReservationLine;

/// Per-product reservation and availability figures.
///
/// Lines naming a product absent from the product set are counted in
/// `reserved_totals` and left out of `availability`, since there is no stock
/// figure to subtract from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StockLedger {
    pub reserved_totals: BTreeMap<ProductId, i64>,
    pub availability: BTreeMap<ProductId, i64>,
}

impl StockLedger {
    /// Aggregates `lines` (already restricted to open orders) against `products`.
    ///
    /// Arithmetic saturates at the `i64` bounds instead of overflowing.
    pub fn compute(products: &[Product], lines: &[ReservationLine]) -> Self {
        let mut reserved_totals: BTreeMap<ProductId, i64> = BTreeMap::new();
        for line in lines {
            let total = reserved_totals.entry(line.product_id.clone()).or_default();
            *total = total.saturating_add(line.quantity);
        }

        let availability: BTreeMap<ProductId, i64> = products
            .iter()
            .map(|p| {
                let reserved = reserved_totals.get(&p.id).copied().unwrap_or(0);
                (p.id.clone(), p.stock_quantity.saturating_sub(reserved))
            })
            .collect();

        let ledger = Self {
            reserved_totals,
            availability,
        };
        let unknown = ledger.unknown_products();
        if !unknown.is_empty() {
            warn!(
                count = unknown.len(),
                products = ?unknown,
                "reservations reference products outside the loaded set"
            );
        }
        ledger
    }

    /// Reserved quantity of `product`; zero when nothing is reserved.
    pub fn reserved(&self, product: &ProductId) -> i64 {
        self.reserved_totals.get(product).copied().unwrap_or(0)
    }

    /// Available quantity of `product`; `None` when the product is unknown.
    pub fn available(&self, product: &ProductId) -> Option<i64> {
        self.availability.get(product).copied()
    }

    /// Sum of every reserved quantity, unknown products included.
    pub fn total_reserved(&self) -> i64 {
        self.reserved_totals
            .values()
            .fold(0i64, |acc, q| acc.saturating_add(*q))
    }

    pub fn total_available(&self) -> i64 {
        self.availability
            .values()
            .fold(0i64, |acc, q| acc.saturating_add(*q))
    }

    /// Products that have reservations but no stock row.
    pub fn unknown_products(&self) -> Vec<&ProductId> {
        self.reserved_totals
            .keys()
            .filter(|id| !self.availability.contains_key(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(s: &str) -> ProductId {
        ProductId::from(s)
    }

    #[test]
    fn over_reservation_goes_negative() {
        let products = vec![Product::new("A", "Arroz", 100), Product::new("B", "Feijao", 5)];
        let lines = vec![
            ReservationLine::new("A", 30),
            ReservationLine::new("A", 20),
            ReservationLine::new("B", 10),
        ];
        let ledger = StockLedger::compute(&products, &lines);
        assert_eq!(
            ledger.reserved_totals,
            BTreeMap::from([(id("A"), 50), (id("B"), 10)])
        );
        assert_eq!(
            ledger.availability,
            BTreeMap::from([(id("A"), 50), (id("B"), -5)])
        );
    }

    #[test]
    fn unreserved_product_is_fully_available() {
        let products = vec![Product::new("C", "Cafe", 12)];
        let ledger = StockLedger::compute(&products, &[]);
        assert_eq!(ledger.reserved(&id("C")), 0);
        assert!(!ledger.reserved_totals.contains_key(&id("C")));
        assert_eq!(ledger.available(&id("C")), Some(12));
    }

    #[test]
    fn absurd_quantities_saturate() {
        let products = vec![Product::new("A", "Arroz", i64::MIN + 1)];
        let lines = vec![
            ReservationLine::new("A", i64::MAX),
            ReservationLine::new("A", i64::MAX),
            ReservationLine::new("Z", i64::MAX),
        ];
        let ledger = StockLedger::compute(&products, &lines);
        assert_eq!(ledger.reserved(&id("A")), i64::MAX);
        assert_eq!(ledger.available(&id("A")), Some(i64::MIN));
        assert_eq!(ledger.total_reserved(), i64::MAX);
        assert_eq!(ledger.total_available(), i64::MIN);
    }

    #[test]
    fn unknown_product_counts_as_reserved_only() {
        let products = vec![Product::new("A", "Arroz", 10)];
        let lines = vec![ReservationLine::new("A", 1), ReservationLine::new("Z", 7)];
        let ledger = StockLedger::compute(&products, &lines);
        assert_eq!(ledger.reserved(&id("Z")), 7);
        assert_eq!(ledger.available(&id("Z")), None);
        assert_eq!(ledger.unknown_products(), vec![&id("Z")]);
        assert_eq!(ledger.total_reserved(), 8);
        assert_eq!(ledger.total_available(), 9);
    }

    #[test]
    #[tracing_test::traced_test]
    fn unknown_product_is_logged() {
        let products = vec![Product::new("A", "Arroz", 10)];
        StockLedger::compute(&products, &[ReservationLine::new("ghost", 2)]);
        assert!(logs_contain("reservations reference products outside the loaded set"));
    }

    fn arb_case() -> impl Strategy<Value = (Vec<Product>, Vec<ReservationLine>)> {
        let stocks = prop::collection::vec(0i64..500, 1..8);
        stocks.prop_flat_map(|stocks| {
            let n = stocks.len();
            let products: Vec<Product> = stocks
                .iter()
                .enumerate()
                .map(|(i, s)| Product::new(format!("p{i}"), format!("Produto {i}"), *s))
                .collect();
            let lines = prop::collection::vec((0..n + 2, 1i64..100), 0..30).prop_map(|raw| {
                raw.into_iter()
                    .map(|(i, q)| ReservationLine::new(format!("p{i}"), q))
                    .collect::<Vec<_>>()
            });
            (Just(products), lines)
        })
    }

    proptest! {
        #[test]
        fn reserved_totals_conserve_line_quantities((products, lines) in arb_case()) {
            let ledger = StockLedger::compute(&products, &lines);
            let total: i64 = lines.iter().map(|l| l.quantity).sum();
            prop_assert_eq!(ledger.total_reserved(), total);
        }

        #[test]
        fn availability_is_stock_minus_reserved_unclamped((products, lines) in arb_case()) {
            let ledger = StockLedger::compute(&products, &lines);
            prop_assert_eq!(ledger.availability.len(), products.len());
            for p in &products {
                prop_assert_eq!(
                    ledger.available(&p.id),
                    Some(p.stock_quantity - ledger.reserved(&p.id))
                );
            }
        }

        #[test]
        fn compute_is_deterministic((products, lines) in arb_case()) {
            let first = StockLedger::compute(&products, &lines);
            let second = StockLedger::compute(&products, &lines);
            prop_assert_eq!(first, second);
        }
    }
}
