// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-customer catalog: the products a customer buys, with their overrides
//! applied and current availability attached.

use serde::{Deserialize, Serialize};

use stockroom_core::{CustomerProduct, Product, ProductId};

use crate::alerts::{StockLevel, StockThresholds};
use crate::ledger::StockLedger;

/// Brand shown when neither the customer link nor the product names one.
pub const FALLBACK_BRAND: &str = "Genérico";

/// A `customer_products` row with its product embedded (`*, products(*)`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerProductRow {
    #[serde(flatten)]
    pub link: CustomerProduct,
    #[serde(default)]
    pub products: Option<JoinedProduct>,
}

/// Embedded product; object or one-element array depending on the view.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum JoinedProduct {
    One(Product),
    Many(Vec<Product>),
}

impl CustomerProductRow {
    pub fn product(&self) -> Option<&Product> {
        match self.products.as_ref()? {
            JoinedProduct::One(product) => Some(product),
            JoinedProduct::Many(products) => products.first(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub product_id: ProductId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub brand: String,
    pub price: f64,
    pub stock_quantity: i64,
    pub reserved: i64,
    /// `None` when the product row is missing from the store.
    pub available: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<StockLevel>,
}

/// Products embedded in `rows`, deduplicated, in row order.
pub fn embedded_products(rows: &[CustomerProductRow]) -> Vec<Product> {
    let mut products: Vec<Product> = Vec::new();
    for product in rows.iter().filter_map(CustomerProductRow::product) {
        if !products.iter().any(|p| p.id == product.id) {
            products.push(product.clone());
        }
    }
    products
}

/// Merges customer overrides with product data and availability.
///
/// Blank overrides and a zero custom price fall back to the product's value.
pub fn customer_catalog(
    rows: &[CustomerProductRow],
    ledger: &StockLedger,
    thresholds: &StockThresholds,
) -> Vec<CatalogEntry> {
    rows.iter()
        .map(|row| {
            let link = &row.link;
            let product = row.product();
            let available = ledger.available(&link.product_id);
            CatalogEntry {
                product_id: link.product_id.clone(),
                name: non_blank(&link.custom_name)
                    .or_else(|| product.map(|p| p.name.clone()))
                    .unwrap_or_default(),
                description: non_blank(&link.custom_description)
                    .or_else(|| product.and_then(|p| non_blank(&p.description))),
                brand: non_blank(&link.custom_brand)
                    .or_else(|| product.and_then(|p| non_blank(&p.brand)))
                    .unwrap_or_else(|| FALLBACK_BRAND.to_string()),
                price: link
                    .custom_price
                    .filter(|price| *price != 0.0)
                    .or_else(|| product.map(|p| p.base_price))
                    .unwrap_or(0.0),
                stock_quantity: product.map(|p| p.stock_quantity).unwrap_or(0),
                reserved: ledger.reserved(&link.product_id),
                available,
                level: available.map(|a| thresholds.classify(a)),
            }
        })
        .collect()
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reservation::ReservationLine;
    use serde_json::json;

    fn rows() -> Vec<CustomerProductRow> {
        serde_json::from_value(json!([
            {
                "customer_id": "c1",
                "product_id": "p1",
                "custom_name": "Arroz Tipo 1 (contrato)",
                "custom_price": 21.9,
                "products": {"id": "p1", "name": "Arroz", "stock_quantity": 40, "base_price": 19.5, "brand": "Tio"}
            },
            {
                "customer_id": "c1",
                "product_id": "p2",
                "custom_name": "",
                "custom_price": 0,
                "products": [{"id": "p2", "name": "Feijao", "stock_quantity": 3, "base_price": 8.0}]
            },
            {
                "customer_id": "c1",
                "product_id": "p3",
                "products": null
            }
        ]))
        .unwrap()
    }

    #[test]
    fn overrides_fall_back_to_product_values() {
        let rows = rows();
        let products = embedded_products(&rows);
        assert_eq!(products.len(), 2);
        let ledger = StockLedger::compute(&products, &[ReservationLine::new("p1", 15)]);
        let catalog = customer_catalog(&rows, &ledger, &StockThresholds::default());

        assert_eq!(catalog[0].name, "Arroz Tipo 1 (contrato)");
        assert_eq!(catalog[0].brand, "Tio");
        assert!((catalog[0].price - 21.9).abs() < f64::EPSILON);
        assert_eq!(catalog[0].available, Some(25));
        assert_eq!(catalog[0].level, Some(StockLevel::Healthy));

        assert_eq!(catalog[1].name, "Feijao");
        assert_eq!(catalog[1].brand, FALLBACK_BRAND);
        assert!((catalog[1].price - 8.0).abs() < f64::EPSILON);
        assert_eq!(catalog[1].available, Some(3));
        assert_eq!(catalog[1].level, Some(StockLevel::Low));
    }

    #[test]
    fn missing_product_has_no_availability() {
        let rows = rows();
        let ledger = StockLedger::compute(&embedded_products(&rows), &[]);
        let catalog = customer_catalog(&rows, &ledger, &StockThresholds::default());
        assert_eq!(catalog[2].name, "");
        assert_eq!(catalog[2].available, None);
        assert_eq!(catalog[2].level, None);
        assert_eq!(catalog[2].price, 0.0);
    }
}
