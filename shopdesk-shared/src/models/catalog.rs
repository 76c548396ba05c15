use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Entry of `GET /products`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProductResponse {
    pub product_id: i64,
    pub name: String,
    #[serde(default)]
    pub variants: Vec<VariantResponse>,
    #[serde(default)]
    pub bulk_prices: Vec<BulkPriceRuleResponse>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VariantResponse {
    pub variant_id: i64,
    pub sku: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    pub stock: Option<i64>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BulkPriceRuleResponse {
    pub min_quantity: i64,
    pub price: Decimal,
}

/// Entry of `GET /inventory-status`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InventoryStatusEntry {
    pub product_id: i64,
    pub name: String,
    pub stock: Option<i64>,
    /// "Out of Stock", "Low Stock" or "In Stock"
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InventorySummaryResponse {
    pub generated_at: DateTime<Utc>,
    pub total_products: usize,
    pub total_stock: i64,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub products: Vec<InventoryStatusEntry>,
}
