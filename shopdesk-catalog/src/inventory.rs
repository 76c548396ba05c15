use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::product::ProductId;

/// Stock levels below this count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 20;

/// Three-tier stock classification shared by every inventory view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "In Stock")]
    InStock,
}

impl StockStatus {
    /// Unknown stock is treated as out of stock.
    pub fn classify(stock: Option<i64>) -> Self {
        match stock {
            None => StockStatus::OutOfStock,
            Some(s) if s <= 0 => StockStatus::OutOfStock,
            Some(s) if s < LOW_STOCK_THRESHOLD => StockStatus::LowStock,
            Some(_) => StockStatus::InStock,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current stock of one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    pub product_id: ProductId,
    pub name: String,
    pub stock: Option<i64>,
    pub status: StockStatus,
}

impl StockLevel {
    pub fn new(product_id: ProductId, name: String, stock: Option<i64>) -> Self {
        Self {
            product_id,
            name,
            stock,
            status: StockStatus::classify(stock),
        }
    }
}

/// Aggregate inventory view, recomputed from current stock on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub generated_at: DateTime<Utc>,
    pub total_products: usize,
    pub total_stock: i64,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub products: Vec<StockLevel>,
}

impl InventorySnapshot {
    pub fn from_levels(levels: Vec<StockLevel>) -> Self {
        Self::at(levels, Utc::now())
    }

    pub fn at(levels: Vec<StockLevel>, generated_at: DateTime<Utc>) -> Self {
        let mut snapshot = Self {
            generated_at,
            total_products: levels.len(),
            total_stock: 0,
            in_stock: 0,
            low_stock: 0,
            out_of_stock: 0,
            products: Vec::new(),
        };

        for level in &levels {
            snapshot.total_stock = snapshot.total_stock.saturating_add(level.stock.unwrap_or(0).max(0));
            match level.status {
                StockStatus::InStock => snapshot.in_stock += 1,
                StockStatus::LowStock => snapshot.low_stock += 1,
                StockStatus::OutOfStock => snapshot.out_of_stock += 1,
            }
        }

        snapshot.products = levels;
        snapshot
    }
}
