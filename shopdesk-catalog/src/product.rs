use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inventory::StockLevel;

/// Identifier of a product record in the host catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

/// Identifier of a variation record in the host catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product kinds in the catalog. Only variable products carry variants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProductKind {
    Simple,
    Variable,
}

impl ProductKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::Simple => "simple",
            ProductKind::Variable => "variable",
        }
    }
}

/// A purchasable configuration of a product (size/color combination etc.)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    #[serde(default)]
    pub sku: Option<String>,
    /// `None` means the host catalog does not track stock for this variant.
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// Core product structure as read from the host catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub kind: ProductKind,
    /// Product-level stock, only meaningful for simple products.
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// Current stock for the product as a whole.
    ///
    /// Simple products report their own stock. Variable products report the sum of
    /// the variants that track stock, or `None` when none of them do. The sum
    /// saturates at `i64::MAX`.
    pub fn stock_level(&self) -> Option<i64> {
        match self.kind {
            ProductKind::Simple => self.stock,
            ProductKind::Variable => self
                .variants
                .iter()
                .filter_map(|v| v.stock)
                .fold(None, |acc, s| Some(acc.unwrap_or(0).saturating_add(s))),
        }
    }

    pub fn to_stock_level(&self) -> StockLevel {
        StockLevel::new(self.id, self.name.clone(), self.stock_level())
    }
}

/// Quantity-threshold price override attached to a single product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkPriceRule {
    pub product_id: ProductId,
    pub min_quantity: i64,
    pub price: Decimal,
}
