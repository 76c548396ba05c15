use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Overall outcome of a batch request.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every item succeeded (or the batch was empty).
    Success,
    Partial,
    /// No item succeeded.
    Failed,
}

impl BatchStatus {
    pub fn from_counts(succeeded: usize, total: usize) -> Self {
        if succeeded == total {
            BatchStatus::Success
        } else if succeeded == 0 {
            BatchStatus::Failed
        } else {
            BatchStatus::Partial
        }
    }
}

/// Why a single batch item was not processed.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    NotFound,
    NotAVariant,
    MissingPrice,
    /// Stored price is negative or too large to quote.
    InvalidPrice,
    StorageError,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::NotFound => "not_found",
            FailureReason::NotAVariant => "not_a_variant",
            FailureReason::MissingPrice => "missing_price",
            FailureReason::InvalidPrice => "invalid_price",
            FailureReason::StorageError => "storage_error",
        }
    }
}

// ============================================================================
// POST /bulk-variant-update
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BulkVariantUpdateRequest {
    pub variants: Vec<VariantUpdateItem>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VariantUpdateItem {
    pub variant_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UpdatedVariant {
    pub variant_id: i64,
    pub stock: Option<i64>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VariantUpdateResult {
    Updated {
        variant_id: i64,
        stock: Option<i64>,
        price: Option<Decimal>,
    },
    Failed {
        variant_id: i64,
        reason: FailureReason,
    },
}

impl VariantUpdateResult {
    pub fn variant_id(&self) -> i64 {
        match self {
            VariantUpdateResult::Updated { variant_id, .. } => *variant_id,
            VariantUpdateResult::Failed { variant_id, .. } => *variant_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BulkVariantUpdateResponse {
    pub status: BatchStatus,
    /// Successfully updated variants only.
    pub updated_variants: Vec<UpdatedVariant>,
    /// One entry per submitted item, in submission order.
    pub results: Vec<VariantUpdateResult>,
}

// ============================================================================
// POST /bulk-price-calculator
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BulkPriceRequest {
    pub variants: Vec<BulkPriceItem>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct BulkPriceItem {
    pub variant_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BulkPriceEntry {
    pub variant_id: i64,
    pub quantity: i64,
    /// Discounted unit price.
    pub bulk_price: Decimal,
    pub base_price: Decimal,
    pub discount_rate: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BulkPriceResult {
    Quoted(BulkPriceEntry),
    Failed {
        variant_id: i64,
        quantity: i64,
        reason: FailureReason,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BulkPriceResponse {
    pub status: BatchStatus,
    pub bulk_prices: Vec<BulkPriceEntry>,
    pub results: Vec<BulkPriceResult>,
}
