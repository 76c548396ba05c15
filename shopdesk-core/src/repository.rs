use std::collections::HashMap;

use async_trait::async_trait;
use shopdesk_catalog::{BulkPriceRule, Product, ProductId, Variant, VariantId, VariantPatch};

use crate::CoreResult;

/// Result of looking a variant up by id.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantLookup {
    Found(Variant),
    NotFound,
    /// The id exists but belongs to a record that is not a variation.
    NotAVariant,
}

/// Result of applying a patch to one variant record.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOutcome {
    Updated(Variant),
    NotFound,
    NotAVariant,
}

/// Repository trait for the host product catalog
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Published products ordered by id. Variable products carry their variants,
    /// simple products an empty list.
    async fn list_published_products(&self) -> CoreResult<Vec<Product>>;

    async fn find_variant(&self, id: VariantId) -> CoreResult<VariantLookup>;

    /// Apply and persist a patch. Atomic for this one record only.
    async fn apply_variant_patch(&self, patch: &VariantPatch) -> CoreResult<PatchOutcome>;
}

/// Repository trait for the persisted bulk discount rules table
#[async_trait]
pub trait BulkRuleRepository: Send + Sync {
    /// Bulk rules per product, each list ordered by `min_quantity`.
    /// Products without rules are absent from the map.
    async fn rules_for_products(
        &self,
        product_ids: &[ProductId],
    ) -> CoreResult<HashMap<ProductId, Vec<BulkPriceRule>>>;
}
