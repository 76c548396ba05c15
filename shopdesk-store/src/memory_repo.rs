use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use shopdesk_catalog::{BulkPriceRule, Product, ProductId, ProductKind, Variant, VariantId, VariantPatch};
use shopdesk_core::{BulkRuleRepository, CatalogRepository, CoreResult, PatchOutcome, VariantLookup};

use crate::StoreError;

/// JSON fixture describing a catalog and its discount rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub products: Vec<SeedProduct>,
    #[serde(default)]
    pub discount_rules: Vec<SeedRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedProduct {
    pub id: i64,
    pub name: String,
    pub kind: ProductKind,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub variants: Vec<SeedVariant>,
}

fn default_status() -> String { "publish".to_string() }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedVariant {
    pub id: i64,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedRule {
    pub product_id: i64,
    #[serde(default = "default_rule_type")]
    pub rule_type: String,
    pub min_quantity: i64,
    pub price: Decimal,
}

fn default_rule_type() -> String { "bulk".to_string() }

struct StoredProduct {
    name: String,
    kind: ProductKind,
    published: bool,
    stock: Option<i64>,
    variant_ids: Vec<VariantId>,
}

#[derive(Default)]
struct CatalogState {
    products: BTreeMap<ProductId, StoredProduct>,
    variants: HashMap<VariantId, Variant>,
}

/// In-process catalog used for local development and tests.
///
/// Products and variants share one id space, as records do in the host catalog.
pub struct MemoryCatalog {
    state: RwLock<CatalogState>,
    rules: Vec<BulkPriceRule>,
}

impl MemoryCatalog {
    pub fn from_seed(seed: CatalogSeed) -> Result<Self, StoreError> {
        let mut state = CatalogState::default();
        let mut seen = HashSet::new();

        for product in seed.products {
            if !seen.insert(product.id) {
                return Err(StoreError::InvalidSeed(format!("duplicate record id {}", product.id)));
            }
            if product.kind == ProductKind::Simple && !product.variants.is_empty() {
                return Err(StoreError::InvalidSeed(format!(
                    "simple product {} cannot have variants",
                    product.id
                )));
            }

            let product_id = ProductId(product.id);
            let mut variant_ids = Vec::with_capacity(product.variants.len());
            for v in product.variants {
                if !seen.insert(v.id) {
                    return Err(StoreError::InvalidSeed(format!("duplicate record id {}", v.id)));
                }
                let id = VariantId(v.id);
                variant_ids.push(id);
                state.variants.insert(
                    id,
                    Variant {
                        id,
                        product_id,
                        sku: v.sku,
                        stock: v.stock,
                        price: v.price,
                        attributes: v.attributes,
                    },
                );
            }

            state.products.insert(
                product_id,
                StoredProduct {
                    name: product.name,
                    kind: product.kind,
                    published: product.status == "publish",
                    stock: product.stock,
                    variant_ids,
                },
            );
        }

        let mut rules: Vec<BulkPriceRule> = seed
            .discount_rules
            .into_iter()
            .filter(|r| r.rule_type == "bulk")
            .map(|r| BulkPriceRule {
                product_id: ProductId(r.product_id),
                min_quantity: r.min_quantity,
                price: r.price,
            })
            .collect();
        rules.sort_by_key(|r| (r.product_id, r.min_quantity));

        Ok(Self { state: RwLock::new(state), rules })
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Self::from_seed(serde_json::from_str(json)?)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await.map_err(|source| StoreError::SeedIo {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        info!("Loaded in-memory catalog from {}", path.display());
        Ok(catalog)
    }

    pub fn empty() -> Self {
        Self { state: RwLock::new(CatalogState::default()), rules: Vec::new() }
    }
}

#[async_trait]
impl CatalogRepository for MemoryCatalog {
    async fn list_published_products(&self) -> CoreResult<Vec<Product>> {
        let state = self.state.read().await;

        Ok(state
            .products
            .iter()
            .filter(|(_, p)| p.published)
            .map(|(id, p)| Product {
                id: *id,
                name: p.name.clone(),
                kind: p.kind,
                stock: p.stock,
                variants: match p.kind {
                    ProductKind::Variable => p
                        .variant_ids
                        .iter()
                        .filter_map(|vid| state.variants.get(vid).cloned())
                        .collect(),
                    ProductKind::Simple => Vec::new(),
                },
            })
            .collect())
    }

    async fn find_variant(&self, id: VariantId) -> CoreResult<VariantLookup> {
        let state = self.state.read().await;

        if let Some(variant) = state.variants.get(&id) {
            return Ok(VariantLookup::Found(variant.clone()));
        }
        if state.products.contains_key(&ProductId(id.0)) {
            return Ok(VariantLookup::NotAVariant);
        }
        Ok(VariantLookup::NotFound)
    }

    async fn apply_variant_patch(&self, patch: &VariantPatch) -> CoreResult<PatchOutcome> {
        let mut state = self.state.write().await;

        if let Some(variant) = state.variants.get_mut(&patch.variant_id) {
            variant.apply(patch);
            return Ok(PatchOutcome::Updated(variant.clone()));
        }
        if state.products.contains_key(&ProductId(patch.variant_id.0)) {
            return Ok(PatchOutcome::NotAVariant);
        }
        Ok(PatchOutcome::NotFound)
    }
}

#[async_trait]
impl BulkRuleRepository for MemoryCatalog {
    async fn rules_for_products(
        &self,
        product_ids: &[ProductId],
    ) -> CoreResult<HashMap<ProductId, Vec<BulkPriceRule>>> {
        let mut map: HashMap<ProductId, Vec<BulkPriceRule>> = HashMap::new();
        for rule in self.rules.iter().filter(|r| product_ids.contains(&r.product_id)) {
            map.entry(rule.product_id).or_default().push(rule.clone());
        }
        Ok(map)
    }
}
