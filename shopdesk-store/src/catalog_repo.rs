use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;

use shopdesk_catalog::{BulkPriceRule, Product, ProductId, ProductKind, Variant, VariantId, VariantPatch};
use shopdesk_core::{BulkRuleRepository, CatalogRepository, CoreResult, PatchOutcome, VariantLookup};

use crate::database::storage_error;

const KIND_VARIATION: &str = "variation";

pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    parent_id: Option<i64>,
    kind: String,
    name: String,
    sku: Option<String>,
    stock_quantity: Option<i64>,
    price: Option<Decimal>,
    attributes: Option<Json<BTreeMap<String, String>>>,
}

impl ItemRow {
    fn into_variant(self) -> Variant {
        Variant {
            id: VariantId(self.id),
            product_id: ProductId(self.parent_id.unwrap_or_default()),
            sku: self.sku.filter(|s| !s.is_empty()),
            stock: self.stock_quantity,
            price: self.price,
            attributes: self.attributes.map(|Json(a)| a).unwrap_or_default(),
        }
    }
}

const ITEM_COLUMNS: &str = "id, parent_id, kind, name, sku, stock_quantity, price, attributes";

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn list_published_products(&self) -> CoreResult<Vec<Product>> {
        let rows: Vec<ItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM catalog_items \
             WHERE kind IN ('simple', 'variable') AND status = 'publish' \
             ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let variable_ids: Vec<i64> = rows.iter().filter(|r| r.kind == "variable").map(|r| r.id).collect();

        let mut variants_by_parent: HashMap<i64, Vec<Variant>> = HashMap::new();
        if !variable_ids.is_empty() {
            let variant_rows: Vec<ItemRow> = sqlx::query_as(&format!(
                "SELECT {ITEM_COLUMNS} FROM catalog_items \
                 WHERE kind = 'variation' AND parent_id = ANY($1) \
                 ORDER BY parent_id, menu_order, id"
            ))
            .bind(variable_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

            for row in variant_rows {
                let parent = row.parent_id.unwrap_or_default();
                variants_by_parent.entry(parent).or_default().push(row.into_variant());
            }
        }

        let products = rows
            .into_iter()
            .map(|row| {
                let kind = if row.kind == "variable" { ProductKind::Variable } else { ProductKind::Simple };
                Product {
                    id: ProductId(row.id),
                    name: row.name,
                    kind,
                    stock: row.stock_quantity,
                    variants: match kind {
                        ProductKind::Variable => variants_by_parent.remove(&row.id).unwrap_or_default(),
                        ProductKind::Simple => Vec::new(),
                    },
                }
            })
            .collect();

        Ok(products)
    }

    async fn find_variant(&self, id: VariantId) -> CoreResult<VariantLookup> {
        let row: Option<ItemRow> = sqlx::query_as(&format!("SELECT {ITEM_COLUMNS} FROM catalog_items WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(match row {
            None => VariantLookup::NotFound,
            Some(row) if row.kind != KIND_VARIATION => VariantLookup::NotAVariant,
            Some(row) => VariantLookup::Found(row.into_variant()),
        })
    }

    async fn apply_variant_patch(&self, patch: &VariantPatch) -> CoreResult<PatchOutcome> {
        let updated: Option<ItemRow> = sqlx::query_as(&format!(
            r#"
            UPDATE catalog_items
            SET stock_quantity = COALESCE($2, stock_quantity),
                price = COALESCE($3, price),
                updated_at = NOW()
            WHERE id = $1 AND kind = 'variation'
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(patch.variant_id.0)
        .bind(patch.stock)
        .bind(patch.price)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        if let Some(row) = updated {
            return Ok(PatchOutcome::Updated(row.into_variant()));
        }

        // Nothing updated: tell a missing id apart from a non-variation record
        let kind: Option<String> = sqlx::query_scalar("SELECT kind FROM catalog_items WHERE id = $1")
            .bind(patch.variant_id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(match kind {
            Some(_) => PatchOutcome::NotAVariant,
            None => PatchOutcome::NotFound,
        })
    }
}

pub struct PgBulkRuleRepository {
    pool: PgPool,
}

impl PgBulkRuleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RuleRow {
    product_id: i64,
    min_quantity: i64,
    price: Decimal,
}

#[async_trait]
impl BulkRuleRepository for PgBulkRuleRepository {
    async fn rules_for_products(
        &self,
        product_ids: &[ProductId],
    ) -> CoreResult<HashMap<ProductId, Vec<BulkPriceRule>>> {
        if product_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<i64> = product_ids.iter().map(|id| id.0).collect();
        let rows: Vec<RuleRow> = sqlx::query_as(
            "SELECT product_id, min_quantity, price FROM discount_rules \
             WHERE rule_type = 'bulk' AND product_id = ANY($1) \
             ORDER BY product_id, min_quantity",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let mut rules: HashMap<ProductId, Vec<BulkPriceRule>> = HashMap::new();
        for row in rows {
            let product_id = ProductId(row.product_id);
            rules.entry(product_id).or_default().push(BulkPriceRule {
                product_id,
                min_quantity: row.min_quantity,
                price: row.price,
            });
        }

        Ok(rules)
    }
}
