use std::sync::Arc;

use shopdesk_catalog::{
    BulkPriceRule, BulkQuote, DiscountSchedule, InventorySnapshot, Product, StockLevel, Variant,
    VariantId, VariantPatch,
};
use shopdesk_shared::{BatchStatus, FailureReason};
use tracing::{error, info, warn};

use crate::repository::{BulkRuleRepository, CatalogRepository, PatchOutcome, VariantLookup};
use crate::{CoreError, CoreResult};

/// A product together with the bulk rules that apply to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListing {
    pub product: Product,
    pub bulk_prices: Vec<BulkPriceRule>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariantUpdateOutcome {
    Updated(Variant),
    Failed { variant_id: VariantId, reason: FailureReason },
}

/// Per-item results of a bulk variant update, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkUpdateReport {
    pub items: Vec<VariantUpdateOutcome>,
}

impl BulkUpdateReport {
    pub fn updated(&self) -> impl Iterator<Item = &Variant> {
        self.items.iter().filter_map(|item| match item {
            VariantUpdateOutcome::Updated(v) => Some(v),
            VariantUpdateOutcome::Failed { .. } => None,
        })
    }

    pub fn status(&self) -> BatchStatus {
        BatchStatus::from_counts(self.updated().count(), self.items.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRequest {
    pub variant_id: VariantId,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PriceOutcome {
    Quoted { variant_id: VariantId, quote: BulkQuote },
    Failed { variant_id: VariantId, quantity: i64, reason: FailureReason },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkPriceReport {
    pub items: Vec<PriceOutcome>,
}

impl BulkPriceReport {
    pub fn quoted(&self) -> impl Iterator<Item = (VariantId, &BulkQuote)> {
        self.items.iter().filter_map(|item| match item {
            PriceOutcome::Quoted { variant_id, quote } => Some((*variant_id, quote)),
            PriceOutcome::Failed { .. } => None,
        })
    }

    pub fn status(&self) -> BatchStatus {
        BatchStatus::from_counts(self.quoted().count(), self.items.len())
    }
}

/// Stateless request handlers over the host catalog and the discount rules table.
pub struct CatalogService {
    catalog: Arc<dyn CatalogRepository>,
    rules: Arc<dyn BulkRuleRepository>,
    schedule: DiscountSchedule,
}

impl CatalogService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        rules: Arc<dyn BulkRuleRepository>,
        schedule: DiscountSchedule,
    ) -> Self {
        Self { catalog, rules, schedule }
    }

    pub fn schedule(&self) -> &DiscountSchedule {
        &self.schedule
    }

    pub async fn list_products(&self) -> CoreResult<Vec<ProductListing>> {
        let products = self.catalog.list_published_products().await?;
        let ids: Vec<_> = products.iter().map(|p| p.id).collect();
        let mut rules = self.rules.rules_for_products(&ids).await?;

        Ok(products
            .into_iter()
            .map(|product| ProductListing {
                bulk_prices: rules.remove(&product.id).unwrap_or_default(),
                product,
            })
            .collect())
    }

    pub async fn inventory_status(&self) -> CoreResult<Vec<StockLevel>> {
        let products = self.catalog.list_published_products().await?;
        Ok(products.iter().map(Product::to_stock_level).collect())
    }

    pub async fn inventory_snapshot(&self) -> CoreResult<InventorySnapshot> {
        Ok(InventorySnapshot::from_levels(self.inventory_status().await?))
    }

    /// Apply each patch independently.
    ///
    /// The whole batch is validated first; an invalid entry rejects the request
    /// before anything is written. After that, failures are reported per item and
    /// earlier writes are not rolled back.
    pub async fn bulk_update_variants(&self, patches: Vec<VariantPatch>) -> CoreResult<BulkUpdateReport> {
        let patches = patches
            .into_iter()
            .enumerate()
            .map(|(idx, patch)| {
                patch
                    .validate()
                    .map_err(|e| CoreError::ValidationError(format!("variants[{}]: {}", idx, e)))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let mut items = Vec::with_capacity(patches.len());
        for patch in &patches {
            let outcome = match self.catalog.apply_variant_patch(patch).await {
                Ok(PatchOutcome::Updated(variant)) => VariantUpdateOutcome::Updated(variant),
                Ok(PatchOutcome::NotFound) => {
                    warn!("Bulk update skipped unknown variant {}", patch.variant_id);
                    VariantUpdateOutcome::Failed { variant_id: patch.variant_id, reason: FailureReason::NotFound }
                }
                Ok(PatchOutcome::NotAVariant) => {
                    warn!("Bulk update skipped record {}: not a variation", patch.variant_id);
                    VariantUpdateOutcome::Failed { variant_id: patch.variant_id, reason: FailureReason::NotAVariant }
                }
                Err(e) => {
                    error!("Failed to update variant {}: {}", patch.variant_id, e);
                    VariantUpdateOutcome::Failed { variant_id: patch.variant_id, reason: FailureReason::StorageError }
                }
            };
            items.push(outcome);
        }

        let report = BulkUpdateReport { items };
        info!(
            "Bulk variant update: {} of {} applied ({:?})",
            report.updated().count(),
            report.items.len(),
            report.status()
        );
        Ok(report)
    }

    pub async fn bulk_price(&self, requests: Vec<PriceRequest>) -> CoreResult<BulkPriceReport> {
        if let Some((idx, req)) = requests.iter().enumerate().find(|(_, r)| r.quantity <= 0) {
            return Err(CoreError::ValidationError(format!(
                "variants[{}]: quantity must be a positive integer, got {}",
                idx, req.quantity
            )));
        }

        let mut items = Vec::with_capacity(requests.len());
        for req in requests {
            let failed = |reason| PriceOutcome::Failed { variant_id: req.variant_id, quantity: req.quantity, reason };

            let outcome = match self.catalog.find_variant(req.variant_id).await {
                Ok(VariantLookup::Found(variant)) => match variant.price {
                    Some(base) => match self.schedule.quote(base, req.quantity) {
                        Ok(quote) => PriceOutcome::Quoted { variant_id: req.variant_id, quote },
                        Err(e) => {
                            warn!("Cannot quote variant {}: {}", req.variant_id, e);
                            failed(FailureReason::InvalidPrice)
                        }
                    },
                    None => failed(FailureReason::MissingPrice),
                },
                Ok(VariantLookup::NotFound) => failed(FailureReason::NotFound),
                Ok(VariantLookup::NotAVariant) => failed(FailureReason::NotAVariant),
                Err(e) => {
                    error!("Failed to look up variant {}: {}", req.variant_id, e);
                    failed(FailureReason::StorageError)
                }
            };
            items.push(outcome);
        }

        Ok(BulkPriceReport { items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use shopdesk_catalog::{ProductId, ProductKind};
    use std::collections::{BTreeMap, HashMap};
    use tokio::sync::Mutex;

    /// Minimal catalog: product 1 (variable) with variants 10, 11 and a simple product 2.
    struct FakeCatalog {
        variants: Mutex<Vec<Variant>>,
        fail_on: Option<VariantId>,
    }

    impl FakeCatalog {
        fn new() -> Self {
            let variant = |id, stock, price| Variant {
                id: VariantId(id),
                product_id: ProductId(1),
                sku: Some(format!("SKU-{}", id)),
                stock,
                price,
                attributes: BTreeMap::new(),
            };
            Self {
                variants: Mutex::new(vec![
                    variant(10, Some(4), Some(dec!(100.00))),
                    variant(11, None, None),
                ]),
                fail_on: None,
            }
        }
    }

    #[async_trait]
    impl CatalogRepository for FakeCatalog {
        async fn list_published_products(&self) -> CoreResult<Vec<Product>> {
            Ok(vec![
                Product {
                    id: ProductId(1),
                    name: "Tee".into(),
                    kind: ProductKind::Variable,
                    stock: None,
                    variants: self.variants.lock().await.clone(),
                },
                Product { id: ProductId(2), name: "Mug".into(), kind: ProductKind::Simple, stock: Some(25), variants: vec![] },
            ])
        }

        async fn find_variant(&self, id: VariantId) -> CoreResult<VariantLookup> {
            if id == VariantId(2) {
                return Ok(VariantLookup::NotAVariant);
            }
            let variants = self.variants.lock().await;
            Ok(variants
                .iter()
                .find(|v| v.id == id)
                .cloned()
                .map(VariantLookup::Found)
                .unwrap_or(VariantLookup::NotFound))
        }

        async fn apply_variant_patch(&self, patch: &VariantPatch) -> CoreResult<PatchOutcome> {
            if Some(patch.variant_id) == self.fail_on {
                return Err(CoreError::StorageError("connection reset".into()));
            }
            if patch.variant_id == VariantId(2) {
                return Ok(PatchOutcome::NotAVariant);
            }
            let mut variants = self.variants.lock().await;
            match variants.iter_mut().find(|v| v.id == patch.variant_id) {
                Some(v) => {
                    v.apply(patch);
                    Ok(PatchOutcome::Updated(v.clone()))
                }
                None => Ok(PatchOutcome::NotFound),
            }
        }
    }

    struct FakeRules;

    #[async_trait]
    impl BulkRuleRepository for FakeRules {
        async fn rules_for_products(
            &self,
            product_ids: &[ProductId],
        ) -> CoreResult<HashMap<ProductId, Vec<BulkPriceRule>>> {
            let mut map = HashMap::new();
            if product_ids.contains(&ProductId(1)) {
                map.insert(
                    ProductId(1),
                    vec![BulkPriceRule { product_id: ProductId(1), min_quantity: 10, price: dec!(8.00) }],
                );
            }
            Ok(map)
        }
    }

    fn service(catalog: FakeCatalog) -> CatalogService {
        CatalogService::new(Arc::new(catalog), Arc::new(FakeRules), DiscountSchedule::default())
    }

    #[tokio::test]
    async fn test_list_products_joins_rules() {
        let listings = service(FakeCatalog::new()).list_products().await.unwrap();

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].bulk_prices.len(), 1);
        assert!(listings[1].bulk_prices.is_empty());
        assert!(listings[1].product.variants.is_empty());
    }

    #[tokio::test]
    async fn test_inventory_status_classifies() {
        let levels = service(FakeCatalog::new()).inventory_status().await.unwrap();

        assert_eq!(levels[0].stock, Some(4));
        assert_eq!(levels[0].status.label(), "Low Stock");
        assert_eq!(levels[1].status.label(), "In Stock");
    }

    #[tokio::test]
    async fn test_bulk_update_reports_each_item() {
        let svc = service(FakeCatalog::new());
        let report = svc
            .bulk_update_variants(vec![
                VariantPatch { variant_id: VariantId(10), stock: Some(30), price: None },
                VariantPatch { variant_id: VariantId(999), stock: Some(1), price: None },
                VariantPatch { variant_id: VariantId(2), stock: Some(1), price: None },
            ])
            .await
            .unwrap();

        assert_eq!(report.status(), BatchStatus::Partial);
        assert!(matches!(&report.items[0], VariantUpdateOutcome::Updated(v) if v.stock == Some(30)));
        assert_eq!(
            report.items[1],
            VariantUpdateOutcome::Failed { variant_id: VariantId(999), reason: FailureReason::NotFound }
        );
        assert_eq!(
            report.items[2],
            VariantUpdateOutcome::Failed { variant_id: VariantId(2), reason: FailureReason::NotAVariant }
        );

        let levels = svc.inventory_status().await.unwrap();
        assert_eq!(levels[0].stock, Some(30));
    }

    #[tokio::test]
    async fn test_bulk_update_rejects_negative_stock_before_writing() {
        let svc = service(FakeCatalog::new());
        let err = svc
            .bulk_update_variants(vec![
                VariantPatch { variant_id: VariantId(10), stock: Some(50), price: None },
                VariantPatch { variant_id: VariantId(11), stock: Some(-2), price: None },
            ])
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ValidationError(msg) if msg.starts_with("variants[1]")));
        let levels = svc.inventory_status().await.unwrap();
        assert_eq!(levels[0].stock, Some(4));
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_abort_batch() {
        let mut catalog = FakeCatalog::new();
        catalog.fail_on = Some(VariantId(10));
        let report = service(catalog)
            .bulk_update_variants(vec![
                VariantPatch { variant_id: VariantId(10), stock: Some(1), price: None },
                VariantPatch { variant_id: VariantId(11), stock: Some(2), price: None },
            ])
            .await
            .unwrap();

        assert_eq!(
            report.items[0],
            VariantUpdateOutcome::Failed { variant_id: VariantId(10), reason: FailureReason::StorageError }
        );
        assert!(matches!(report.items[1], VariantUpdateOutcome::Updated(_)));
    }

    #[tokio::test]
    async fn test_bulk_price_quotes_and_failures() {
        let report = service(FakeCatalog::new())
            .bulk_price(vec![
                PriceRequest { variant_id: VariantId(10), quantity: 100 },
                PriceRequest { variant_id: VariantId(11), quantity: 5 },
                PriceRequest { variant_id: VariantId(404), quantity: 5 },
            ])
            .await
            .unwrap();

        match &report.items[0] {
            PriceOutcome::Quoted { quote, .. } => assert_eq!(quote.unit_price, dec!(85.00)),
            other => panic!("expected quote, got {:?}", other),
        }
        assert!(matches!(report.items[1], PriceOutcome::Failed { reason: FailureReason::MissingPrice, .. }));
        assert!(matches!(report.items[2], PriceOutcome::Failed { reason: FailureReason::NotFound, .. }));
        assert_eq!(report.status(), BatchStatus::Partial);
    }

    #[tokio::test]
    async fn test_bulk_price_rejects_zero_quantity() {
        let err = service(FakeCatalog::new())
            .bulk_price(vec![PriceRequest { variant_id: VariantId(10), quantity: 0 }])
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_bad_stored_price_fails_only_that_item() {
        let mut catalog = FakeCatalog::new();
        catalog.variants.get_mut().push(Variant {
            id: VariantId(12),
            product_id: ProductId(1),
            sku: None,
            stock: Some(1),
            price: Some(dec!(-5.00)),
            attributes: BTreeMap::new(),
        });

        let report = service(catalog)
            .bulk_price(vec![
                PriceRequest { variant_id: VariantId(12), quantity: 3 },
                PriceRequest { variant_id: VariantId(10), quantity: 20 },
            ])
            .await
            .unwrap();

        assert_eq!(
            report.items[0],
            PriceOutcome::Failed { variant_id: VariantId(12), quantity: 3, reason: FailureReason::InvalidPrice }
        );
        assert!(matches!(&report.items[1], PriceOutcome::Quoted { quote, .. } if quote.unit_price == dec!(95.00)));
        assert_eq!(report.status(), BatchStatus::Partial);
    }
}
