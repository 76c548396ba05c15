//! Plain-text renderings of API responses, one per dashboard panel.

use std::fmt::Write;

use rust_decimal::Decimal;
use shopdesk_catalog::{money::to_currency, StockStatus};
use shopdesk_shared::{
    BatchStatus, BulkPriceResponse, BulkPriceResult, BulkVariantUpdateResponse, InventoryStatusEntry,
    InventorySummaryResponse, ProductResponse, VariantUpdateResult,
};

use crate::error::DashboardError;

pub const UNNAMED_PRODUCT: &str = "Unnamed Product";
pub const MISSING_SKU: &str = "N/A";

pub fn display_name(name: &str) -> &str {
    if name.trim().is_empty() {
        UNNAMED_PRODUCT
    } else {
        name
    }
}

/// Two decimal places, "0.00" when the price is unset.
pub fn format_price(price: Option<Decimal>) -> String {
    to_currency(price.unwrap_or_default()).to_string()
}

fn format_stock(stock: Option<i64>) -> String {
    stock.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())
}

fn format_status(status: BatchStatus) -> &'static str {
    match status {
        BatchStatus::Success => "success",
        BatchStatus::Partial => "partial",
        BatchStatus::Failed => "failed",
    }
}

pub fn render_products(products: &[ProductResponse]) -> String {
    let mut out = String::new();
    if products.is_empty() {
        out.push_str("No published products.\n");
        return out;
    }

    for product in products {
        let _ = writeln!(out, "{} (#{})", display_name(&product.name), product.product_id);

        if product.variants.is_empty() {
            out.push_str("  (no variants)\n");
        } else {
            let _ = writeln!(out, "  {:<8} {:<16} {:<24} {:>7} {:>10}  {}", "ID", "SKU", "ATTRIBUTES", "STOCK", "PRICE", "STATUS");
            for v in &product.variants {
                let attributes = v
                    .attributes
                    .iter()
                    .map(|(k, val)| format!("{}={}", k, val))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(
                    out,
                    "  {:<8} {:<16} {:<24} {:>7} {:>10}  {}",
                    v.variant_id,
                    v.sku.as_deref().filter(|s| !s.is_empty()).unwrap_or(MISSING_SKU),
                    attributes,
                    format_stock(v.stock),
                    format_price(v.price),
                    StockStatus::classify(v.stock),
                );
            }
        }

        for rule in &product.bulk_prices {
            let _ = writeln!(out, "  bulk: {}+ @ {}", rule.min_quantity, format_price(Some(rule.price)));
        }
    }

    out
}

/// Status counts, classified client-side from the reported stock.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
}

impl StatusCounts {
    pub fn tally(entries: &[InventoryStatusEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut counts, entry| {
            match StockStatus::classify(entry.stock) {
                StockStatus::InStock => counts.in_stock += 1,
                StockStatus::LowStock => counts.low_stock += 1,
                StockStatus::OutOfStock => counts.out_of_stock += 1,
            }
            counts
        })
    }
}

pub fn render_inventory(entries: &[InventoryStatusEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<32} {:>7}  {}", "PRODUCT", "STOCK", "STATUS");
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<32} {:>7}  {}",
            display_name(&entry.name),
            format_stock(entry.stock),
            StockStatus::classify(entry.stock),
        );
    }

    let counts = StatusCounts::tally(entries);
    let _ = writeln!(
        out,
        "Total: {} | In Stock: {} | Low Stock: {} | Out of Stock: {}",
        entries.len(),
        counts.in_stock,
        counts.low_stock,
        counts.out_of_stock
    );
    out
}

pub fn render_summary(summary: &InventorySummaryResponse) -> String {
    let mut out = format!(
        "Inventory at {} ({} units on hand)\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        summary.total_stock
    );
    out.push_str(&render_inventory(&summary.products));
    out
}

pub fn render_bulk_prices(response: &BulkPriceResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Bulk pricing: {}", format_status(response.status));
    let _ = writeln!(
        out,
        "{:<10} {:>8} {:>10} {:>9} {:>10} {:>12}",
        "VARIANT", "QTY", "BASE", "DISCOUNT", "UNIT", "TOTAL"
    );

    for result in &response.results {
        match result {
            BulkPriceResult::Quoted(entry) => {
                let percent = (entry.discount_rate * Decimal::ONE_HUNDRED).normalize();
                let _ = writeln!(
                    out,
                    "{:<10} {:>8} {:>10} {:>9} {:>10} {:>12}",
                    entry.variant_id,
                    entry.quantity,
                    format_price(Some(entry.base_price)),
                    format!("{}%", percent),
                    format_price(Some(entry.bulk_price)),
                    format_price(Some(entry.total_price)),
                );
            }
            BulkPriceResult::Failed { variant_id, quantity, reason } => {
                let _ = writeln!(out, "{:<10} {:>8}  failed: {}", variant_id, quantity, reason.as_str());
            }
        }
    }
    out
}

pub fn render_update_results(response: &BulkVariantUpdateResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Bulk update: {} ({} of {} updated)",
        format_status(response.status),
        response.updated_variants.len(),
        response.results.len()
    );

    for result in &response.results {
        match result {
            VariantUpdateResult::Updated { variant_id, stock, price } => {
                let _ = writeln!(
                    out,
                    "  updated  #{:<8} stock {:>7}  price {:>10}",
                    variant_id,
                    format_stock(*stock),
                    format_price(*price)
                );
            }
            VariantUpdateResult::Failed { variant_id, reason } => {
                let _ = writeln!(out, "  failed   #{:<8} {}", variant_id, reason.as_str());
            }
        }
    }
    out
}

pub fn render_error(err: &DashboardError) -> String {
    if err.is_transient() {
        format!("Error: {} (temporary, try again)\n", err)
    } else {
        format!("Error: {}\n", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use shopdesk_shared::{BulkPriceEntry, FailureReason, UpdatedVariant, VariantResponse};
    use std::collections::BTreeMap;

    fn entry(name: &str, stock: Option<i64>) -> InventoryStatusEntry {
        InventoryStatusEntry { product_id: 1, name: name.into(), stock, status: String::new() }
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(format_price(None), "0.00");
        assert_eq!(format_price(Some(dec!(9.5))), "9.50");
        assert_eq!(format_price(Some(dec!(12.345))), "12.35");
    }

    #[test]
    fn test_product_fallbacks() {
        let products = vec![ProductResponse {
            product_id: 4,
            name: "  ".into(),
            variants: vec![VariantResponse {
                variant_id: 41,
                sku: None,
                attributes: BTreeMap::new(),
                stock: Some(0),
                price: None,
            }],
            bulk_prices: vec![],
        }];

        let text = render_products(&products);
        assert!(text.starts_with("Unnamed Product (#4)"));
        assert!(text.contains("N/A"));
        assert!(text.contains("0.00"));
        assert!(text.contains("Out of Stock"));
    }

    #[test]
    fn test_inventory_counts_use_stock_thresholds() {
        let entries = vec![entry("a", Some(0)), entry("b", Some(19)), entry("c", Some(20)), entry("d", None)];

        assert_eq!(
            StatusCounts::tally(&entries),
            StatusCounts { in_stock: 1, low_stock: 1, out_of_stock: 2 }
        );
        assert!(render_inventory(&entries).contains("Total: 4 | In Stock: 1 | Low Stock: 1 | Out of Stock: 2"));
    }

    #[test]
    fn test_bulk_price_table() {
        let response = BulkPriceResponse {
            status: BatchStatus::Partial,
            bulk_prices: vec![],
            results: vec![
                BulkPriceResult::Quoted(BulkPriceEntry {
                    variant_id: 11,
                    quantity: 100,
                    bulk_price: dec!(85.00),
                    base_price: dec!(100.00),
                    discount_rate: dec!(0.15),
                    total_price: dec!(8500.00),
                }),
                BulkPriceResult::Failed { variant_id: 12, quantity: 3, reason: FailureReason::MissingPrice },
            ],
        };

        let text = render_bulk_prices(&response);
        assert!(text.contains("15%"));
        assert!(text.contains("8500.00"));
        assert!(text.contains("failed: missing_price"));
    }

    #[test]
    fn test_update_results_distinguish_failures() {
        let response = BulkVariantUpdateResponse {
            status: BatchStatus::Partial,
            updated_variants: vec![UpdatedVariant { variant_id: 5, stock: Some(3), price: Some(dec!(2)) }],
            results: vec![
                VariantUpdateResult::Updated { variant_id: 5, stock: Some(3), price: Some(dec!(2)) },
                VariantUpdateResult::Failed { variant_id: 6, reason: FailureReason::NotFound },
            ],
        };

        let text = render_update_results(&response);
        assert!(text.starts_with("Bulk update: partial (1 of 2 updated)"));
        assert!(text.contains("updated  #5"));
        assert!(text.contains("failed   #6        not_found"));
    }
}
