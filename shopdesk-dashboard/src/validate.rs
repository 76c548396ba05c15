use shopdesk_shared::{BulkPriceItem, VariantUpdateItem};

use crate::error::DashboardError;

/// Reject a stock/price batch before it leaves the client.
pub fn update_batch(items: &[VariantUpdateItem]) -> Result<(), DashboardError> {
    if items.is_empty() {
        return Err(DashboardError::Validation("no variants to update".to_string()));
    }

    for item in items {
        if let Some(stock) = item.stock.filter(|s| *s < 0) {
            return Err(DashboardError::Validation(format!(
                "variant {}: stock must be non-negative, got {}",
                item.variant_id, stock
            )));
        }
        if let Some(price) = item.price.filter(|p| p.is_sign_negative() && !p.is_zero()) {
            return Err(DashboardError::Validation(format!(
                "variant {}: price must be non-negative, got {}",
                item.variant_id, price
            )));
        }
    }

    Ok(())
}

pub fn price_batch(items: &[BulkPriceItem]) -> Result<(), DashboardError> {
    if items.is_empty() {
        return Err(DashboardError::Validation("no variants to price".to_string()));
    }

    match items.iter().find(|item| item.quantity <= 0) {
        Some(item) => Err(DashboardError::Validation(format!(
            "variant {}: quantity must be a positive integer, got {}",
            item.variant_id, item.quantity
        ))),
        None => Ok(()),
    }
}

/// Parse a `<variant_id>:<quantity>` pair from the command line.
pub fn parse_price_arg(arg: &str) -> Result<BulkPriceItem, DashboardError> {
    let invalid = || DashboardError::Validation(format!("expected <variant_id>:<quantity>, got '{}'", arg));

    let (id, qty) = arg.split_once(':').ok_or_else(invalid)?;
    let variant_id = id.trim().parse::<i64>().map_err(|_| invalid())?;
    let quantity = qty.trim().parse::<i64>().map_err(|_| invalid())?;

    Ok(BulkPriceItem { variant_id, quantity })
}
