use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::to_currency;
use crate::product::{Variant, VariantId};

/// Requested change to a single variant. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantPatch {
    pub variant_id: VariantId,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub price: Option<Decimal>,
}

impl VariantPatch {
    /// Reject negative values and normalize the price to currency precision.
    pub fn validate(mut self) -> Result<Self, PatchError> {
        if let Some(stock) = self.stock {
            if stock < 0 {
                return Err(PatchError::NegativeStock { variant_id: self.variant_id, stock });
            }
        }

        if let Some(price) = self.price {
            if price.is_sign_negative() && !price.is_zero() {
                return Err(PatchError::NegativePrice { variant_id: self.variant_id, price });
            }
            self.price = Some(to_currency(price));
        }

        Ok(self)
    }
}

impl Variant {
    pub fn apply(&mut self, patch: &VariantPatch) {
        if let Some(stock) = patch.stock {
            self.stock = Some(stock);
        }
        if let Some(price) = patch.price {
            self.price = Some(price);
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PatchError {
    #[error("Stock for variant {variant_id} must not be negative, got {stock}")]
    NegativeStock { variant_id: VariantId, stock: i64 },

    #[error("Price for variant {variant_id} must not be negative, got {price}")]
    NegativePrice { variant_id: VariantId, price: Decimal },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductId;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    #[test]
    fn test_negative_stock_rejected() {
        let patch = VariantPatch { variant_id: VariantId(7), stock: Some(-1), price: None };
        assert_eq!(
            patch.validate(),
            Err(PatchError::NegativeStock { variant_id: VariantId(7), stock: -1 })
        );
    }

    #[test]
    fn test_price_normalized() {
        let patch = VariantPatch { variant_id: VariantId(7), stock: Some(0), price: Some(dec!(4.5)) }
            .validate()
            .unwrap();
        assert_eq!(patch.price.unwrap().to_string(), "4.50");
    }

    #[test]
    fn test_apply_only_touches_provided_fields() {
        let mut variant = Variant {
            id: VariantId(7),
            product_id: ProductId(1),
            sku: Some("TEE-S".into()),
            stock: Some(3),
            price: Some(dec!(9.99)),
            attributes: BTreeMap::new(),
        };

        variant.apply(&VariantPatch { variant_id: VariantId(7), stock: Some(12), price: None });

        assert_eq!(variant.stock, Some(12));
        assert_eq!(variant.price, Some(dec!(9.99)));
    }
}
