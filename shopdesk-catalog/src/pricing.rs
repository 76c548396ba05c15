use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{to_currency, CURRENCY_SCALE};

/// One quantity breakpoint of the bulk discount table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTier {
    /// Smallest quantity (inclusive) the tier applies to.
    pub min_quantity: i64,
    /// Discount off the base unit price, in whole percent.
    pub percent_off: u32,
}

impl DiscountTier {
    /// Fraction taken off the base price, e.g. `0.15`.
    pub fn discount_rate(&self) -> Decimal {
        Decimal::new(i64::from(self.percent_off), 2)
    }
}

/// Result of pricing a quantity of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkQuote {
    pub quantity: i64,
    pub base_price: Decimal,
    pub unit_price: Decimal,
    pub discount_rate: Decimal,
    pub total_price: Decimal,
}

/// Quantity based discount evaluator.
///
/// Tiers are kept sorted by descending `min_quantity`, so the first tier whose
/// threshold the quantity reaches wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountSchedule {
    tiers: Vec<DiscountTier>,
}

impl Default for DiscountSchedule {
    fn default() -> Self {
        Self {
            tiers: vec![
                DiscountTier { min_quantity: 100, percent_off: 15 },
                DiscountTier { min_quantity: 50, percent_off: 10 },
                DiscountTier { min_quantity: 20, percent_off: 5 },
            ],
        }
    }
}

impl DiscountSchedule {
    /// Build a schedule from configured tiers.
    ///
    /// Larger quantities may never receive a smaller discount, so a discounted
    /// price never increases as the quantity grows.
    pub fn new(mut tiers: Vec<DiscountTier>) -> Result<Self, PricingError> {
        tiers.sort_by_key(|t| t.min_quantity);

        for tier in &tiers {
            if tier.min_quantity < 1 {
                return Err(PricingError::InvalidSchedule(format!(
                    "tier threshold must be at least 1, got {}",
                    tier.min_quantity
                )));
            }
            if tier.percent_off > 100 {
                return Err(PricingError::InvalidSchedule(format!(
                    "discount of {}% at {} units exceeds 100%",
                    tier.percent_off, tier.min_quantity
                )));
            }
        }

        for pair in tiers.windows(2) {
            if pair[0].min_quantity == pair[1].min_quantity {
                return Err(PricingError::InvalidSchedule(format!(
                    "duplicate tier threshold {}",
                    pair[0].min_quantity
                )));
            }
            if pair[1].percent_off < pair[0].percent_off {
                return Err(PricingError::InvalidSchedule(format!(
                    "tier at {} units discounts less than tier at {} units",
                    pair[1].min_quantity, pair[0].min_quantity
                )));
            }
        }

        tiers.reverse();
        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[DiscountTier] {
        &self.tiers
    }

    /// Fraction taken off the base price for `quantity` units.
    pub fn discount_rate(&self, quantity: i64) -> Result<Decimal, PricingError> {
        if quantity <= 0 {
            return Err(PricingError::InvalidQuantity(quantity));
        }

        Ok(self
            .tiers
            .iter()
            .find(|t| quantity >= t.min_quantity)
            .map(DiscountTier::discount_rate)
            .unwrap_or(Decimal::ZERO))
    }

    /// Discounted unit price, rounded to currency precision once at the end.
    pub fn unit_price(&self, base_price: Decimal, quantity: i64) -> Result<Decimal, PricingError> {
        if base_price.is_sign_negative() && !base_price.is_zero() {
            return Err(PricingError::NegativePrice(base_price));
        }

        let rate = self.discount_rate(quantity)?;
        Ok(to_currency(base_price * (Decimal::ONE - rate)))
    }

    pub fn quote(&self, base_price: Decimal, quantity: i64) -> Result<BulkQuote, PricingError> {
        let unit_price = self.unit_price(base_price, quantity)?;
        let discount_rate = self.discount_rate(quantity)?;
        // A total too large to carry cents is rejected rather than truncated
        let total_price = unit_price
            .checked_mul(Decimal::from(quantity))
            .map(to_currency)
            .filter(|total| total.scale() == CURRENCY_SCALE)
            .ok_or(PricingError::TotalOverflow { unit_price, quantity })?;

        Ok(BulkQuote {
            quantity,
            base_price: to_currency(base_price),
            unit_price,
            discount_rate,
            total_price,
        })
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PricingError {
    #[error("Quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),

    #[error("Base price must not be negative, got {0}")]
    NegativePrice(Decimal),

    #[error("Invalid discount schedule: {0}")]
    InvalidSchedule(String),

    #[error("Total for {quantity} x {unit_price} exceeds representable precision")]
    TotalOverflow { unit_price: Decimal, quantity: i64 },
}
