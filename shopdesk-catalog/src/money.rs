use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places prices are stored and displayed with.
pub const CURRENCY_SCALE: u32 = 2;

/// Round an amount to currency precision (half away from zero) with a fixed scale,
/// so `12.5` becomes `12.50` and `84.995` becomes `85.00`.
pub fn to_currency(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_SCALE);
    rounded
}
