use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

const HUNDRED: Decimal = dec!(100);

// Overflow saturates at `Decimal::MAX` / `Decimal::MIN`.

/// `amount * pct / 100`
pub fn percent_of(amount: Money, pct: Rate) -> Money {
    match amount.checked_mul(pct) {
        Some(product) => product / HUNDRED,
        None => amount.saturating_mul(pct / HUNDRED),
    }
}

/// `numerator / denominator * 100`, or zero when the denominator is not positive.
pub fn ratio_pct(numerator: Decimal, denominator: Decimal) -> Rate {
    if denominator > Decimal::ZERO {
        saturating_div(numerator, denominator).saturating_mul(HUNDRED)
    } else {
        Decimal::ZERO
    }
}

/// `numerator / denominator`, zero for a zero denominator.
pub fn saturating_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    match numerator.checked_div(denominator) {
        Some(quotient) => quotient,
        None if numerator.is_sign_negative() == denominator.is_sign_negative() => Decimal::MAX,
        None => Decimal::MIN,
    }
}

/// One period's growth multiplier: `1 + pct / 100`.
pub fn growth_factor(pct: Rate) -> Decimal {
    Decimal::ONE.saturating_add(pct / HUNDRED)
}

/// Future value of `amount` after `periods` years of compound growth at `pct`.
///
/// Multiplies period by period instead of using a fractional power so the
/// result matches an iterative year-by-year roll forward exactly.
pub fn compound(amount: Money, pct: Rate, periods: u32) -> Money {
    let factor = growth_factor(pct);
    let mut value = amount;
    for _ in 0..periods {
        value = value.saturating_mul(factor);
    }
    value
}
