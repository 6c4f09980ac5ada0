//! Display formatting in Swiss conventions (`CHF 1’234.50`, `5.50%`).

use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Money, Rate};

const CURRENCY: &str = "CHF";
const LOCALE: Locale = Locale::de_CH;

/// Currency with two decimals, e.g. `CHF 1’234.50`.
pub fn format_chf(value: Money) -> String {
    format!("{CURRENCY} {}", format_decimal(value, 2))
}

/// Currency without decimals, e.g. `CHF 1’235`.
pub fn format_chf_compact(value: Money) -> String {
    format!("{CURRENCY} {}", format_decimal(value, 0))
}

/// Percentage with a fixed number of decimals, no grouping, e.g. `5.50%`.
pub fn format_percent(value: Rate, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.prec$}%", prec = decimals as usize)
}

/// Grouped number with up to three decimals, trailing zeros dropped.
pub fn format_number(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format_decimal(rounded, rounded.scale())
}

/// Round to `decimals` and group the integer part with the locale separator.
pub fn format_decimal(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let abs = rounded.abs();
    let int_part = abs.trunc().to_u128().unwrap_or_default();
    let mut out = int_part.to_formatted_string(&LOCALE);

    if decimals > 0 {
        let fixed = format!("{abs:.prec$}", prec = decimals as usize);
        if let Some((_, frac)) = fixed.split_once('.') {
            out.push('.');
            out.push_str(frac);
        }
    }

    if negative {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn sep() -> &'static str {
        LOCALE.separator()
    }

    #[test]
    fn test_format_chf() {
        assert_eq!(format_chf(dec!(1234.5)), format!("CHF 1{}234.50", sep()));
        assert_eq!(format_chf(dec!(0)), "CHF 0.00");
        assert_eq!(format_chf(dec!(999.999)), format!("CHF 1{}000.00", sep()));
        assert_eq!(
            format_chf(dec!(-480000)),
            format!("CHF -480{}000.00", sep())
        );
    }

    #[test]
    fn test_format_chf_compact() {
        assert_eq!(
            format_chf_compact(dec!(1234567.5)),
            format!("CHF 1{s}234{s}568", s = sep())
        );
        assert_eq!(format_chf_compact(dec!(-0.4)), "CHF 0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(5.5), 2), "5.50%");
        assert_eq!(format_percent(dec!(8.392), 1), "8.4%");
        assert_eq!(format_percent(dec!(-1.005), 2), "-1.01%");
        assert_eq!(format_percent(dec!(3), 0), "3%");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(dec!(26400)), format!("26{}400", sep()));
        assert_eq!(format_number(dec!(1.25400)), "1.254");
        assert_eq!(format_number(dec!(12)), "12");
    }
}
