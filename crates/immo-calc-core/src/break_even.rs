use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::metrics::{compute_metrics, per_month};
use crate::property::{FinancialField, PropertyInput};
use crate::time_value::{growth_factor, saturating_div};
use crate::types::{Money, Rate, Years};

/// Minimum after-tax equity yield (percent) for an investment to count as viable.
pub const TARGET_YIELD_PCT: Rate = dec!(6.0);

/// Appreciation assumed when payback includes unrealised value gains.
pub const BREAK_EVEN_APPRECIATION_PCT: Rate = dec!(2);

/// Upper bound on the payback search.
pub const MAX_PAYBACK_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Qualitative verdict derived from viability and payback time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profitability {
    NotViable,
    /// Payback in under 10 years
    VeryProfitable,
    /// Payback in under 20 years
    Profitable,
    LongTermProfitable,
}

/// Break-even figures for one property. `None` means "never" / undefined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenResult {
    /// Minimum gross rent covering interest and running costs at the
    /// entered vacancy rate; `None` when vacancy is 100% or more
    pub break_even_rent_annual: Option<Money>,
    pub break_even_rent_monthly: Option<Money>,
    /// Equity / after-tax cash flow; `None` when cash flow is not positive
    pub years_to_payback: Option<Years>,
    pub target_yield_pct: Rate,
    /// Price at which net rent yields exactly the target yield
    pub break_even_purchase_price: Money,
    /// Break-even price − purchase price (positive: priced below fair value)
    pub price_gap_to_market: Money,
    /// Payback counting value appreciation; `None` if not reached in 100 years
    pub years_to_payback_with_appreciation: Option<u32>,
    pub is_viable: bool,
    pub profitability: Profitability,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive break-even rent, price and payback horizons for a property.
pub fn compute_break_even(property: &PropertyInput) -> BreakEvenResult {
    let metrics = compute_metrics(property);
    let inputs = &property.financials;
    let purchase_price = inputs.value(FinancialField::PurchasePrice);
    let acquisition_cost =
        purchase_price.saturating_add(inputs.value(FinancialField::AcquisitionCosts));
    let equity = inputs.value(FinancialField::Equity);
    let vacancy_rate_pct = inputs.value(FinancialField::VacancyRatePct);

    let fixed_costs = metrics
        .annual_interest
        .saturating_add(metrics.annual_operating_costs)
        .saturating_add(metrics.management_cost_annual)
        .saturating_add(metrics.reserves_annual);
    let occupancy = Decimal::ONE.saturating_sub(vacancy_rate_pct / dec!(100));
    let break_even_rent_annual = if occupancy > Decimal::ZERO {
        Some(saturating_div(fixed_costs, occupancy))
    } else {
        warn!(
            "vacancy rate {vacancy_rate_pct}% leaves no occupied share; break-even rent undefined"
        );
        None
    };

    // A quotient beyond the `Decimal` range also reads as "never".
    let years_to_payback = if metrics.after_tax_cash_flow > Decimal::ZERO {
        equity.checked_div(metrics.after_tax_cash_flow)
    } else {
        None
    };

    let break_even_purchase_price =
        saturating_div(metrics.net_annual_rent, TARGET_YIELD_PCT / dec!(100));

    let years_to_payback_with_appreciation = payback_years_with_appreciation(
        equity,
        metrics.after_tax_cash_flow,
        acquisition_cost,
        BREAK_EVEN_APPRECIATION_PCT,
    );

    let is_viable = metrics.after_tax_equity_yield > TARGET_YIELD_PCT;

    BreakEvenResult {
        break_even_rent_annual,
        break_even_rent_monthly: break_even_rent_annual.map(per_month),
        years_to_payback,
        target_yield_pct: TARGET_YIELD_PCT,
        break_even_purchase_price,
        price_gap_to_market: break_even_purchase_price.saturating_sub(purchase_price),
        years_to_payback_with_appreciation,
        is_viable,
        profitability: classify_profitability(is_viable, years_to_payback),
    }
}

/// First year in which accumulated cash flow plus the unrealised gain on
/// `base_value` reaches `equity`, growing the value by `appreciation_pct`
/// per year. Gives up after [`MAX_PAYBACK_YEARS`].
pub fn payback_years_with_appreciation(
    equity: Money,
    annual_cash_flow: Money,
    base_value: Money,
    appreciation_pct: Rate,
) -> Option<u32> {
    let factor = growth_factor(appreciation_pct);
    let mut cumulative_cash_flow = Decimal::ZERO;
    let mut current_value = base_value;

    for year in 1..=MAX_PAYBACK_YEARS {
        cumulative_cash_flow = cumulative_cash_flow.saturating_add(annual_cash_flow);
        current_value = current_value.saturating_mul(factor);

        let gain = cumulative_cash_flow.saturating_add(current_value.saturating_sub(base_value));
        if gain >= equity {
            return Some(year);
        }
    }
    None
}

fn classify_profitability(is_viable: bool, years_to_payback: Option<Years>) -> Profitability {
    if !is_viable {
        return Profitability::NotViable;
    }
    match years_to_payback {
        Some(y) if y < dec!(10) => Profitability::VeryProfitable,
        Some(y) if y < dec!(20) => Profitability::Profitable,
        _ => Profitability::LongTermProfitable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zurich_flat() -> PropertyInput {
        let mut p = PropertyInput::new("Zürich Oerlikon");
        let f = &mut p.financials;
        f.set(FinancialField::PurchasePrice, dec!(480000));
        f.set(FinancialField::AcquisitionCosts, dec!(36000));
        f.set(FinancialField::Equity, dec!(100000));
        f.set(FinancialField::InterestRatePct, dec!(3));
        f.set(FinancialField::AmortizationRatePct, dec!(1));
        f.set(FinancialField::AnnualGrossRent, dec!(26400));
        f.set(FinancialField::AnnualOperatingCosts, dec!(3000));
        f.set(FinancialField::ManagementCostAnnual, dec!(1000));
        f.set(FinancialField::ReservesAnnual, dec!(1000));
        f.set(FinancialField::VacancyRatePct, dec!(2));
        p
    }

    fn assert_close(actual: Decimal, expected: Decimal) {
        assert!(
            (actual - expected).abs() < dec!(0.000001),
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_break_even_purchase_price() {
        let be = compute_break_even(&zurich_flat());
        // 20872 / 0.06
        assert_close(be.break_even_purchase_price, dec!(20872) / dec!(0.06));
        assert!((be.break_even_purchase_price - dec!(347866.67)).abs() < dec!(0.01));
        assert_eq!(
            be.price_gap_to_market,
            be.break_even_purchase_price - dec!(480000)
        );
        assert!(be.price_gap_to_market < Decimal::ZERO);
    }

    #[test]
    fn test_break_even_rent() {
        let be = compute_break_even(&zurich_flat());
        // (12480 + 3000 + 1000 + 1000) / 0.98
        let expected = dec!(17480) / dec!(0.98);
        assert_close(be.break_even_rent_annual.unwrap(), expected);
        assert_close(be.break_even_rent_monthly.unwrap(), expected / dec!(12));
    }

    #[test]
    fn test_full_vacancy_has_no_break_even_rent() {
        let mut p = zurich_flat();
        p.financials.set(FinancialField::VacancyRatePct, dec!(100));
        let be = compute_break_even(&p);
        assert_eq!(be.break_even_rent_annual, None);
        assert_eq!(be.break_even_rent_monthly, None);

        p.financials.set(FinancialField::VacancyRatePct, dec!(120));
        assert_eq!(compute_break_even(&p).break_even_rent_annual, None);
    }

    #[test]
    fn test_payback_and_viability() {
        let be = compute_break_even(&zurich_flat());
        // 100000 / 8392
        assert_close(be.years_to_payback.unwrap(), dec!(100000) / dec!(8392));
        // after-tax equity yield 8.392% > 6%
        assert!(be.is_viable);
        assert_eq!(be.profitability, Profitability::Profitable);
        assert_eq!(be.target_yield_pct, dec!(6));
    }

    #[test]
    fn test_negative_cash_flow_never_pays_back() {
        let mut p = zurich_flat();
        p.financials.set(FinancialField::InterestRatePct, dec!(8));
        let be = compute_break_even(&p);
        assert_eq!(be.years_to_payback, None);
        assert!(!be.is_viable);
        assert_eq!(be.profitability, Profitability::NotViable);
    }

    #[test]
    fn test_payback_with_appreciation_search() {
        // 1000/yr cash flow + 2% on 100000 base: year 1 gain = 1000 + 2000
        assert_eq!(
            payback_years_with_appreciation(dec!(3000), dec!(1000), dec!(100000), dec!(2)),
            Some(1)
        );
        // year 2: 2000 + 4040 = 6040 ≥ 5000
        assert_eq!(
            payback_years_with_appreciation(dec!(5000), dec!(1000), dec!(100000), dec!(2)),
            Some(2)
        );
    }

    #[test]
    fn test_payback_with_appreciation_capped() {
        assert_eq!(
            payback_years_with_appreciation(dec!(100000), dec!(-5000), dec!(0), dec!(2)),
            None
        );
    }

    #[test]
    fn test_zurich_payback_with_appreciation() {
        let be = compute_break_even(&zurich_flat());
        // year 5: 5 * 8392 + 516000 * (1.02^5 - 1) ≈ 41960 + 53706 < 100000
        // year 6: 6 * 8392 + 516000 * (1.02^6 - 1) ≈ 50352 + 65100 ≥ 100000
        assert_eq!(be.years_to_payback_with_appreciation, Some(6));
    }

    #[test]
    fn test_unrepresentable_payback_reads_as_never() {
        let mut p = PropertyInput::new("tiny cash flow");
        p.financials.set(FinancialField::Equity, "5e28");
        p.financials.set(FinancialField::AnnualGrossRent, "1e-20");
        let be = compute_break_even(&p);

        assert!(be.years_to_payback.is_none());
        assert_eq!(be.profitability, Profitability::NotViable);
    }

    #[test]
    fn test_huge_inputs_stay_total() {
        let mut p = zurich_flat();
        p.financials.set(FinancialField::PurchasePrice, "7e28");
        p.financials.set(FinancialField::AnnualOperatingCosts, "7e28");
        let be = compute_break_even(&p);

        assert!(be.break_even_rent_annual.is_some());
        assert_eq!(be.years_to_payback, None);
        assert!(be.price_gap_to_market < Decimal::ZERO);
    }
}
