use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::property::{ParsedInputs, PropertyInput};
use crate::time_value::{percent_of, ratio_pct, saturating_div};
use crate::types::{Money, Rate};

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Every derived figure for one property. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    // --- Capital structure ---
    /// Purchase price + closing costs
    pub acquisition_cost: Money,
    /// Acquisition cost − equity (negative when over-capitalised)
    pub debt_capital: Money,
    pub equity: Money,

    // --- Costs ---
    pub annual_interest: Money,
    /// Principal repaid per year at the flat amortization rate
    pub amortization_amount: Money,
    pub annual_operating_costs: Money,
    pub management_cost_annual: Money,
    pub reserves_annual: Money,
    pub vacancy_loss: Money,

    // --- Income ---
    pub annual_gross_rent: Money,
    /// Gross rent − operating costs − management − reserves − vacancy loss
    pub net_annual_rent: Money,

    // --- Cash flow (pre-tax) ---
    pub cash_flow: Money,
    pub monthly_cash_flow: Money,

    // --- Yields (percent) ---
    pub gross_yield: Rate,
    pub net_yield: Rate,
    pub equity_yield: Rate,
    /// Equity yield including principal paydown
    pub combined_yield: Rate,

    /// Net rent / (interest + amortization)
    pub dscr: Decimal,

    // --- Tax ---
    pub depreciation_amount: Money,
    pub taxable_result: Money,
    pub tax_owed: Money,
    pub after_tax_cash_flow: Money,
    pub after_tax_equity_yield: Rate,

    // --- Monthly views ---
    pub monthly_gross_rent: Money,
    pub monthly_net_rent: Money,
    pub monthly_after_tax_cash_flow: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the full metrics snapshot for a property.
///
/// Total over all inputs: ratios with a zero or negative denominator are 0,
/// and amounts beyond the `Decimal` range saturate at its bounds.
pub fn compute_metrics(property: &PropertyInput) -> MetricsSnapshot {
    compute_from_parsed(&property.financials.parsed())
}

/// Compute the snapshot from already-parsed inputs.
pub fn compute_from_parsed(p: &ParsedInputs) -> MetricsSnapshot {
    // --- Capital structure ---
    let acquisition_cost = p.purchase_price.saturating_add(p.acquisition_costs);
    let debt_capital = acquisition_cost.saturating_sub(p.equity);
    let annual_interest = percent_of(debt_capital, p.interest_rate_pct);

    // --- Income and costs ---
    let vacancy_loss = percent_of(p.annual_gross_rent, p.vacancy_rate_pct);
    let net_annual_rent = p
        .annual_gross_rent
        .saturating_sub(p.annual_operating_costs)
        .saturating_sub(p.management_cost_annual)
        .saturating_sub(p.reserves_annual)
        .saturating_sub(vacancy_loss);

    // --- Cash flow and yields ---
    let cash_flow = net_annual_rent.saturating_sub(annual_interest);
    let gross_yield = ratio_pct(p.annual_gross_rent, p.purchase_price);
    let net_yield = ratio_pct(net_annual_rent, p.purchase_price);
    let equity_yield = ratio_pct(cash_flow, p.equity);

    let amortization_amount = percent_of(debt_capital, p.amortization_rate_pct);
    let combined_yield = ratio_pct(cash_flow.saturating_add(amortization_amount), p.equity);

    // --- Debt service coverage ---
    let debt_service = annual_interest.saturating_add(amortization_amount);
    let dscr = if debt_service > Decimal::ZERO {
        saturating_div(net_annual_rent, debt_service)
    } else {
        Decimal::ZERO
    };

    // --- Tax ---
    // Losses produce no refund.
    let depreciation_amount = percent_of(p.purchase_price, p.depreciation_rate_pct);
    let taxable_result = net_annual_rent
        .saturating_sub(annual_interest)
        .saturating_sub(depreciation_amount);
    let tax_owed = if taxable_result > Decimal::ZERO {
        percent_of(taxable_result, p.personal_tax_rate_pct)
    } else {
        Decimal::ZERO
    };
    let after_tax_cash_flow = cash_flow.saturating_sub(tax_owed);
    let after_tax_equity_yield = ratio_pct(after_tax_cash_flow, p.equity);

    MetricsSnapshot {
        acquisition_cost,
        debt_capital,
        equity: p.equity,
        annual_interest,
        amortization_amount,
        annual_operating_costs: p.annual_operating_costs,
        management_cost_annual: p.management_cost_annual,
        reserves_annual: p.reserves_annual,
        vacancy_loss,
        annual_gross_rent: p.annual_gross_rent,
        net_annual_rent,
        cash_flow,
        monthly_cash_flow: cash_flow / MONTHS_PER_YEAR,
        gross_yield,
        net_yield,
        equity_yield,
        combined_yield,
        dscr,
        depreciation_amount,
        taxable_result,
        tax_owed,
        after_tax_cash_flow,
        after_tax_equity_yield,
        monthly_gross_rent: p.annual_gross_rent / MONTHS_PER_YEAR,
        monthly_net_rent: net_annual_rent / MONTHS_PER_YEAR,
        monthly_after_tax_cash_flow: after_tax_cash_flow / MONTHS_PER_YEAR,
    }
}

/// Annual figure spread evenly over twelve months.
pub fn per_month(annual: Money) -> Money {
    annual / MONTHS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::FinancialField;

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
    fn test_capital_structure_and_cash_flow() {
        let m = compute_metrics(&zurich_flat());

        assert_eq!(m.acquisition_cost, dec!(516000));
        assert_eq!(m.debt_capital, dec!(416000));
        assert_eq!(m.annual_interest, dec!(12480));
        assert_eq!(m.vacancy_loss, dec!(528));
        // 26400 - 3000 - 1000 - 1000 - 528
        assert_eq!(m.net_annual_rent, dec!(20872));
        assert_eq!(m.cash_flow, dec!(8392));
    }

    #[test]
    fn test_yields() {
        let m = compute_metrics(&zurich_flat());

        assert_eq!(m.gross_yield, dec!(5.5));
        // 20872 / 480000 * 100
        assert_close(m.net_yield, dec!(4.348333));
        assert_eq!(m.equity_yield, dec!(8.392));
        // (8392 + 4160) / 100000 * 100
        assert_eq!(m.amortization_amount, dec!(4160));
        assert_eq!(m.combined_yield, dec!(12.552));
    }

    #[test]
    fn test_dscr() {
        let m = compute_metrics(&zurich_flat());
        // 20872 / (12480 + 4160)
        assert_close(m.dscr, dec!(20872) / dec!(16640));
    }

    #[test]
    fn test_tax_block_with_default_depreciation() {
        let mut p = zurich_flat();
        p.financials.set(FinancialField::PersonalTaxRatePct, dec!(30));
        let m = compute_metrics(&p);

        // 480000 * 2.5%
        assert_eq!(m.depreciation_amount, dec!(12000));
        // 20872 - 12480 - 12000 = -3608 → no tax
        assert_eq!(m.taxable_result, dec!(-3608));
        assert_eq!(m.tax_owed, Decimal::ZERO);
        assert_eq!(m.after_tax_cash_flow, m.cash_flow);
        assert_eq!(m.after_tax_equity_yield, m.equity_yield);
    }

    #[test]
    fn test_positive_taxable_result_is_taxed() {
        let mut p = zurich_flat();
        p.financials.set(FinancialField::PersonalTaxRatePct, dec!(25));
        p.financials.set(FinancialField::DepreciationRatePct, dec!(1));
        let m = compute_metrics(&p);

        // 20872 - 12480 - 4800 = 3592, 25% → 898
        assert_eq!(m.taxable_result, dec!(3592));
        assert_eq!(m.tax_owed, dec!(898));
        assert_eq!(m.after_tax_cash_flow, dec!(7494));
        assert_eq!(m.after_tax_equity_yield, dec!(7.494));
    }

    #[test]
    fn test_monthly_views() {
        let m = compute_metrics(&zurich_flat());
        assert_eq!(m.monthly_gross_rent, dec!(2200));
        assert_close(m.monthly_cash_flow, dec!(8392) / dec!(12));
        assert_eq!(per_month(dec!(24000)), dec!(2000));
    }

    #[test]
    fn test_zero_price_and_equity_guarded() {
        let mut p = zurich_flat();
        p.financials.set(FinancialField::PurchasePrice, "");
        p.financials.set(FinancialField::Equity, dec!(0));
        let m = compute_metrics(&p);

        assert_eq!(m.gross_yield, Decimal::ZERO);
        assert_eq!(m.net_yield, Decimal::ZERO);
        assert_eq!(m.equity_yield, Decimal::ZERO);
        assert_eq!(m.combined_yield, Decimal::ZERO);
        assert_eq!(m.after_tax_equity_yield, Decimal::ZERO);
    }

    #[test]
    fn test_over_capitalised_has_negative_debt_and_zero_dscr() {
        let mut p = zurich_flat();
        p.financials.set(FinancialField::Equity, dec!(600000));
        let m = compute_metrics(&p);

        assert_eq!(m.debt_capital, dec!(-84000));
        assert!(m.annual_interest < Decimal::ZERO);
        assert_eq!(m.dscr, Decimal::ZERO);
    }

    #[test]
    fn test_empty_record_is_all_zero() {
        let m = compute_metrics(&PropertyInput::new("empty"));
        assert_eq!(m.cash_flow, Decimal::ZERO);
        assert_eq!(m.dscr, Decimal::ZERO);
        assert_eq!(m.tax_owed, Decimal::ZERO);
    }

    #[test]
    fn test_extreme_magnitudes_saturate() {
        let mut p = zurich_flat();
        p.financials.set(FinancialField::PurchasePrice, "5e28");
        p.financials.set(FinancialField::AcquisitionCosts, "5e28");
        let m = compute_metrics(&p);

        assert_eq!(m.acquisition_cost, Decimal::MAX);
        assert_eq!(m.debt_capital, Decimal::MAX - dec!(100000));
        assert!(m.annual_interest > Decimal::ZERO);
        assert!(m.cash_flow < Decimal::ZERO);
    }

    #[test]
    fn test_tiny_price_saturates_yields() {
        let mut p = zurich_flat();
        p.financials.set(FinancialField::PurchasePrice, "1e-20");
        p.financials.set(FinancialField::AnnualGrossRent, "1e10");
        let m = compute_metrics(&p);

        assert_eq!(m.gross_yield, Decimal::MAX);
        assert_eq!(m.net_yield, Decimal::MAX);
    }
}
