use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::metrics::compute_metrics;
use crate::property::{FinancialField, PropertyInput};
use crate::time_value::{compound, growth_factor, ratio_pct};
use crate::types::{Money, Rate};

/// Years reserved up front; longer horizons grow the vector as they go.
const PREALLOCATED_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Growth assumptions for a multi-year simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionAssumptions {
    pub horizon_years: u32,
    /// Annual property value growth, percent
    pub appreciation_pct: Rate,
    /// Annual gross rent growth, percent
    pub rent_growth_pct: Rate,
}

impl Default for ProjectionAssumptions {
    fn default() -> Self {
        Self {
            horizon_years: 10,
            appreciation_pct: dec!(2),
            rent_growth_pct: dec!(2),
        }
    }
}

/// State at the end of one simulated year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionYear {
    pub year: u32,
    pub property_value: Money,
    pub remaining_debt: Money,
    /// Property value − remaining debt
    pub equity: Money,
    pub gross_rent: Money,
    pub cash_flow: Money,
    pub after_tax_cash_flow: Money,
    pub cumulative_after_tax_cash_flow: Money,
    /// Equity + cumulative after-tax cash flow
    pub total_wealth: Money,
    /// Total wealth gain over the initial equity, percent
    pub roi: Rate,
    pub after_tax_equity_yield: Rate,
}

/// End-of-horizon totals for a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    /// Sum of pre-tax cash flows over all years
    pub total_cash_flow: Money,
    /// Final property value − purchase price
    pub total_appreciation: Money,
    /// Final equity − initial equity
    pub equity_growth: Money,
    /// (total cash flow + appreciation) / initial equity, percent
    pub roi: Rate,
    pub final_property_value: Money,
    pub final_remaining_debt: Money,
    pub final_equity: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate value, debt, equity and cash flow year by year.
///
/// Each year's metrics come from a working copy of the property whose rent
/// grows by `rent_growth_pct` and whose purchase price is replaced by the
/// prior year's appreciated value. The reported property value compounds
/// from the original purchase price. Debt falls by that year's flat
/// amortization and never below zero. Amounts saturate at the `Decimal`
/// bounds on long, fast-growing horizons.
pub fn project_years(
    property: &PropertyInput,
    assumptions: &ProjectionAssumptions,
) -> Vec<ProjectionYear> {
    let inputs = &property.financials;
    let purchase_price = inputs.value(FinancialField::PurchasePrice);
    let acquisition_costs = inputs.value(FinancialField::AcquisitionCosts);
    let initial_equity = inputs.value(FinancialField::Equity);

    let mut remaining_debt = purchase_price
        .saturating_add(acquisition_costs)
        .saturating_sub(initial_equity);
    let mut cumulative_after_tax_cash_flow = Decimal::ZERO;
    let mut working = property.clone();
    let rent_factor = growth_factor(assumptions.rent_growth_pct);

    debug!(
        "projecting '{}' over {} years (appreciation {}%, rent growth {}%)",
        property.name,
        assumptions.horizon_years,
        assumptions.appreciation_pct,
        assumptions.rent_growth_pct
    );

    let mut years = Vec::with_capacity(assumptions.horizon_years.min(PREALLOCATED_YEARS) as usize);
    for year in 1..=assumptions.horizon_years {
        let metrics = compute_metrics(&working);

        let property_value = compound(purchase_price, assumptions.appreciation_pct, year);
        remaining_debt = remaining_debt
            .saturating_sub(metrics.amortization_amount)
            .max(Decimal::ZERO);
        let equity = property_value.saturating_sub(remaining_debt);

        cumulative_after_tax_cash_flow =
            cumulative_after_tax_cash_flow.saturating_add(metrics.after_tax_cash_flow);
        let total_wealth = equity.saturating_add(cumulative_after_tax_cash_flow);
        let roi = ratio_pct(total_wealth.saturating_sub(initial_equity), initial_equity);

        years.push(ProjectionYear {
            year,
            property_value,
            remaining_debt,
            equity,
            gross_rent: metrics.annual_gross_rent,
            cash_flow: metrics.cash_flow,
            after_tax_cash_flow: metrics.after_tax_cash_flow,
            cumulative_after_tax_cash_flow,
            total_wealth,
            roi,
            after_tax_equity_yield: metrics.after_tax_equity_yield,
        });

        working
            .financials
            .set(
                FinancialField::AnnualGrossRent,
                metrics.annual_gross_rent.saturating_mul(rent_factor),
            );
        working
            .financials
            .set(FinancialField::PurchasePrice, property_value);
    }

    years
}

/// Summarise a projection; `None` when it has no years.
pub fn summarize_projection(
    property: &PropertyInput,
    years: &[ProjectionYear],
) -> Option<ProjectionSummary> {
    let last = years.last()?;
    let purchase_price = property.financials.value(FinancialField::PurchasePrice);
    let initial_equity = property.financials.value(FinancialField::Equity);

    let total_cash_flow = years
        .iter()
        .fold(Decimal::ZERO, |acc, y| acc.saturating_add(y.cash_flow));
    let total_appreciation = last.property_value.saturating_sub(purchase_price);

    Some(ProjectionSummary {
        total_cash_flow,
        total_appreciation,
        equity_growth: last.equity.saturating_sub(initial_equity),
        roi: ratio_pct(
            total_cash_flow.saturating_add(total_appreciation),
            initial_equity,
        ),
        final_property_value: last.property_value,
        final_remaining_debt: last.remaining_debt,
        final_equity: last.equity,
    })
}
