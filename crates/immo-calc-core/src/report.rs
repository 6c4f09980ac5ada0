use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::break_even::{compute_break_even, BreakEvenResult};
use crate::evaluation::{evaluate_snapshot, MetricAssessment};
use crate::format::{format_chf, format_decimal};
use crate::metrics::{compute_metrics, MetricsSnapshot};
use crate::property::{FinancialField, PropertyInput};
use crate::types::{with_metadata, ComputationOutput};

/// Everything the detail view shows for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub metrics: MetricsSnapshot,
    pub break_even: BreakEvenResult,
    pub evaluations: Vec<MetricAssessment>,
}

/// Metrics, break-even figures and ratings for a property, with warnings
/// for figures that need the reader's attention.
pub fn analyze_property(property: &PropertyInput) -> ComputationOutput<PropertyReport> {
    let start = Instant::now();

    let metrics = compute_metrics(property);
    let break_even = compute_break_even(property);
    let evaluations = evaluate_snapshot(&metrics);
    let purchase_price = property.financials.value(FinancialField::PurchasePrice);
    let warnings = collect_warnings(purchase_price, &metrics, &break_even);

    let report = PropertyReport {
        id: property.id.clone(),
        name: property.name.clone(),
        metrics,
        break_even,
        evaluations,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Swiss residential rental analysis (pre-tax and after-tax cash flow)",
        &property.financials,
        warnings,
        elapsed,
        report,
    )
}

fn collect_warnings(
    purchase_price: Decimal,
    metrics: &MetricsSnapshot,
    break_even: &BreakEvenResult,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if metrics.acquisition_cost.is_zero() && metrics.annual_gross_rent.is_zero() {
        warnings.push("No purchase price or rent entered; all figures are zero".to_string());
    } else if purchase_price.is_zero() {
        warnings.push("Purchase price is zero; yields are reported as 0".to_string());
    } else if purchase_price < Decimal::ZERO {
        warnings.push("Purchase price is negative; yields are reported as 0".to_string());
    }

    if metrics.debt_capital < Decimal::ZERO {
        warnings.push(format!(
            "Equity exceeds acquisition cost by {}; interest and amortization are negative",
            format_chf(-metrics.debt_capital)
        ));
    }

    if metrics.cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative pre-tax cash flow of {} per year",
            format_chf(metrics.cash_flow)
        ));
    }

    let debt_service = metrics
        .annual_interest
        .saturating_add(metrics.amortization_amount);
    if debt_service > Decimal::ZERO && metrics.dscr < Decimal::ONE {
        warnings.push(format!(
            "DSCR of {} is below 1.0; net rent does not cover debt service",
            format_decimal(metrics.dscr, 2)
        ));
    }

    if break_even.break_even_rent_annual.is_none() {
        warnings.push("Vacancy rate of 100% or more; break-even rent is undefined".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::FinancialField;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

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

    #[test]
    fn test_healthy_property_has_no_warnings() {
        let out = analyze_property(&zurich_flat());
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
        assert_eq!(out.result.name, "Zürich Oerlikon");
        assert_eq!(out.result.metrics.cash_flow, dec!(8392));
        assert_eq!(out.result.evaluations.len(), 5);
        assert!(out.result.break_even.is_viable);
    }

    #[test]
    fn test_warnings_for_stressed_property() {
        let mut p = zurich_flat();
        p.financials.set(FinancialField::InterestRatePct, dec!(6));
        p.financials.set(FinancialField::VacancyRatePct, dec!(100));
        let out = analyze_property(&p);

        assert!(out.warnings.iter().any(|w| w.starts_with("Negative pre-tax cash flow")));
        assert!(out.warnings.iter().any(|w| w.starts_with("DSCR of")));
        assert!(out.warnings.iter().any(|w| w.contains("break-even rent is undefined")));
    }

    #[test]
    fn test_over_capitalised_warning() {
        let mut p = zurich_flat();
        p.financials.set(FinancialField::Equity, dec!(600000));
        let out = analyze_property(&p);
        assert!(out.warnings.iter().any(|w| w.starts_with("Equity exceeds acquisition cost")));
    }

    #[test]
    fn test_envelope_echoes_inputs() {
        let out = analyze_property(&zurich_flat());
        assert_eq!(out.assumptions["purchase_price"], "480000");
        assert_eq!(out.metadata.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_empty_record_warning() {
        let out = analyze_property(&PropertyInput::new("blank"));
        assert_eq!(
            out.warnings,
            vec!["No purchase price or rent entered; all figures are zero".to_string()]
        );
    }

    #[test]
    fn test_zero_price_warning_ignores_closing_costs() {
        let mut p = zurich_flat();
        p.financials.set(FinancialField::PurchasePrice, dec!(0));
        p.financials.set(FinancialField::AcquisitionCosts, dec!(20000));
        let out = analyze_property(&p);
        assert!(out
            .warnings
            .contains(&"Purchase price is zero; yields are reported as 0".to_string()));

        let mut q = zurich_flat();
        q.financials.set(FinancialField::AcquisitionCosts, dec!(-600000));
        let out = analyze_property(&q);
        assert!(!out.warnings.iter().any(|w| w.starts_with("Purchase price is")));
    }
}
