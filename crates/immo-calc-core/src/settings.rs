use std::collections::BTreeSet;

use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::metrics::per_month;
use crate::property::{FinancialField, FinancialInputs, PropertyInput};
use crate::time_value::percent_of;
use crate::types::{Money, Rate};
use crate::ImmoCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Defaults used to pre-fill a new property from its purchase price.
///
/// Any field missing from a settings document keeps its Swiss default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Closing costs as a share of the purchase price
    pub closing_costs_pct: Rate,
    /// Down payment as a share of the purchase price
    pub equity_pct: Rate,
    pub interest_rate_pct: Rate,
    pub amortization_rate_pct: Rate,
    /// Running costs as a share of the purchase price
    pub operating_costs_pct: Rate,
    /// Management as a share of the estimated annual rent
    pub management_pct: Rate,
    /// Reserves as a share of the purchase price
    pub reserves_pct: Rate,
    pub vacancy_rate_pct: Rate,
    pub personal_tax_rate_pct: Rate,
    pub depreciation_rate_pct: Rate,
    pub depreciation_years: Decimal,
    /// Gross yield used to estimate the rent
    pub gross_yield_pct: Rate,
    pub auto_fill_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            closing_costs_pct: dec!(7.5),
            equity_pct: dec!(25),
            interest_rate_pct: dec!(2.5),
            amortization_rate_pct: dec!(1.0),
            operating_costs_pct: dec!(1.2),
            management_pct: dec!(4.0),
            reserves_pct: dec!(0.8),
            vacancy_rate_pct: dec!(2.0),
            personal_tax_rate_pct: dec!(30),
            depreciation_rate_pct: dec!(2.5),
            depreciation_years: dec!(40),
            gross_yield_pct: dec!(4.5),
            auto_fill_enabled: true,
        }
    }
}

impl Settings {
    /// Overlay a JSON settings document on the defaults.
    pub fn from_json(json: &str) -> ImmoCalcResult<Settings> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Headline figures shown next to the settings form for a sample price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsPreview {
    pub purchase_price: Money,
    pub values: FinancialInputs,
    /// Purchase price + closing costs
    pub total_investment: Money,
    /// Purchase price − equity
    pub debt: Money,
    /// Debt × interest rate, whole francs
    pub annual_interest: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive every fillable field from a purchase price.
///
/// Amounts are rounded to whole francs; rates are copied from `settings`.
/// A zero price yields an empty set of values; a negative price is carried
/// through and produces negative amounts.
pub fn auto_fill_values(purchase_price: Money, settings: &Settings) -> FinancialInputs {
    let mut values = FinancialInputs::default();
    if purchase_price.is_zero() {
        return values;
    }

    let annual_rent = whole_francs(percent_of(purchase_price, settings.gross_yield_pct));

    values.set(
        FinancialField::AcquisitionCosts,
        whole_francs(percent_of(purchase_price, settings.closing_costs_pct)),
    );
    values.set(
        FinancialField::Equity,
        whole_francs(percent_of(purchase_price, settings.equity_pct)),
    );
    values.set(FinancialField::InterestRatePct, settings.interest_rate_pct);
    values.set(FinancialField::AmortizationRatePct, settings.amortization_rate_pct);
    values.set(FinancialField::AnnualGrossRent, annual_rent);
    values.set(FinancialField::MonthlyGrossRent, whole_francs(per_month(annual_rent)));
    values.set(
        FinancialField::AnnualOperatingCosts,
        whole_francs(percent_of(purchase_price, settings.operating_costs_pct)),
    );
    values.set(
        FinancialField::ManagementCostAnnual,
        whole_francs(percent_of(annual_rent, settings.management_pct)),
    );
    values.set(
        FinancialField::ReservesAnnual,
        whole_francs(percent_of(purchase_price, settings.reserves_pct)),
    );
    values.set(FinancialField::VacancyRatePct, settings.vacancy_rate_pct);
    values.set(FinancialField::PersonalTaxRatePct, settings.personal_tax_rate_pct);
    values.set(FinancialField::DepreciationRatePct, settings.depreciation_rate_pct);
    values.set(FinancialField::DepreciationYears, settings.depreciation_years);

    values
}

/// Fill the blank fields of `property` from its purchase price.
///
/// Returns the filled copy and the fields that were filled. Fields the user
/// already entered are never overwritten; nothing happens when auto-fill is
/// disabled.
pub fn apply_auto_fill(
    property: &PropertyInput,
    settings: &Settings,
) -> (PropertyInput, BTreeSet<FinancialField>) {
    let mut filled = property.clone();
    let mut filled_fields = BTreeSet::new();
    if !settings.auto_fill_enabled {
        return (filled, filled_fields);
    }

    let purchase_price = property.financials.value(FinancialField::PurchasePrice);
    let values = auto_fill_values(purchase_price, settings);

    for field in values.present_fields() {
        if !filled.financials.is_blank(field) {
            continue;
        }
        if let Some(value) = values.get(field).cloned() {
            filled.financials.set(field, value);
            filled_fields.insert(field);
        }
    }

    debug!(
        "auto-filled {} fields for '{}' from purchase price {}",
        filled_fields.len(),
        property.name,
        purchase_price
    );

    (filled, filled_fields)
}

/// Sample the effect of `settings` on one purchase price.
pub fn preview(purchase_price: Money, settings: &Settings) -> SettingsPreview {
    let values = auto_fill_values(purchase_price, settings);
    let closing_costs = values.value(FinancialField::AcquisitionCosts);
    let equity = values.value(FinancialField::Equity);
    let debt = purchase_price.saturating_sub(equity);

    SettingsPreview {
        purchase_price,
        total_investment: purchase_price.saturating_add(closing_costs),
        debt,
        annual_interest: whole_francs(percent_of(debt, settings.interest_rate_pct)),
        values,
    }
}

fn whole_francs(amount: Money) -> Money {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_auto_fill_values_for_one_million() {
        let v = auto_fill_values(dec!(1000000), &Settings::default());

        assert_eq!(v.value(FinancialField::AcquisitionCosts), dec!(75000));
        assert_eq!(v.value(FinancialField::Equity), dec!(250000));
        assert_eq!(v.value(FinancialField::AnnualGrossRent), dec!(45000));
        assert_eq!(v.value(FinancialField::MonthlyGrossRent), dec!(3750));
        assert_eq!(v.value(FinancialField::AnnualOperatingCosts), dec!(12000));
        assert_eq!(v.value(FinancialField::ManagementCostAnnual), dec!(1800));
        assert_eq!(v.value(FinancialField::ReservesAnnual), dec!(8000));
        assert_eq!(v.value(FinancialField::InterestRatePct), dec!(2.5));
        assert_eq!(v.value(FinancialField::VacancyRatePct), dec!(2));
        assert_eq!(v.value(FinancialField::DepreciationYears), dec!(40));
        assert_eq!(v.present_fields().len(), 13);
    }

    #[test]
    fn test_auto_fill_rounds_half_away_from_zero() {
        // 4.5% of 333333 = 14999.985 → 15000; 15000 / 12 = 1250
        let v = auto_fill_values(dec!(333333), &Settings::default());
        assert_eq!(v.value(FinancialField::AnnualGrossRent), dec!(15000));
        assert_eq!(v.value(FinancialField::MonthlyGrossRent), dec!(1250));
        // management is derived from the rounded rent: 4% of 15000
        assert_eq!(v.value(FinancialField::ManagementCostAnnual), dec!(600));
        // 7.5% of 333333 = 24999.975
        assert_eq!(v.value(FinancialField::AcquisitionCosts), dec!(25000));
    }

    #[test]
    fn test_zero_price_gives_nothing() {
        assert_eq!(
            auto_fill_values(Decimal::ZERO, &Settings::default()),
            FinancialInputs::default()
        );
    }

    #[test]
    fn test_negative_price_is_filled_not_skipped() {
        let v = auto_fill_values(dec!(-100000), &Settings::default());
        assert_eq!(v.present_fields().len(), 13);
        assert_eq!(v.value(FinancialField::AcquisitionCosts), dec!(-7500));
        assert_eq!(v.value(FinancialField::Equity), dec!(-25000));
        assert_eq!(v.value(FinancialField::AnnualGrossRent), dec!(-4500));
        assert_eq!(v.value(FinancialField::InterestRatePct), dec!(2.5));
    }

    #[test]
    fn test_apply_auto_fill_keeps_user_values() {
        let mut p = PropertyInput::new("Bern Länggasse");
        p.financials.set(FinancialField::PurchasePrice, "800000");
        p.financials.set(FinancialField::Equity, dec!(300000));
        p.financials.set(FinancialField::AnnualGrossRent, "");

        let (filled, fields) = apply_auto_fill(&p, &Settings::default());

        assert_eq!(filled.financials.value(FinancialField::Equity), dec!(300000));
        assert!(!fields.contains(&FinancialField::Equity));
        assert!(!fields.contains(&FinancialField::PurchasePrice));
        // blank string counts as empty
        assert!(fields.contains(&FinancialField::AnnualGrossRent));
        assert_eq!(
            filled.financials.value(FinancialField::AnnualGrossRent),
            dec!(36000)
        );
        assert_eq!(fields.len(), 12);
    }

    #[test]
    fn test_apply_auto_fill_disabled() {
        let mut p = PropertyInput::new("x");
        p.financials.set(FinancialField::PurchasePrice, dec!(500000));
        let settings = Settings {
            auto_fill_enabled: false,
            ..Settings::default()
        };
        let (filled, fields) = apply_auto_fill(&p, &settings);
        assert_eq!(filled, p);
        assert!(fields.is_empty());
    }

    #[test]
    fn test_preview() {
        let pv = preview(dec!(1000000), &Settings::default());
        assert_eq!(pv.total_investment, dec!(1075000));
        assert_eq!(pv.debt, dec!(750000));
        assert_eq!(pv.annual_interest, dec!(18750));
    }

    #[test]
    fn test_partial_settings_document() {
        let s = Settings::from_json(r#"{"equity_pct": 20, "auto_fill_enabled": false}"#).unwrap();
        assert_eq!(s.equity_pct, dec!(20));
        assert!(!s.auto_fill_enabled);
        assert_eq!(s.closing_costs_pct, dec!(7.5));

        assert!(Settings::from_json("{not json").is_err());
    }
}
