use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ImmoCalcError;
use crate::parsing::{parse_number, RawNumber};
use crate::types::{Money, Rate};

/// Depreciation rate applied when none (or zero) is entered.
pub const DEFAULT_DEPRECIATION_RATE_PCT: Rate = dec!(2.5);

/// Depreciation period applied when none (or zero) is entered.
pub const DEFAULT_DEPRECIATION_YEARS: Decimal = dec!(40);

const ID_PREFIX: &str = "immo";
const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A property record as entered by the user or loaded from storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    /// Opaque identifier; generated on demand when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name (required by form validation, not by the calculators)
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Acquisition, financing, income, cost and tax fields
    #[serde(flatten)]
    pub financials: FinancialInputs,
    /// Descriptive fields carried through untouched
    #[serde(flatten)]
    pub details: PropertyDetails,
}

/// Every numeric field that feeds a calculation, in raw form.
///
/// Also serves as the shape of scenario overrides: a field left `None`
/// keeps the base property's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialInputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<RawNumber>,
    /// Closing costs (notary, land registry, transfer tax)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acquisition_costs: Option<RawNumber>,
    /// Cash down payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equity: Option<RawNumber>,
    /// Annual flat interest rate on the debt, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate_pct: Option<RawNumber>,
    /// Annual flat principal repayment rate on the debt, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amortization_rate_pct: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_gross_rent: Option<RawNumber>,
    /// Informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_gross_rent: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_operating_costs: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_cost_annual: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserves_annual: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vacancy_rate_pct: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_tax_rate_pct: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depreciation_rate_pct: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depreciation_years: Option<RawNumber>,
}

/// Names of the numeric fields in [`FinancialInputs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialField {
    PurchasePrice,
    AcquisitionCosts,
    Equity,
    InterestRatePct,
    AmortizationRatePct,
    AnnualGrossRent,
    MonthlyGrossRent,
    AnnualOperatingCosts,
    ManagementCostAnnual,
    ReservesAnnual,
    VacancyRatePct,
    PersonalTaxRatePct,
    DepreciationRatePct,
    DepreciationYears,
}

/// Descriptive, non-financial attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Apartment, single-family house, multi-family house, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_sqm: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking_spaces: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default)]
    pub balcony: bool,
    #[serde(default)]
    pub garden: bool,
    #[serde(default)]
    pub elevator: bool,
    #[serde(default)]
    pub cellar: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renovation: Option<String>,
}

/// Decimal view of [`FinancialInputs`] with tax defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedInputs {
    pub purchase_price: Money,
    pub acquisition_costs: Money,
    pub equity: Money,
    pub interest_rate_pct: Rate,
    pub amortization_rate_pct: Rate,
    pub annual_gross_rent: Money,
    pub annual_operating_costs: Money,
    pub management_cost_annual: Money,
    pub reserves_annual: Money,
    pub vacancy_rate_pct: Rate,
    pub personal_tax_rate_pct: Rate,
    pub depreciation_rate_pct: Rate,
    pub depreciation_years: Decimal,
}

// ---------------------------------------------------------------------------
// FinancialField
// ---------------------------------------------------------------------------

impl FinancialField {
    pub const ALL: [FinancialField; 14] = [
        FinancialField::PurchasePrice,
        FinancialField::AcquisitionCosts,
        FinancialField::Equity,
        FinancialField::InterestRatePct,
        FinancialField::AmortizationRatePct,
        FinancialField::AnnualGrossRent,
        FinancialField::MonthlyGrossRent,
        FinancialField::AnnualOperatingCosts,
        FinancialField::ManagementCostAnnual,
        FinancialField::ReservesAnnual,
        FinancialField::VacancyRatePct,
        FinancialField::PersonalTaxRatePct,
        FinancialField::DepreciationRatePct,
        FinancialField::DepreciationYears,
    ];

    /// The serialized field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FinancialField::PurchasePrice => "purchase_price",
            FinancialField::AcquisitionCosts => "acquisition_costs",
            FinancialField::Equity => "equity",
            FinancialField::InterestRatePct => "interest_rate_pct",
            FinancialField::AmortizationRatePct => "amortization_rate_pct",
            FinancialField::AnnualGrossRent => "annual_gross_rent",
            FinancialField::MonthlyGrossRent => "monthly_gross_rent",
            FinancialField::AnnualOperatingCosts => "annual_operating_costs",
            FinancialField::ManagementCostAnnual => "management_cost_annual",
            FinancialField::ReservesAnnual => "reserves_annual",
            FinancialField::VacancyRatePct => "vacancy_rate_pct",
            FinancialField::PersonalTaxRatePct => "personal_tax_rate_pct",
            FinancialField::DepreciationRatePct => "depreciation_rate_pct",
            FinancialField::DepreciationYears => "depreciation_years",
        }
    }
}

impl fmt::Display for FinancialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FinancialField {
    type Err = ImmoCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FinancialField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| ImmoCalcError::InvalidInput {
                field: wanted.to_string(),
                reason: "Not a numeric property field".into(),
            })
    }
}

// ---------------------------------------------------------------------------
// FinancialInputs
// ---------------------------------------------------------------------------

impl FinancialInputs {
    pub fn get(&self, field: FinancialField) -> Option<&RawNumber> {
        self.slot(field).as_ref()
    }

    pub fn set(&mut self, field: FinancialField, value: impl Into<RawNumber>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// True when the field is absent or an empty string.
    pub fn is_blank(&self, field: FinancialField) -> bool {
        self.get(field).is_none_or(RawNumber::is_blank)
    }

    /// Field value after lenient parsing (absent/blank/garbage → 0).
    pub fn value(&self, field: FinancialField) -> Decimal {
        parse_number(self.get(field))
    }

    /// Copy of `self` with every field present in `overrides` replaced.
    pub fn overlay(&self, overrides: &FinancialInputs) -> FinancialInputs {
        let mut merged = self.clone();
        for field in FinancialField::ALL {
            if let Some(value) = overrides.get(field) {
                merged.set(field, value.clone());
            }
        }
        merged
    }

    /// Fields that carry a value, in declaration order.
    pub fn present_fields(&self) -> Vec<FinancialField> {
        FinancialField::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_some())
            .collect()
    }

    /// Parse every field; the depreciation settings fall back to their
    /// defaults when they read as zero.
    pub fn parsed(&self) -> ParsedInputs {
        let or_default = |value: Decimal, default: Decimal| {
            if value.is_zero() {
                default
            } else {
                value
            }
        };

        ParsedInputs {
            purchase_price: self.value(FinancialField::PurchasePrice),
            acquisition_costs: self.value(FinancialField::AcquisitionCosts),
            equity: self.value(FinancialField::Equity),
            interest_rate_pct: self.value(FinancialField::InterestRatePct),
            amortization_rate_pct: self.value(FinancialField::AmortizationRatePct),
            annual_gross_rent: self.value(FinancialField::AnnualGrossRent),
            annual_operating_costs: self.value(FinancialField::AnnualOperatingCosts),
            management_cost_annual: self.value(FinancialField::ManagementCostAnnual),
            reserves_annual: self.value(FinancialField::ReservesAnnual),
            vacancy_rate_pct: self.value(FinancialField::VacancyRatePct),
            personal_tax_rate_pct: self.value(FinancialField::PersonalTaxRatePct),
            depreciation_rate_pct: or_default(
                self.value(FinancialField::DepreciationRatePct),
                DEFAULT_DEPRECIATION_RATE_PCT,
            ),
            depreciation_years: or_default(
                self.value(FinancialField::DepreciationYears),
                DEFAULT_DEPRECIATION_YEARS,
            ),
        }
    }

    fn slot(&self, field: FinancialField) -> &Option<RawNumber> {
        match field {
            FinancialField::PurchasePrice => &self.purchase_price,
            FinancialField::AcquisitionCosts => &self.acquisition_costs,
            FinancialField::Equity => &self.equity,
            FinancialField::InterestRatePct => &self.interest_rate_pct,
            FinancialField::AmortizationRatePct => &self.amortization_rate_pct,
            FinancialField::AnnualGrossRent => &self.annual_gross_rent,
            FinancialField::MonthlyGrossRent => &self.monthly_gross_rent,
            FinancialField::AnnualOperatingCosts => &self.annual_operating_costs,
            FinancialField::ManagementCostAnnual => &self.management_cost_annual,
            FinancialField::ReservesAnnual => &self.reserves_annual,
            FinancialField::VacancyRatePct => &self.vacancy_rate_pct,
            FinancialField::PersonalTaxRatePct => &self.personal_tax_rate_pct,
            FinancialField::DepreciationRatePct => &self.depreciation_rate_pct,
            FinancialField::DepreciationYears => &self.depreciation_years,
        }
    }

    fn slot_mut(&mut self, field: FinancialField) -> &mut Option<RawNumber> {
        match field {
            FinancialField::PurchasePrice => &mut self.purchase_price,
            FinancialField::AcquisitionCosts => &mut self.acquisition_costs,
            FinancialField::Equity => &mut self.equity,
            FinancialField::InterestRatePct => &mut self.interest_rate_pct,
            FinancialField::AmortizationRatePct => &mut self.amortization_rate_pct,
            FinancialField::AnnualGrossRent => &mut self.annual_gross_rent,
            FinancialField::MonthlyGrossRent => &mut self.monthly_gross_rent,
            FinancialField::AnnualOperatingCosts => &mut self.annual_operating_costs,
            FinancialField::ManagementCostAnnual => &mut self.management_cost_annual,
            FinancialField::ReservesAnnual => &mut self.reserves_annual,
            FinancialField::VacancyRatePct => &mut self.vacancy_rate_pct,
            FinancialField::PersonalTaxRatePct => &mut self.personal_tax_rate_pct,
            FinancialField::DepreciationRatePct => &mut self.depreciation_rate_pct,
            FinancialField::DepreciationYears => &mut self.depreciation_years,
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyInput
// ---------------------------------------------------------------------------

impl PropertyInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Same record with `overrides` applied on top of the financial fields.
    pub fn with_overrides(&self, overrides: &FinancialInputs) -> PropertyInput {
        PropertyInput {
            financials: self.financials.overlay(overrides),
            ..self.clone()
        }
    }

    /// Assign a generated id when the record has none, and return it.
    pub fn ensure_id(&mut self) -> &str {
        if self.id.as_deref().is_none_or(|id| id.trim().is_empty()) {
            self.id = Some(generate_property_id());
        }
        self.id.as_deref().unwrap_or_default()
    }
}

/// New record id of the form `immo_<unix millis>_<9 base-36 chars>`.
pub fn generate_property_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{ID_PREFIX}_{}_{suffix}", Utc::now().timestamp_millis())
}
