//! Form-level plausibility checks. The calculators never call these; they
//! accept any input and stay total.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::parsing::RawNumber;
use crate::property::{FinancialField, PropertyInput};

pub const MSG_REQUIRED: &str = "This field is required";
pub const MSG_NON_NEGATIVE: &str = "Value must be zero or positive";
pub const MSG_PERCENTAGE: &str = "Value must be between 0 and 100";

const PERCENTAGE_FIELDS: [FinancialField; 3] = [
    FinancialField::InterestRatePct,
    FinancialField::VacancyRatePct,
    FinancialField::AmortizationRatePct,
];

const NON_NEGATIVE_FIELDS: [FinancialField; 7] = [
    FinancialField::AcquisitionCosts,
    FinancialField::Equity,
    FinancialField::AnnualGrossRent,
    FinancialField::MonthlyGrossRent,
    FinancialField::AnnualOperatingCosts,
    FinancialField::ManagementCostAnnual,
    FinancialField::ReservesAnnual,
];

const COMPLETE_FIELDS: [FinancialField; 4] = [
    FinancialField::PurchasePrice,
    FinancialField::Equity,
    FinancialField::InterestRatePct,
    FinancialField::AnnualGrossRent,
];

/// Outcome of [`validate_property`]: field name → message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: BTreeMap<String, String>,
}

/// Check a record the way the entry form does before saving it.
pub fn validate_property(property: &PropertyInput) -> ValidationReport {
    let mut errors = BTreeMap::new();

    if property.name.trim().is_empty() {
        errors.insert("name".to_string(), MSG_REQUIRED.to_string());
    }

    let inputs = &property.financials;
    let in_range = |value: Decimal| value >= Decimal::ZERO && value <= dec!(100);
    let non_negative = |value: Decimal| value >= Decimal::ZERO;

    check(
        &mut errors,
        FinancialField::PurchasePrice,
        inputs.get(FinancialField::PurchasePrice),
        non_negative,
        MSG_NON_NEGATIVE,
    );
    for field in PERCENTAGE_FIELDS {
        check(&mut errors, field, inputs.get(field), in_range, MSG_PERCENTAGE);
    }
    for field in NON_NEGATIVE_FIELDS {
        check(&mut errors, field, inputs.get(field), non_negative, MSG_NON_NEGATIVE);
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// True when name, purchase price, equity, interest rate and annual rent
/// are all filled in.
pub fn is_complete(property: &PropertyInput) -> bool {
    !property.name.is_empty()
        && COMPLETE_FIELDS
            .iter()
            .all(|f| !property.financials.is_blank(*f))
}

/// Blank fields pass; anything entered must read as a number satisfying `ok`.
fn check(
    errors: &mut BTreeMap<String, String>,
    field: FinancialField,
    value: Option<&RawNumber>,
    ok: impl Fn(Decimal) -> bool,
    message: &str,
) {
    let Some(raw) = value.filter(|v| !v.is_blank()) else {
        return;
    };
    if !raw.try_value().is_some_and(&ok) {
        errors.insert(field.to_string(), message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_record() -> PropertyInput {
        let mut p = PropertyInput::new("Luzern Tribschen");
        let f = &mut p.financials;
        f.set(FinancialField::PurchasePrice, dec!(650000));
        f.set(FinancialField::Equity, dec!(150000));
        f.set(FinancialField::InterestRatePct, "2.1");
        f.set(FinancialField::AnnualGrossRent, dec!(30000));
        p
    }

    #[test]
    fn test_valid_record() {
        let report = validate_property(&valid_record());
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(is_complete(&valid_record()));
    }

    #[test]
    fn test_name_required() {
        let mut p = valid_record();
        p.name = "   ".into();
        let report = validate_property(&p);
        assert!(!report.valid);
        assert_eq!(report.errors.get("name").map(String::as_str), Some(MSG_REQUIRED));
    }

    #[test]
    fn test_percentage_and_sign_checks() {
        let mut p = valid_record();
        p.financials.set(FinancialField::InterestRatePct, dec!(120));
        p.financials.set(FinancialField::VacancyRatePct, "-1");
        p.financials.set(FinancialField::Equity, dec!(-5));
        p.financials.set(FinancialField::PurchasePrice, "abc");

        let report = validate_property(&p);
        let mut expected = BTreeMap::new();
        expected.insert("interest_rate_pct".to_string(), MSG_PERCENTAGE.to_string());
        expected.insert("vacancy_rate_pct".to_string(), MSG_PERCENTAGE.to_string());
        expected.insert("equity".to_string(), MSG_NON_NEGATIVE.to_string());
        expected.insert("purchase_price".to_string(), MSG_NON_NEGATIVE.to_string());
        assert_eq!(report.errors, expected);
    }

    #[test]
    fn test_blank_optional_fields_pass() {
        let mut p = valid_record();
        p.financials.set(FinancialField::ReservesAnnual, "");
        assert!(validate_property(&p).valid);
    }

    #[test]
    fn test_incomplete_record() {
        let mut p = valid_record();
        p.financials.set(FinancialField::AnnualGrossRent, "");
        assert!(!is_complete(&p));
        // validation still passes: completeness is a separate check
        assert!(validate_property(&p).valid);
    }
}
