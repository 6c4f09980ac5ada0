//! What-if scenarios: apply parameter overrides to a property and compare
//! the resulting metrics with the unchanged baseline.
//!
//! [`compute_scenario`] only accepts absolute override values. Relative
//! expressions such as `"+2"` or `"-10%"` are resolved beforehand with
//! [`resolve_overrides`], which is what the built-in templates use.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ImmoCalcError;
use crate::metrics::{compute_metrics, MetricsSnapshot};
use crate::parsing::try_parse_text;
use crate::time_value::growth_factor;
use crate::property::{FinancialField, FinancialInputs, PropertyInput};
use crate::types::{Money, Rate};
use crate::ImmoCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Scenario minus baseline for the headline figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDifference {
    pub cash_flow: Money,
    pub equity_yield: Rate,
    pub after_tax_cash_flow: Money,
    pub after_tax_equity_yield: Rate,
}

/// Baseline and scenario metrics side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub basis: MetricsSnapshot,
    pub scenario: MetricsSnapshot,
    pub difference: ScenarioDifference,
    /// The absolute overrides that produced `scenario`
    pub applied_parameters: FinancialInputs,
}

/// One override as typed by a user or stored in a template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum OverrideExpr {
    /// Replace the base value (`"3.5"`, `"-1"`)
    Absolute(Decimal),
    /// Add to the base value (`"+2"`)
    Add(Decimal),
    /// Change the base value by a percentage (`"-10%"`, `"+20%"`)
    Percent(Rate),
}

/// A named, reusable set of override expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTemplate {
    pub key: String,
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<FinancialField, OverrideExpr>,
}

// ---------------------------------------------------------------------------
// OverrideExpr
// ---------------------------------------------------------------------------

impl OverrideExpr {
    /// Resolve against the field's current value.
    pub fn apply(&self, base: Decimal) -> Decimal {
        match self {
            OverrideExpr::Absolute(v) => *v,
            OverrideExpr::Add(delta) => base.saturating_add(*delta),
            OverrideExpr::Percent(pct) => base.saturating_mul(growth_factor(*pct)),
        }
    }
}

impl FromStr for OverrideExpr {
    type Err = ImmoCalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let number = try_parse_text(text).ok_or_else(|| ImmoCalcError::InvalidInput {
            field: "override".into(),
            reason: format!("'{text}' is not a number, '+delta' or 'pct%' expression"),
        })?;

        if text.contains('%') {
            Ok(OverrideExpr::Percent(number))
        } else if text.starts_with('+') {
            Ok(OverrideExpr::Add(number))
        } else {
            Ok(OverrideExpr::Absolute(number))
        }
    }
}

impl fmt::Display for OverrideExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideExpr::Absolute(v) => write!(f, "{v}"),
            OverrideExpr::Add(d) if d.is_sign_negative() => write!(f, "{d}"),
            OverrideExpr::Add(d) => write!(f, "+{d}"),
            OverrideExpr::Percent(p) if p.is_sign_negative() => write!(f, "{p}%"),
            OverrideExpr::Percent(p) => write!(f, "+{p}%"),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare `property` against a copy with `overrides` applied (override wins
/// per field).
pub fn compute_scenario(property: &PropertyInput, overrides: &FinancialInputs) -> ScenarioResult {
    let modified = property.with_overrides(overrides);

    let basis = compute_metrics(property);
    let scenario = compute_metrics(&modified);

    let difference = ScenarioDifference {
        cash_flow: scenario.cash_flow.saturating_sub(basis.cash_flow),
        equity_yield: scenario.equity_yield.saturating_sub(basis.equity_yield),
        after_tax_cash_flow: scenario
            .after_tax_cash_flow
            .saturating_sub(basis.after_tax_cash_flow),
        after_tax_equity_yield: scenario
            .after_tax_equity_yield
            .saturating_sub(basis.after_tax_equity_yield),
    };

    ScenarioResult {
        basis,
        scenario,
        difference,
        applied_parameters: overrides.clone(),
    }
}

/// Turn override expressions into absolute values against `property`.
pub fn resolve_overrides(
    property: &PropertyInput,
    parameters: &BTreeMap<FinancialField, OverrideExpr>,
) -> FinancialInputs {
    let mut resolved = FinancialInputs::default();
    for (field, expr) in parameters {
        let base = property.financials.value(*field);
        let value = expr.apply(base);
        debug!("override {field}: {base} {expr} -> {value}");
        resolved.set(*field, value);
    }
    resolved
}

/// Parse `field=expr` pairs (e.g. `interest_rate_pct=+1`) into overrides.
pub fn parse_parameters<'a>(
    pairs: impl IntoIterator<Item = &'a str>,
) -> ImmoCalcResult<BTreeMap<FinancialField, OverrideExpr>> {
    let mut parameters = BTreeMap::new();
    for pair in pairs {
        let (field, expr) = pair
            .split_once('=')
            .ok_or_else(|| ImmoCalcError::InvalidInput {
                field: pair.to_string(),
                reason: "Expected field=expression".into(),
            })?;
        parameters.insert(field.parse()?, expr.parse()?);
    }
    Ok(parameters)
}

/// Resolve a template against `property` and compare.
pub fn run_template(property: &PropertyInput, template: &ScenarioTemplate) -> ScenarioResult {
    let overrides = resolve_overrides(property, &template.parameters);
    compute_scenario(property, &overrides)
}

/// The stock what-if scenarios.
pub fn builtin_templates() -> Vec<ScenarioTemplate> {
    use FinancialField::{AnnualGrossRent, AnnualOperatingCosts, InterestRatePct};
    use OverrideExpr::{Add, Percent};

    let template = |key: &str, name: &str, description: &str, params: &[(FinancialField, OverrideExpr)]| {
        ScenarioTemplate {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            parameters: params.iter().copied().collect(),
        }
    };

    vec![
        template(
            "interest_rise",
            "Interest rate rise",
            "What happens when mortgage rates go up?",
            &[(InterestRatePct, Add(dec!(2)))],
        ),
        template(
            "rent_decline",
            "Rent decline",
            "Impact of falling rents",
            &[(AnnualGrossRent, Percent(dec!(-10)))],
        ),
        template(
            "optimistic",
            "Optimistic scenario",
            "Best case: higher rents, lower costs",
            &[
                (AnnualGrossRent, Percent(dec!(10))),
                (AnnualOperatingCosts, Percent(dec!(-20))),
            ],
        ),
        template(
            "pessimistic",
            "Pessimistic scenario",
            "Worst case: lower rents, higher costs and rates",
            &[
                (AnnualGrossRent, Percent(dec!(-10))),
                (AnnualOperatingCosts, Percent(dec!(20))),
                (InterestRatePct, Add(dec!(1))),
            ],
        ),
    ]
}

/// Look up a built-in template by key.
pub fn template_by_key(key: &str) -> ImmoCalcResult<ScenarioTemplate> {
    builtin_templates()
        .into_iter()
        .find(|t| t.key == key)
        .ok_or_else(|| ImmoCalcError::UnknownTemplate(key.to_string()))
}
