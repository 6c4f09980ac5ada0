use std::collections::BTreeSet;

use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Serialize;

use immo_calc_core::projection::ProjectionAssumptions;
use immo_calc_core::property::{FinancialField, FinancialInputs, PropertyInput};
use immo_calc_core::settings::Settings;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_property(property_json: &str) -> NapiResult<PropertyInput> {
    serde_json::from_str(property_json).map_err(to_napi_error)
}

fn parse_settings(settings_json: Option<String>) -> NapiResult<Settings> {
    match settings_json {
        Some(json) => Settings::from_json(&json).map_err(to_napi_error),
        None => Ok(Settings::default()),
    }
}

fn to_decimal(value: f64) -> NapiResult<Decimal> {
    Decimal::try_from(value).map_err(to_napi_error)
}

fn to_json(value: &impl Serialize) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Property metrics
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_metrics(property_json: String) -> NapiResult<String> {
    let property = parse_property(&property_json)?;
    to_json(&immo_calc_core::metrics::compute_metrics(&property))
}

#[napi]
pub fn compute_break_even(property_json: String) -> NapiResult<String> {
    let property = parse_property(&property_json)?;
    to_json(&immo_calc_core::break_even::compute_break_even(&property))
}

#[napi]
pub fn analyze_property(property_json: String) -> NapiResult<String> {
    let property = parse_property(&property_json)?;
    to_json(&immo_calc_core::report::analyze_property(&property))
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_scenario(property_json: String, overrides_json: String) -> NapiResult<String> {
    let property = parse_property(&property_json)?;
    let overrides: FinancialInputs =
        serde_json::from_str(&overrides_json).map_err(to_napi_error)?;
    to_json(&immo_calc_core::scenario::compute_scenario(&property, &overrides))
}

#[napi]
pub fn run_scenario_template(property_json: String, template_key: String) -> NapiResult<String> {
    let property = parse_property(&property_json)?;
    let template =
        immo_calc_core::scenario::template_by_key(&template_key).map_err(to_napi_error)?;
    to_json(&immo_calc_core::scenario::run_template(&property, &template))
}

#[napi]
pub fn scenario_templates() -> NapiResult<String> {
    to_json(&immo_calc_core::scenario::builtin_templates())
}

// ---------------------------------------------------------------------------
// Projection and portfolio
// ---------------------------------------------------------------------------

#[napi]
pub fn project_years(property_json: String, assumptions_json: Option<String>) -> NapiResult<String> {
    let property = parse_property(&property_json)?;
    let assumptions: ProjectionAssumptions = match assumptions_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => ProjectionAssumptions::default(),
    };
    to_json(&immo_calc_core::projection::project_years(&property, &assumptions))
}

#[napi]
pub fn aggregate_portfolio(properties_json: String) -> NapiResult<String> {
    let properties: Vec<PropertyInput> =
        serde_json::from_str(&properties_json).map_err(to_napi_error)?;
    to_json(&immo_calc_core::portfolio::aggregate_portfolio(&properties))
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate_metric(metric_name: String, value: f64) -> NapiResult<String> {
    let value = to_decimal(value)?;
    to_json(&immo_calc_core::evaluation::evaluate(&metric_name, value))
}

// ---------------------------------------------------------------------------
// Settings, auto-fill and validation
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct AutoFillOutput {
    property: PropertyInput,
    filled_fields: BTreeSet<FinancialField>,
}

#[napi]
pub fn auto_fill(property_json: String, settings_json: Option<String>) -> NapiResult<String> {
    let property = parse_property(&property_json)?;
    let settings = parse_settings(settings_json)?;
    let (property, filled_fields) = immo_calc_core::settings::apply_auto_fill(&property, &settings);
    to_json(&AutoFillOutput {
        property,
        filled_fields,
    })
}

#[napi]
pub fn settings_preview(purchase_price: f64, settings_json: Option<String>) -> NapiResult<String> {
    let settings = parse_settings(settings_json)?;
    let price = to_decimal(purchase_price)?;
    to_json(&immo_calc_core::settings::preview(price, &settings))
}

#[napi]
pub fn default_settings() -> NapiResult<String> {
    to_json(&Settings::default())
}

#[napi]
pub fn validate_property(property_json: String) -> NapiResult<String> {
    let property = parse_property(&property_json)?;
    to_json(&immo_calc_core::validation::validate_property(&property))
}

#[napi]
pub fn is_complete(property_json: String) -> NapiResult<bool> {
    let property = parse_property(&property_json)?;
    Ok(immo_calc_core::validation::is_complete(&property))
}

#[napi]
pub fn generate_property_id() -> String {
    immo_calc_core::property::generate_property_id()
}
