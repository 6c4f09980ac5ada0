use std::time::Instant;

use clap::Args;
use serde_json::Value;

use immo_calc_core::break_even::compute_break_even;
use immo_calc_core::metrics::compute_metrics;
use immo_calc_core::property::PropertyInput;
use immo_calc_core::report::analyze_property;
use immo_calc_core::settings::apply_auto_fill;
use immo_calc_core::types::with_metadata;
use immo_calc_core::validation::{is_complete, validate_property};

use crate::input;

/// Arguments shared by the single-property commands
#[derive(Args)]
pub struct PropertyArgs {
    /// Path to JSON property record (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Fill blank fields from the purchase price before calculating
    #[arg(long)]
    pub auto_fill: bool,

    /// YAML/JSON auto-fill settings (defaults to the Swiss defaults)
    #[arg(long, requires = "auto_fill")]
    pub settings: Option<String>,
}

/// Arguments for form validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to JSON property record (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,
}

fn load_property(args: &PropertyArgs) -> Result<PropertyInput, Box<dyn std::error::Error>> {
    let property: PropertyInput = input::read_document(args.input.as_deref(), "Property record")?;
    if !args.auto_fill {
        return Ok(property);
    }
    let settings = input::read_settings(args.settings.as_deref())?;
    let (filled, fields) = apply_auto_fill(&property, &settings);
    log::info!("auto-filled fields: {fields:?}");
    Ok(filled)
}

pub fn run_metrics(args: PropertyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property = load_property(&args)?;
    let start = Instant::now();
    let metrics = compute_metrics(&property);
    let output = with_metadata(
        "Annual rental metrics (capital structure, yields, DSCR, tax)",
        &property.financials,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        metrics,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_break_even(args: PropertyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property = load_property(&args)?;
    let start = Instant::now();
    let result = compute_break_even(&property);

    let mut warnings = Vec::new();
    if result.break_even_rent_annual.is_none() {
        warnings.push("Vacancy rate of 100% or more; break-even rent is undefined".to_string());
    }
    if result.years_to_payback.is_none() {
        warnings.push("After-tax cash flow is not positive; equity is never paid back".to_string());
    }

    let output = with_metadata(
        "Break-even rent, fair price at target yield, payback horizons",
        &property.financials,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_report(args: PropertyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property = load_property(&args)?;
    Ok(serde_json::to_value(analyze_property(&property))?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property: PropertyInput = input::read_document(args.input.as_deref(), "Property record")?;
    let report = validate_property(&property);

    let mut value = serde_json::to_value(&report)?;
    value["complete"] = Value::Bool(is_complete(&property));
    Ok(serde_json::json!({ "result": value }))
}
