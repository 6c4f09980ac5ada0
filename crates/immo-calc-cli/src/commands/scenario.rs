use std::time::Instant;

use clap::Args;
use serde_json::{json, Value};

use immo_calc_core::property::{FinancialInputs, PropertyInput};
use immo_calc_core::scenario::{
    builtin_templates, compute_scenario, parse_parameters, resolve_overrides, template_by_key,
};
use immo_calc_core::types::with_metadata;

use crate::input;

/// Arguments for a what-if scenario
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScenarioArgs {
    /// Path to JSON property record (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Built-in template key (see `immo templates`)
    #[arg(long, conflicts_with = "overrides")]
    pub template: Option<String>,

    /// Path to JSON file with absolute override values
    #[arg(long)]
    pub overrides: Option<String>,

    /// Override expression, repeatable: field=3.5, field=+2, field=-10%
    #[arg(long = "set", value_name = "FIELD=EXPR")]
    pub set: Vec<String>,
}

pub fn run_scenario(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property: PropertyInput = input::read_document(args.input.as_deref(), "Property record")?;
    let start = Instant::now();

    // Base overrides: a template (resolved against the property) or a file
    // of absolute values; `--set` expressions are layered on top.
    let mut overrides = match (&args.template, &args.overrides) {
        (Some(key), _) => resolve_overrides(&property, &template_by_key(key)?.parameters),
        (None, Some(path)) => input::file::read_file::<FinancialInputs>(path, "override set")?,
        (None, None) => FinancialInputs::default(),
    };
    if !args.set.is_empty() {
        let parameters = parse_parameters(args.set.iter().map(String::as_str))?;
        let base = property.with_overrides(&overrides);
        overrides = overrides.overlay(&resolve_overrides(&base, &parameters));
    }

    let mut warnings = Vec::new();
    if overrides.present_fields().is_empty() {
        warnings.push("No overrides given; scenario equals the baseline".to_string());
    }

    let result = compute_scenario(&property, &overrides);
    let output = with_metadata(
        "Baseline vs. scenario metrics (scenario − baseline)",
        &json!({ "template": args.template, "set": args.set }),
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_templates() -> Result<Value, Box<dyn std::error::Error>> {
    let rows: Vec<Value> = builtin_templates()
        .into_iter()
        .map(|t| {
            let parameters: Vec<String> = t
                .parameters
                .iter()
                .map(|(field, expr)| format!("{field}={expr}"))
                .collect();
            json!({
                "key": t.key,
                "name": t.name,
                "description": t.description,
                "parameters": parameters,
            })
        })
        .collect();
    Ok(json!({ "result": rows }))
}
