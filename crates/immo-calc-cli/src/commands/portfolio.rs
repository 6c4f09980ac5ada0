use std::time::Instant;

use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use immo_calc_core::portfolio::aggregate_portfolio;
use immo_calc_core::property::PropertyInput;
use immo_calc_core::types::with_metadata;

use crate::input;

/// Arguments for portfolio aggregation
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to JSON array of property records, or `{"properties": [...]}`
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortfolioDocument {
    List(Vec<PropertyInput>),
    Wrapped { properties: Vec<PropertyInput> },
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let document: PortfolioDocument =
        input::read_document(args.input.as_deref(), "Property list")?;
    let properties = match document {
        PortfolioDocument::List(list) => list,
        PortfolioDocument::Wrapped { properties } => properties,
    };

    let start = Instant::now();
    let stats = aggregate_portfolio(&properties);

    let mut warnings = Vec::new();
    if properties.is_empty() {
        warnings.push("Empty portfolio; all figures are zero".to_string());
    }

    let names: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
    let output = with_metadata(
        "Sums of absolute figures, arithmetic means of yields, yields on totals",
        &names,
        warnings,
        start.elapsed().as_micros() as u64,
        stats,
    );
    Ok(serde_json::to_value(output)?)
}
