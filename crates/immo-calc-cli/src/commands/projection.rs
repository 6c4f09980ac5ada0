use std::time::Instant;

use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use immo_calc_core::projection::{
    project_years, summarize_projection, ProjectionAssumptions, ProjectionSummary, ProjectionYear,
};
use immo_calc_core::property::PropertyInput;
use immo_calc_core::types::with_metadata;

use crate::input;

/// Arguments for the multi-year projection
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ProjectArgs {
    /// Path to JSON property record (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Number of years to simulate
    #[arg(long, default_value = "10")]
    pub years: u32,

    /// Annual property value growth in percent
    #[arg(long, default_value = "2")]
    pub appreciation: Decimal,

    /// Annual rent growth in percent
    #[arg(long, default_value = "2")]
    pub rent_growth: Decimal,
}

#[derive(Debug, Serialize)]
struct ProjectionOutput {
    years: Vec<ProjectionYear>,
    summary: Option<ProjectionSummary>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property: PropertyInput = input::read_document(args.input.as_deref(), "Property record")?;
    let assumptions = ProjectionAssumptions {
        horizon_years: args.years,
        appreciation_pct: args.appreciation,
        rent_growth_pct: args.rent_growth,
    };

    let start = Instant::now();
    let years = project_years(&property, &assumptions);
    let summary = summarize_projection(&property, &years);

    let mut warnings = Vec::new();
    if years.is_empty() {
        warnings.push("Horizon of 0 years; nothing to project".to_string());
    }

    let output = with_metadata(
        "Year-by-year roll forward (flat amortization, compounded value and rent)",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        ProjectionOutput { years, summary },
    );
    Ok(serde_json::to_value(output)?)
}
