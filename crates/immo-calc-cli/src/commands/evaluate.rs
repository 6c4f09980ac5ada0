use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use immo_calc_core::evaluation::{evaluate, evaluate_snapshot};
use immo_calc_core::metrics::compute_metrics;
use immo_calc_core::property::PropertyInput;

use crate::input;

/// Arguments for rating a metric value
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EvaluateArgs {
    /// Metric name: gross_yield, net_yield, equity_yield, after_tax_equity_yield, dscr
    #[arg(long, requires = "value")]
    pub metric: Option<String>,

    /// Value to rate (percent for yields, ratio for DSCR)
    #[arg(long)]
    pub value: Option<Decimal>,

    /// Rate every headline figure of a property record instead
    #[arg(long, conflicts_with = "metric")]
    pub input: Option<String>,
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let (Some(metric), Some(value)) = (&args.metric, args.value) {
        let evaluation = evaluate(metric, value);
        return Ok(json!({
            "result": {
                "metric": metric,
                "value": value,
                "tier": evaluation.tier,
                "visual_hint": evaluation.visual_hint,
            }
        }));
    }

    let property: PropertyInput = input::read_document(
        args.input.as_deref(),
        "--metric/--value or a property record",
    )?;
    let assessments = evaluate_snapshot(&compute_metrics(&property));
    Ok(json!({ "result": assessments }))
}
