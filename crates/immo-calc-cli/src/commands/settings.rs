use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use immo_calc_core::property::PropertyInput;
use immo_calc_core::settings::{apply_auto_fill, preview};

use crate::input;

/// Arguments for auto-fill
#[derive(Args)]
pub struct AutofillArgs {
    /// Purchase price to derive defaults from
    #[arg(long, conflicts_with = "input")]
    pub purchase_price: Option<Decimal>,

    /// Fill the blank fields of a property record instead
    #[arg(long)]
    pub input: Option<String>,

    /// YAML/JSON settings overriding the Swiss defaults
    #[arg(long)]
    pub settings: Option<String>,
}

pub fn run_autofill(args: AutofillArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let settings = input::read_settings(args.settings.as_deref())?;

    if let Some(price) = args.purchase_price {
        if price <= Decimal::ZERO {
            return Err("--purchase-price must be positive".into());
        }
        return Ok(json!({ "result": preview(price, &settings) }));
    }

    let property: PropertyInput = input::read_document(
        args.input.as_deref(),
        "--purchase-price or a property record",
    )?;
    let (filled, fields) = apply_auto_fill(&property, &settings);
    Ok(json!({
        "result": {
            "filled_fields": fields,
            "property": filled,
        }
    }))
}
