mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::evaluate::EvaluateArgs;
use commands::portfolio::PortfolioArgs;
use commands::projection::ProjectArgs;
use commands::property::{PropertyArgs, ValidateArgs};
use commands::scenario::ScenarioArgs;
use commands::settings::AutofillArgs;

/// Swiss real-estate investment calculator
#[derive(Parser)]
#[command(
    name = "immo",
    version,
    about = "Swiss real-estate investment calculator",
    long_about = "A CLI for analysing buy-to-let properties with decimal precision. \
                  Computes yields, cash flow, DSCR and tax, break-even figures, \
                  what-if scenarios, multi-year projections and portfolio totals. \
                  Property records are read as JSON from --input or stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Yields, cash flow, DSCR and tax for one property
    Metrics(PropertyArgs),
    /// Break-even rent and price, payback horizons
    BreakEven(PropertyArgs),
    /// Metrics, break-even and ratings in one report
    Report(PropertyArgs),
    /// Compare a property against overridden parameters
    Scenario(ScenarioArgs),
    /// List the built-in scenario templates
    Templates,
    /// Simulate value, debt and cash flow year by year
    Project(ProjectArgs),
    /// Aggregate a list of properties
    Portfolio(PortfolioArgs),
    /// Rate a metric value (or every headline figure of a property)
    Evaluate(EvaluateArgs),
    /// Derive default inputs from a purchase price
    Autofill(AutofillArgs),
    /// Check a property record the way the entry form does
    Validate(ValidateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Metrics(args) => commands::property::run_metrics(args),
        Commands::BreakEven(args) => commands::property::run_break_even(args),
        Commands::Report(args) => commands::property::run_report(args),
        Commands::Scenario(args) => commands::scenario::run_scenario(args),
        Commands::Templates => commands::scenario::run_templates(),
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Portfolio(args) => commands::portfolio::run_portfolio(args),
        Commands::Evaluate(args) => commands::evaluate::run_evaluate(args),
        Commands::Autofill(args) => commands::settings::run_autofill(args),
        Commands::Validate(args) => commands::property::run_validate(args),
        Commands::Version => {
            println!("immo {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
