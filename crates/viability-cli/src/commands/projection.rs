use clap::Args;
use serde_json::Value;

use viability_core::projection;
use viability_core::study::Study;

use crate::input;

/// Arguments for a cash-flow projection
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to JSON study file
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the monthly cash-flow report
#[derive(Args)]
pub struct CashFlowArgs {
    /// Path to JSON study file
    #[arg(long)]
    pub input: Option<String>,

    /// Only print months with a non-zero flow
    #[arg(long)]
    pub skip_empty: bool,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let study: Study = input::read_document(args.input.as_deref(), "simulation")?;
    let result = projection::simulate(&study)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_cash_flow(args: CashFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let study: Study = input::read_document(args.input.as_deref(), "cash flow")?;
    let output = projection::simulate(&study)?;
    super::log_warnings(&output.warnings);

    let mut rows = projection::cash_flow_rows(&study, &output.result);
    if args.skip_empty {
        rows.retain(|row| {
            !(row.revenue.is_zero() && row.cost.is_zero() && row.expense.is_zero())
        });
    }
    Ok(serde_json::to_value(rows)?)
}
