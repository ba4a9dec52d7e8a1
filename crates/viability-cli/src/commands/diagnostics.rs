use clap::Args;
use serde_json::Value;

use viability_core::diagnostics::{self, Severity};
use viability_core::projection;
use viability_core::study::Study;

use crate::input;

/// Arguments for benchmark diagnostics
#[derive(Args)]
pub struct DiagnoseArgs {
    /// Path to JSON study file
    #[arg(long)]
    pub input: Option<String>,

    /// Drop positive findings
    #[arg(long)]
    pub issues_only: bool,
}

/// Arguments for a full appraisal
#[derive(Args)]
pub struct AppraiseArgs {
    /// Path to JSON study file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_diagnose(args: DiagnoseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let study: Study = input::read_document(args.input.as_deref(), "diagnostics")?;
    let output = projection::simulate(&study)?;
    super::log_warnings(&output.warnings);

    let mut findings = diagnostics::diagnose(&study, &output.result);
    if args.issues_only {
        findings.retain(|f| f.severity != Severity::Positive);
    }
    Ok(serde_json::to_value(findings)?)
}

pub fn run_appraise(args: AppraiseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let study: Study = input::read_document(args.input.as_deref(), "appraisal")?;
    let result = viability_core::appraise(&study)?;
    Ok(serde_json::to_value(result)?)
}
