mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::diagnostics::{AppraiseArgs, DiagnoseArgs};
use commands::projection::{CashFlowArgs, SimulateArgs};
use commands::study::SuggestArgs;

/// Viability studies for real-estate developments
#[derive(Parser)]
#[command(
    name = "viab",
    version,
    about = "Viability studies for real-estate developments",
    long_about = "A CLI for appraising Brazilian real-estate developments with decimal \
                  precision. Suggests market assumptions, projects the monthly cash flow, \
                  computes margins, IRR, NPV and exposure, and diagnoses the study \
                  against market benchmarks."
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
    /// Build a study with market-suggested assumptions for a project
    Suggest(SuggestArgs),
    /// Project a study month by month and compute its indicators
    Simulate(SimulateArgs),
    /// Print the consolidated monthly cash flow of a study
    CashFlow(CashFlowArgs),
    /// Compare a study against market benchmarks
    Diagnose(DiagnoseArgs),
    /// Simulate and diagnose a study in one pass
    Appraise(AppraiseArgs),
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Suggest(args) => commands::study::run_suggest(args),
        Commands::Simulate(args) => commands::projection::run_simulate(args),
        Commands::CashFlow(args) => commands::projection::run_cash_flow(args),
        Commands::Diagnose(args) => commands::diagnostics::run_diagnose(args),
        Commands::Appraise(args) => commands::diagnostics::run_appraise(args),
        Commands::Version => {
            println!("viab {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
