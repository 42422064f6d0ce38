//! Valora CLI binary.
//!
//! Provides a command-line interface for projecting operating models and
//! valuing them with a DCF.

mod cmd;
mod data;
mod logging;
mod render;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::OutputFormat;
use data::AssumptionArgs;

#[derive(Parser)]
#[command(name = "valora")]
#[command(about = "Three-statement operating model projection and DCF valuation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the three statements from historical data
    Project {
        /// Historical operating model (JSON)
        input: PathBuf,

        #[command(flatten)]
        assumptions: AssumptionArgs,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Show currency amounts in millions
        #[arg(short, long)]
        millions: bool,
    },

    /// Project and value with a discounted cash flow
    Value {
        /// Historical operating model (JSON)
        input: PathBuf,

        #[command(flatten)]
        assumptions: AssumptionArgs,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Show currency amounts in millions
        #[arg(short, long)]
        millions: bool,

        /// Also print the projected statements
        #[arg(short, long)]
        statements: bool,
    },

    /// Show the cost of capital for a set of assumptions
    Wacc {
        #[command(flatten)]
        assumptions: AssumptionArgs,

        /// Output format (text or json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, &cli.log_format);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Project {
            input,
            assumptions,
            format,
            millions,
        } => {
            cmd::project::run_project(&input, &assumptions, format, millions)?;
        }
        Commands::Value {
            input,
            assumptions,
            format,
            millions,
            statements,
        } => {
            cmd::value::run_value(&input, &assumptions, format, millions, statements)?;
        }
        Commands::Wacc {
            assumptions,
            format,
        } => {
            cmd::wacc::run_wacc(&assumptions, format)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_value_flags() {
        let cli = Cli::try_parse_from([
            "valora",
            "value",
            "model.json",
            "--tax-rate",
            "0.21",
            "--revenue-growth",
            "-0.05",
            "-n",
            "7",
            "--format",
            "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Value {
                input,
                assumptions,
                format,
                ..
            } => {
                assert_eq!(input, PathBuf::from("model.json"));
                assert_eq!(assumptions.tax_rate, Some(0.21));
                assert_eq!(assumptions.revenue_growth, Some(-0.05));
                assert_eq!(assumptions.projection_years, Some(7));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected value command"),
        }
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result = Cli::try_parse_from(["valora", "wacc", "--format", "csv"]);
        assert!(result.is_err());
    }
}
