//! Value command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use valora::{Statement, calculate};

use super::{OutputFormat, banner};
use crate::data::{self, AssumptionArgs};
use crate::render::{self, Scale};

/// Project, value and print the DCF result.
pub(crate) fn run_value(
    input: &Path,
    args: &AssumptionArgs,
    format: OutputFormat,
    millions: bool,
    show_statements: bool,
) -> Result<()> {
    let historical = data::load_model(input)?;
    let assumptions = args.resolve()?;

    let valuation = calculate(&historical, &assumptions).context("valuation failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&valuation)?),
        OutputFormat::Text => {
            let scale = Scale::new(millions);
            if show_statements {
                banner("Operating Model");
                for statement in Statement::ALL {
                    println!("{}", render::statement(&valuation.operating_model, statement, scale));
                }
            }

            banner("DCF Valuation");
            print!("{}", render::dcf(&valuation.dcf_results, scale));
        }
    }

    Ok(())
}
