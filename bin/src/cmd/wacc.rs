//! WACC command implementation.

use anyhow::Result;
use valora::dcf::cost_of_capital;

use super::{OutputFormat, banner};
use crate::data::AssumptionArgs;
use crate::render;

/// Print the cost of capital implied by the assumptions.
pub(crate) fn run_wacc(args: &AssumptionArgs, format: OutputFormat) -> Result<()> {
    let assumptions = args.resolve()?;
    let coc = cost_of_capital(&assumptions);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&coc)?),
        OutputFormat::Text => {
            banner("Cost of Capital");
            print!("{}", render::cost_of_capital(&coc));
            if coc.wacc <= assumptions.terminal_growth_rate {
                println!(
                    "\nWarning: WACC does not exceed the terminal growth rate ({:.2}%); a DCF valuation will be rejected.",
                    assumptions.terminal_growth_rate * 100.0
                );
            }
        }
    }

    Ok(())
}
