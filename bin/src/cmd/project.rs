//! Project command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use valora::{OperatingModelProjector, Projector, ProjectorConfig, Statement};

use super::{OutputFormat, banner};
use crate::data::{self, AssumptionArgs};
use crate::render::{self, Scale};

/// Project the three statements and print them.
pub(crate) fn run_project(
    input: &Path,
    args: &AssumptionArgs,
    format: OutputFormat,
    millions: bool,
) -> Result<()> {
    let historical = data::load_model(input)?;
    let assumptions = args.resolve()?;

    let projector = OperatingModelProjector::new(ProjectorConfig::default());
    let model = projector
        .project(&historical, &assumptions, assumptions.projection_years)
        .context("projection failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&model)?),
        OutputFormat::Text => {
            banner("Operating Model");
            if let Some(latest) = model.latest_historical_year {
                println!("Latest historical year: {latest}");
            }
            println!("Projected years:        {}\n", model.projection_years);

            let scale = Scale::new(millions);
            for statement in Statement::ALL {
                println!("{}", render::statement(&model, statement, scale));
            }
        }
    }

    Ok(())
}
