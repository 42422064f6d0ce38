//! Input loading and assumption layering for the valora CLI.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde_json::{Map, Value};
use valora::{Assumptions, OperatingModel};

/// Load a historical operating model from a JSON file.
pub(crate) fn load_model(path: &Path) -> Result<OperatingModel> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read model file {}", path.display()))?;
    parse_model(&json).with_context(|| format!("invalid model file {}", path.display()))
}

/// Parse a historical operating model in the normalizer's JSON shape.
pub(crate) fn parse_model(json: &str) -> Result<OperatingModel> {
    let model: OperatingModel = serde_json::from_str(json)?;
    tracing::debug!(
        income_years = model.income_statement.len(),
        balance_years = model.balance_sheet.len(),
        cash_flow_years = model.cash_flow.len(),
        "loaded operating model"
    );
    Ok(model)
}

/// Parse a possibly partial assumptions object over the defaults.
///
/// Fields missing from `json` keep their [`Assumptions::default`] values.
pub(crate) fn parse_assumptions(json: &str) -> Result<Assumptions> {
    let overrides: Map<String, Value> =
        serde_json::from_str(json).context("assumptions must be a JSON object")?;
    let mut merged = serde_json::to_value(Assumptions::default())?;
    if let Value::Object(base) = &mut merged {
        base.extend(overrides);
    }
    Ok(serde_json::from_value(merged)?)
}

/// Assumption flags shared by every subcommand.
///
/// Layering, lowest to highest precedence: built-in defaults, the
/// `--assumptions` file, individual flags.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct AssumptionArgs {
    /// JSON file with assumptions (partial objects allowed)
    #[arg(short, long)]
    pub(crate) assumptions: Option<PathBuf>,

    /// Number of years to project
    #[arg(short = 'n', long)]
    pub(crate) projection_years: Option<i32>,

    /// Risk-free rate (decimal)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) risk_free_rate: Option<f64>,

    /// Equity beta
    #[arg(long)]
    pub(crate) beta: Option<f64>,

    /// Market risk premium (decimal)
    #[arg(long)]
    pub(crate) market_risk_premium: Option<f64>,

    /// Pre-tax cost of debt (decimal)
    #[arg(long)]
    pub(crate) cost_of_debt: Option<f64>,

    /// Tax rate (decimal)
    #[arg(long)]
    pub(crate) tax_rate: Option<f64>,

    /// Debt-to-equity ratio for the WACC weights
    #[arg(long)]
    pub(crate) debt_to_equity: Option<f64>,

    /// Terminal growth rate (decimal)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) terminal_growth_rate: Option<f64>,

    /// Revenue growth (decimal, historical mean when omitted)
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) revenue_growth: Option<f64>,

    /// Gross margin (decimal, historical mean when omitted)
    #[arg(long)]
    pub(crate) gross_margin: Option<f64>,

    /// SG&A as a fraction of revenue (historical mean when omitted)
    #[arg(long)]
    pub(crate) sga_percent: Option<f64>,

    /// Re-lever the balance sheet to this debt-to-equity ratio
    #[arg(long)]
    pub(crate) target_debt_to_equity: Option<f64>,

    /// Shares outstanding for a per-share value
    #[arg(long)]
    pub(crate) shares_outstanding: Option<f64>,
}

impl AssumptionArgs {
    /// Build the final assumption set and validate it.
    pub(crate) fn resolve(&self) -> Result<Assumptions> {
        let base = match &self.assumptions {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read assumptions file {}", path.display()))?;
                parse_assumptions(&json)
                    .with_context(|| format!("invalid assumptions file {}", path.display()))?
            }
            None => Assumptions::default(),
        };
        let assumptions = self.apply(base);
        assumptions.validate()?;
        Ok(assumptions)
    }

    /// Overlay the flags that were given on `base`.
    fn apply(&self, mut base: Assumptions) -> Assumptions {
        if let Some(v) = self.projection_years {
            base.projection_years = v;
        }
        let required = [
            (self.risk_free_rate, &mut base.risk_free_rate),
            (self.beta, &mut base.beta),
            (self.market_risk_premium, &mut base.market_risk_premium),
            (self.cost_of_debt, &mut base.cost_of_debt),
            (self.tax_rate, &mut base.tax_rate),
            (self.debt_to_equity, &mut base.debt_to_equity),
            (self.terminal_growth_rate, &mut base.terminal_growth_rate),
        ];
        for (flag, field) in required {
            if let Some(v) = flag {
                *field = v;
            }
        }
        let optional = [
            (self.revenue_growth, &mut base.revenue_growth),
            (self.gross_margin, &mut base.gross_margin),
            (self.sga_percent, &mut base.sga_percent),
            (self.target_debt_to_equity, &mut base.target_debt_to_equity),
            (self.shares_outstanding, &mut base.shares_outstanding),
        ];
        for (flag, field) in optional {
            if flag.is_some() {
                *field = flag;
            }
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use valora::{FiscalYear, LineItem};

    #[test]
    fn test_parse_model() {
        let json = r#"{
            "income_statement": {"2021-12-31": {"Revenue": 1000.0}, "2022-12-31": {"Revenue": 1100.0, "COGS": null}},
            "balance_sheet": {"2022": {"CashAndCashEquivalents": 100.0}}
        }"#;
        let model = parse_model(json).unwrap();

        assert_eq!(model.income_statement.len(), 2);
        assert_eq!(
            model.income_statement.get(FiscalYear::new(2022), LineItem::Revenue),
            Some(1100.0)
        );
        assert_eq!(model.income_statement.get(FiscalYear::new(2022), LineItem::Cogs), None);
        assert!(model.cash_flow.is_empty());
    }

    #[test]
    fn test_parse_model_invalid_year() {
        let json = r#"{"income_statement": {"next year": {"Revenue": 1.0}}}"#;
        assert!(parse_model(json).is_err());
    }

    #[test]
    fn test_partial_assumptions_file() {
        let a = parse_assumptions(r#"{"tax_rate": 0.21, "revenue_growth": 0.07}"#).unwrap();

        assert_relative_eq!(a.tax_rate, 0.21);
        assert_eq!(a.revenue_growth, Some(0.07));
        assert_eq!(a.projection_years, 5);
        assert_relative_eq!(a.beta, 1.0);
    }

    #[test]
    fn test_assumptions_file_must_be_object() {
        assert!(parse_assumptions("[1, 2]").is_err());
        assert!(parse_assumptions(r#"{"beta": "high"}"#).is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let base = parse_assumptions(r#"{"tax_rate": 0.21, "gross_margin": 0.4}"#).unwrap();
        let args = AssumptionArgs {
            tax_rate: Some(0.3),
            projection_years: Some(8),
            shares_outstanding: Some(1.0e6),
            ..Default::default()
        };
        let a = args.apply(base);

        assert_relative_eq!(a.tax_rate, 0.3);
        assert_eq!(a.projection_years, 8);
        assert_eq!(a.gross_margin, Some(0.4));
        assert_eq!(a.shares_outstanding, Some(1.0e6));
        assert_relative_eq!(a.debt_to_equity, 0.3);
    }

    #[test]
    fn test_resolve_without_file_uses_defaults() {
        let a = AssumptionArgs::default().resolve().unwrap();
        assert_eq!(a, Assumptions::default());
    }

    #[test]
    fn test_resolve_rejects_invalid_flags() {
        let args = AssumptionArgs {
            tax_rate: Some(1.5),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_resolve_reads_file() {
        let path = std::env::temp_dir().join(format!("valora-assumptions-{}.json", std::process::id()));
        fs::write(&path, r#"{"beta": 1.4}"#).unwrap();
        let args = AssumptionArgs {
            assumptions: Some(path.clone()),
            beta: None,
            ..Default::default()
        };
        let a = args.resolve().unwrap();
        fs::remove_file(&path).unwrap();

        assert_relative_eq!(a.beta, 1.4);
    }
}
