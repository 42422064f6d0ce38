//! Three-statement [`Projector`] implementation.

use serde::{Deserialize, Serialize};
use valora_traits::{
    Assumptions, FiscalYear, LineItem, MAX_PROJECTION_YEARS, OperatingModel, Projector, Result,
    ValoraError, validate_years,
};

use crate::cash_flow::CashFlowYear;
use crate::history::HistoricalDrivers;
use crate::income::IncomeYear;
use crate::ratios;
use crate::resolve::ResolvedAssumptions;

/// Configuration for the operating model projector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectorConfig {
    /// Longest horizon accepted by [`Projector::project`].
    pub max_projection_years: i32,
    /// Largest absolute gap tolerated by the balance and cash checks, in
    /// currency units. Historical imbalances above it are logged.
    pub balance_tolerance: f64,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            max_projection_years: MAX_PROJECTION_YEARS,
            balance_tolerance: 1.0,
        }
    }
}

/// Projects Income Statement, Balance Sheet and Cash Flow together.
///
/// Each projected year is built from the prior year only: the income
/// statement first, then the balance sheet with cash as the plug, then the
/// cash flow derived from the change between the two balance sheets.
///
/// # Examples
///
/// ```
/// use valora_model::{OperatingModelProjector, ProjectorConfig};
/// use valora_traits::{Assumptions, FiscalYear, LineItem, OperatingModel, Projector, StatementTable};
///
/// let mut income = StatementTable::new();
/// income.set(FiscalYear::new(2021), LineItem::Revenue, 1000.0);
/// income.set(FiscalYear::new(2022), LineItem::Revenue, 1100.0);
/// let historical = OperatingModel::historical(income, StatementTable::new(), StatementTable::new());
///
/// let projector = OperatingModelProjector::new(ProjectorConfig::default());
/// let model = projector.project(&historical, &Assumptions::default(), 3).unwrap();
///
/// assert_eq!(model.projection_years, 3);
/// assert_eq!(model.latest_historical_year, Some(FiscalYear::new(2022)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct OperatingModelProjector {
    config: ProjectorConfig,
}

impl OperatingModelProjector {
    /// Create a projector with the given configuration.
    pub const fn new(config: ProjectorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &ProjectorConfig {
        &self.config
    }
}

impl Projector for OperatingModelProjector {
    fn name(&self) -> &str {
        "three_statement"
    }

    #[tracing::instrument(level = "debug", skip(self, historical, assumptions))]
    fn project(
        &self,
        historical: &OperatingModel,
        assumptions: &Assumptions,
        years: i32,
    ) -> Result<OperatingModel> {
        validate_years(years, self.config.max_projection_years)?;
        assumptions.validate_rates()?;

        let tolerance = self.config.balance_tolerance;
        let drivers = HistoricalDrivers::from_history(historical, tolerance)?;
        let resolved = ResolvedAssumptions::resolve(assumptions, &drivers);
        let latest = drivers.latest_year;

        let mut model = OperatingModel {
            income_statement: historical.income_statement.through(latest),
            balance_sheet: historical.balance_sheet.through(latest),
            cash_flow: historical.cash_flow.through(latest),
            latest_historical_year: Some(latest),
            projection_years: usize::try_from(years).map_err(|_| {
                ValoraError::InvalidAssumption(format!("invalid projection_years {years}"))
            })?,
        };

        let projected = (1..=years)
            .map(|offset| latest.offset(offset))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                ValoraError::InvalidFiscalYear(format!("{latest} plus {years} years is out of range"))
            })?;

        let mut prior_revenue = drivers.anchor_revenue;
        let mut balance = drivers.opening_balance.clone();
        for year in projected {
            let income = IncomeYear::project(prior_revenue, &resolved, &drivers);
            let (next, capex) = balance.roll_forward(&income, &resolved, &drivers);
            let flow = CashFlowYear::derive(&balance, &next, &income, capex);

            income.write_to(&mut model.income_statement, year);
            next.write_to(&mut model.balance_sheet, year);
            flow.write_to(&mut model.cash_flow, year);

            prior_revenue = income.revenue;
            balance = next;
        }

        ratios::refresh(&mut model);
        check_invariants(&model, tolerance)?;

        tracing::info!(
            projector = self.name(),
            latest_historical_year = %latest,
            years,
            revenue_growth = resolved.revenue_growth,
            gross_margin = resolved.gross_margin,
            "projected operating model"
        );

        Ok(model)
    }
}

/// Verifies the balance and cash invariants for every projected year.
///
/// - `TotalAssets == TotalLiabilities + TotalShareholdersEquity`
/// - `Cash(t) - Cash(t-1) == NetCashFlow(t)`, with `Cash(t-1)` for the first
///   projected year read from the last historical balance sheet
///
/// # Errors
///
/// Returns [`ValoraError::InvalidModel`] naming the first failing year.
pub fn check_invariants(model: &OperatingModel, tolerance: f64) -> Result<()> {
    let Some(latest) = model.latest_historical_year() else {
        return Ok(());
    };
    let balance = &model.balance_sheet;
    let cash = |year: FiscalYear| balance.value(year, LineItem::CashAndCashEquivalents);

    let mut prior_cash = cash(latest);
    for year in model.projected_years() {
        let assets = balance.value(year, LineItem::TotalAssets);
        let claims = balance.value(year, LineItem::TotalLiabilities)
            + balance.value(year, LineItem::TotalShareholdersEquity);
        if (assets - claims).abs() > tolerance {
            return Err(ValoraError::InvalidModel(format!(
                "balance sheet does not balance in {year}: assets {assets:.2}, liabilities and equity {claims:.2}"
            )));
        }

        let current_cash = cash(year);
        let net_cash_flow = model.cash_flow.value(year, LineItem::NetCashFlow);
        if (current_cash - prior_cash - net_cash_flow).abs() > tolerance {
            return Err(ValoraError::InvalidModel(format!(
                "cash does not reconcile in {year}: change {:.2}, net cash flow {net_cash_flow:.2}",
                current_cash - prior_cash
            )));
        }
        prior_cash = current_cash;
    }
    Ok(())
}
