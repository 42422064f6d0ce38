//! Resolution of optional assumptions against historical drivers.

use serde::{Deserialize, Serialize};
use valora_traits::Assumptions;

use crate::history::HistoricalDrivers;

/// Where a resolved driver value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssumptionSource {
    /// Given explicitly in the assumptions.
    Supplied,
    /// Derived from the historical average.
    HistoricalAverage,
}

/// Projection drivers with every optional assumption filled in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAssumptions {
    /// Year-over-year revenue growth.
    pub revenue_growth: f64,
    /// Gross profit over revenue.
    pub gross_margin: f64,
    /// SG&A over revenue.
    pub sga_percent: f64,
    /// Tax rate applied to EBT.
    pub tax_rate: f64,
    /// Debt-to-equity the balance sheet is re-levered to, if any.
    pub target_debt_to_equity: Option<f64>,
    /// Origin of `revenue_growth`.
    pub revenue_growth_source: AssumptionSource,
    /// Origin of `gross_margin`.
    pub gross_margin_source: AssumptionSource,
    /// Origin of `sga_percent`.
    pub sga_percent_source: AssumptionSource,
}

impl ResolvedAssumptions {
    /// Fills the optional drivers in `assumptions` from `drivers`.
    #[must_use]
    pub fn resolve(assumptions: &Assumptions, drivers: &HistoricalDrivers) -> Self {
        let (revenue_growth, revenue_growth_source) =
            pick("revenue_growth", assumptions.revenue_growth, drivers.revenue_growth);
        let (gross_margin, gross_margin_source) =
            pick("gross_margin", assumptions.gross_margin, drivers.gross_margin);
        let (sga_percent, sga_percent_source) =
            pick("sga_percent", assumptions.sga_percent, drivers.sga_percent);

        Self {
            revenue_growth,
            gross_margin,
            sga_percent,
            tax_rate: assumptions.tax_rate,
            target_debt_to_equity: assumptions.target_debt_to_equity,
            revenue_growth_source,
            gross_margin_source,
            sga_percent_source,
        }
    }
}

fn pick(name: &str, supplied: Option<f64>, historical: f64) -> (f64, AssumptionSource) {
    supplied.map_or_else(
        || {
            tracing::debug!(driver = name, value = historical, "using historical average");
            (historical, AssumptionSource::HistoricalAverage)
        },
        |value| (value, AssumptionSource::Supplied),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::BalanceSheet;
    use crate::history::{BelowTheLine, WorkingCapitalRatios};
    use valora_traits::FiscalYear;

    fn drivers() -> HistoricalDrivers {
        HistoricalDrivers {
            latest_year: FiscalYear::new(2022),
            anchor_revenue: 1100.0,
            revenue_growth: 0.1,
            gross_margin: 0.5,
            sga_percent: 0.2,
            rnd_percent: 0.0,
            other_opex_percent: 0.0,
            da_percent: 0.0,
            capex_percent: 0.0,
            other_income: BelowTheLine::Flat(0.0),
            unusual_items: BelowTheLine::Flat(0.0),
            minority_interest: 0.0,
            opening_balance: BalanceSheet::default(),
            working_capital: WorkingCapitalRatios::default(),
        }
    }

    #[test]
    fn test_falls_back_to_history() {
        let resolved = ResolvedAssumptions::resolve(&Assumptions::default(), &drivers());
        assert_eq!(resolved.revenue_growth, 0.1);
        assert_eq!(resolved.gross_margin, 0.5);
        assert_eq!(resolved.sga_percent, 0.2);
        assert_eq!(resolved.gross_margin_source, AssumptionSource::HistoricalAverage);
        assert_eq!(resolved.target_debt_to_equity, None);
    }

    #[test]
    fn test_supplied_values_win() {
        let assumptions = Assumptions {
            revenue_growth: Some(0.05),
            gross_margin: Some(0.4),
            target_debt_to_equity: Some(0.5),
            ..Default::default()
        };
        let resolved = ResolvedAssumptions::resolve(&assumptions, &drivers());
        assert_eq!(resolved.revenue_growth, 0.05);
        assert_eq!(resolved.revenue_growth_source, AssumptionSource::Supplied);
        assert_eq!(resolved.gross_margin, 0.4);
        assert_eq!(resolved.sga_percent_source, AssumptionSource::HistoricalAverage);
        assert_eq!(resolved.target_debt_to_equity, Some(0.5));
        assert_eq!(resolved.tax_rate, 0.25);
    }
}
