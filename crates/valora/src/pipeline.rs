//! Projection followed by valuation.

use serde::{Deserialize, Serialize};
use valora_dcf::DcfEngine;
use valora_model::OperatingModelProjector;
use valora_traits::{Assumptions, DcfResult, OperatingModel, Projector, Result, Valuator};

/// A projected operating model and its valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    /// Historical years followed by projected years.
    pub operating_model: OperatingModel,
    /// DCF valuation of the projected years.
    pub dcf_results: DcfResult,
}

/// Runs a [`Projector`] and then a [`Valuator`] over its output.
#[derive(Debug, Clone, Default)]
pub struct Pipeline<P = OperatingModelProjector, V = DcfEngine> {
    projector: P,
    valuator: V,
}

impl<P: Projector, V: Valuator> Pipeline<P, V> {
    /// Create a pipeline from its two stages.
    pub const fn new(projector: P, valuator: V) -> Self {
        Self {
            projector,
            valuator,
        }
    }

    /// Projection stage.
    #[must_use]
    pub const fn projector(&self) -> &P {
        &self.projector
    }

    /// Valuation stage.
    #[must_use]
    pub const fn valuator(&self) -> &V {
        &self.valuator
    }

    /// Projects `assumptions.projection_years` years and values the result.
    ///
    /// # Errors
    ///
    /// Propagates the first error from either stage; no partial result is
    /// returned.
    pub fn run(&self, historical: &OperatingModel, assumptions: &Assumptions) -> Result<Valuation> {
        tracing::debug!(
            projector = self.projector.name(),
            valuator = self.valuator.name(),
            years = assumptions.projection_years,
            "running valuation pipeline"
        );
        let operating_model =
            self.projector
                .project(historical, assumptions, assumptions.projection_years)?;
        let dcf_results = self.valuator.value(&operating_model, assumptions)?;
        Ok(Valuation {
            operating_model,
            dcf_results,
        })
    }
}

/// Projects and values `historical` with the default engines.
///
/// # Errors
///
/// See [`Pipeline::run`].
pub fn calculate(historical: &OperatingModel, assumptions: &Assumptions) -> Result<Valuation> {
    Pipeline::<OperatingModelProjector, DcfEngine>::default().run(historical, assumptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use valora_traits::{FiscalYear, LineItem, StatementTable, ValoraError};

    fn fy(y: i32) -> FiscalYear {
        FiscalYear::new(y)
    }

    fn historical() -> OperatingModel {
        let mut income = StatementTable::new();
        income.set(fy(2021), LineItem::Revenue, 1000.0);
        income.set(fy(2021), LineItem::GrossProfit, 500.0);
        income.set(fy(2022), LineItem::Revenue, 1100.0);
        income.set(fy(2022), LineItem::GrossProfit, 550.0);

        let mut balance = StatementTable::new();
        balance.set(fy(2022), LineItem::CashAndCashEquivalents, 100.0);
        balance.set(fy(2022), LineItem::PropertyPlantAndEquipmentNet, 300.0);
        balance.set(fy(2022), LineItem::TermDebtNonCurrent, 150.0);
        balance.set(fy(2022), LineItem::TotalShareholdersEquity, 250.0);

        OperatingModel::historical(income, balance, StatementTable::new())
    }

    #[test]
    fn test_calculate() {
        let valuation = calculate(&historical(), &Assumptions::default()).unwrap();

        assert_eq!(valuation.operating_model.projection_years, 5);
        assert_eq!(
            valuation.dcf_results.free_cash_flows.keys().copied().collect::<Vec<_>>(),
            valuation.operating_model.projected_years()
        );
        assert_relative_eq!(valuation.dcf_results.net_debt, 50.0);
        assert_relative_eq!(
            valuation.operating_model.income_statement.value(fy(2023), LineItem::Revenue),
            1210.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_errors_are_all_or_nothing() {
        let assumptions = Assumptions {
            projection_years: 0,
            ..Default::default()
        };
        let err = calculate(&historical(), &assumptions).unwrap_err();
        assert!(matches!(err, ValoraError::InvalidAssumption(_)));
    }

    #[test]
    fn test_valuation_serializes() {
        let valuation = calculate(&historical(), &Assumptions::default()).unwrap();
        let json = serde_json::to_value(&valuation).unwrap();

        assert!(json["operating_model"]["income_statement"]["2027"]["Revenue"].is_number());
        assert!(json["dcf_results"]["free_cash_flows"]["2023"].is_number());
        assert_eq!(json["dcf_results"]["price_per_share"], serde_json::Value::Null);
    }
}
