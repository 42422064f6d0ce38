//! [`Valuator`] implementation tying the DCF steps together.

use valora_traits::{
    Assumptions, DcfResult, LineItem, OperatingModel, Result, ValoraError, Valuator,
};

use crate::fcf::{discount, discount_factor, free_cash_flows};
use crate::terminal::gordon_growth;
use crate::wacc::cost_of_capital;

/// Discounted cash flow valuation with a Gordon growth terminal value.
///
/// Every projected year is discounted at the same WACC. Net debt is read from
/// the last historical balance sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct DcfEngine;

impl DcfEngine {
    /// Create a DCF engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Valuator for DcfEngine {
    fn name(&self) -> &str {
        "dcf_gordon_growth"
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn value(&self, model: &OperatingModel, assumptions: &Assumptions) -> Result<DcfResult> {
        assumptions.validate_rates()?;

        let coc = cost_of_capital(assumptions);
        let wacc = coc.wacc;
        let growth = assumptions.terminal_growth_rate;
        if wacc <= 0.0 {
            return Err(ValoraError::InvalidAssumption(format!(
                "WACC must be positive, got {wacc:.4}"
            )));
        }
        if wacc <= growth {
            return Err(ValoraError::InvalidAssumption(format!(
                "WACC ({wacc:.4}) must exceed terminal growth rate ({growth:.4})"
            )));
        }

        let free_cash_flows = free_cash_flows(model)?;
        let present_value_fcf = discount(&free_cash_flows, wacc);
        let total_pv_fcf = present_value_fcf.values().sum::<f64>();

        let horizon = i32::try_from(free_cash_flows.len())
            .map_err(|_| ValoraError::InvalidModel("projection horizon too long".into()))?;
        let last_fcf = free_cash_flows.values().next_back().copied().unwrap_or(0.0);
        let terminal_value = gordon_growth(last_fcf, wacc, growth)?;
        let present_value_terminal = terminal_value / discount_factor(wacc, horizon);

        let enterprise_value = total_pv_fcf + present_value_terminal;
        let net_debt = net_debt(model);
        let equity_value = enterprise_value - net_debt;
        let price_per_share = assumptions.shares_outstanding.map(|shares| equity_value / shares);

        tracing::info!(
            valuator = self.name(),
            wacc,
            enterprise_value,
            equity_value,
            "valued operating model"
        );

        Ok(DcfResult {
            wacc,
            cost_of_capital: coc,
            free_cash_flows,
            present_value_fcf,
            total_pv_fcf,
            terminal_value,
            present_value_terminal,
            enterprise_value,
            net_debt,
            equity_value,
            price_per_share,
            assumptions: assumptions.clone(),
        })
    }
}

/// Total debt less cash on the last historical balance sheet.
///
/// Zero when the model has no balance sheet for that year.
#[must_use]
pub fn net_debt(model: &OperatingModel) -> f64 {
    let Some(year) = model.latest_historical_year() else {
        return 0.0;
    };
    let balance = &model.balance_sheet;
    if !balance.contains_year(year) {
        tracing::debug!(%year, "no historical balance sheet, net debt is zero");
        return 0.0;
    }
    balance.value(year, LineItem::TermDebtCurrent)
        + balance.value(year, LineItem::TermDebtNonCurrent)
        + balance.value(year, LineItem::CommercialPaper)
        - balance.value(year, LineItem::CashAndCashEquivalents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use valora_model::OperatingModelProjector;
    use valora_traits::{FiscalYear, Projector, StatementTable};

    fn fy(y: i32) -> FiscalYear {
        FiscalYear::new(y)
    }

    /// A model with hand-set projected cash flows.
    fn model(flows: &[f64]) -> OperatingModel {
        let mut balance = StatementTable::new();
        balance.set(fy(2022), LineItem::CashAndCashEquivalents, 50.0);
        balance.set(fy(2022), LineItem::TermDebtNonCurrent, 200.0);
        balance.set(fy(2022), LineItem::CommercialPaper, 10.0);

        let mut cash_flow = StatementTable::new();
        for (year, fcf) in (2023..).zip(flows) {
            cash_flow.set(fy(year), LineItem::OperatingCashFlow, fcf + 20.0);
            cash_flow.set(fy(year), LineItem::InvestingCashFlow, -20.0);
        }

        OperatingModel {
            balance_sheet: balance,
            cash_flow,
            latest_historical_year: Some(fy(2022)),
            projection_years: flows.len(),
            ..Default::default()
        }
    }

    /// Assumptions giving a WACC of exactly 8%.
    fn eight_percent() -> Assumptions {
        Assumptions {
            risk_free_rate: 0.02,
            beta: 1.0,
            market_risk_premium: 0.06,
            debt_to_equity: 0.0,
            terminal_growth_rate: 0.03,
            ..Default::default()
        }
    }

    #[test]
    fn test_single_year_terminal_value() {
        let result = DcfEngine::new().value(&model(&[100.0]), &eight_percent()).unwrap();

        assert_relative_eq!(result.wacc, 0.08, epsilon = 1e-12);
        assert_relative_eq!(result.terminal_value, 2060.0, epsilon = 1e-6);
        assert_relative_eq!(result.present_value_terminal, 2060.0 / 1.08, epsilon = 1e-6);
        assert_relative_eq!(result.total_pv_fcf, 100.0 / 1.08, epsilon = 1e-9);
        assert_relative_eq!(
            result.enterprise_value,
            result.total_pv_fcf + result.present_value_terminal,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_net_debt_and_equity_value() {
        let assumptions = Assumptions {
            shares_outstanding: Some(100.0),
            ..eight_percent()
        };
        let result = DcfEngine::new().value(&model(&[100.0, 110.0]), &assumptions).unwrap();

        assert_relative_eq!(result.net_debt, 160.0);
        assert_relative_eq!(result.equity_value, result.enterprise_value - 160.0, epsilon = 1e-9);
        assert_relative_eq!(
            result.price_per_share.unwrap(),
            result.equity_value / 100.0,
            epsilon = 1e-12
        );
        assert_eq!(result.assumptions, assumptions);
    }

    #[test]
    fn test_per_year_maps_follow_projection() {
        let result = DcfEngine::new()
            .value(&model(&[100.0, 110.0, 121.0]), &eight_percent())
            .unwrap();

        let years: Vec<_> = result.free_cash_flows.keys().copied().collect();
        assert_eq!(years, vec![fy(2023), fy(2024), fy(2025)]);
        assert_eq!(
            result.present_value_fcf.keys().copied().collect::<Vec<_>>(),
            years
        );
        assert_relative_eq!(result.present_value_fcf[&fy(2024)], 110.0 / 1.08_f64.powi(2), epsilon = 1e-9);
        assert_relative_eq!(
            result.total_pv_fcf,
            result.present_value_fcf.values().sum::<f64>(),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            result.present_value_terminal,
            result.terminal_value / 1.08_f64.powi(3),
            epsilon = 1e-6
        );
        assert!(result.price_per_share.is_none());
    }

    #[test]
    fn test_wacc_equal_to_growth_is_rejected() {
        let assumptions = Assumptions {
            risk_free_rate: 0.03,
            beta: 0.0,
            debt_to_equity: 0.0,
            terminal_growth_rate: 0.03,
            ..Default::default()
        };
        let err = DcfEngine::new().value(&model(&[100.0]), &assumptions).unwrap_err();
        assert!(matches!(err, ValoraError::InvalidAssumption(_)));
    }

    #[test]
    fn test_non_positive_wacc_is_rejected() {
        let assumptions = Assumptions {
            risk_free_rate: -0.05,
            beta: 0.0,
            debt_to_equity: 0.0,
            terminal_growth_rate: -0.1,
            ..Default::default()
        };
        let err = DcfEngine::new().value(&model(&[100.0]), &assumptions).unwrap_err();
        assert!(matches!(err, ValoraError::InvalidAssumption(_)));
    }

    #[test]
    fn test_historical_only_model_is_rejected() {
        let err = DcfEngine::new().value(&model(&[]), &eight_percent()).unwrap_err();
        assert!(matches!(err, ValoraError::InvalidModel(_)));
    }

    #[test]
    fn test_missing_balance_sheet_gives_zero_net_debt() {
        let mut m = model(&[100.0]);
        m.balance_sheet = StatementTable::new();
        assert_relative_eq!(net_debt(&m), 0.0);
    }

    #[test]
    fn test_values_projected_model() {
        let mut income = StatementTable::new();
        income.set(fy(2021), LineItem::Revenue, 1000.0);
        income.set(fy(2021), LineItem::GrossProfit, 500.0);
        income.set(fy(2022), LineItem::Revenue, 1100.0);
        income.set(fy(2022), LineItem::GrossProfit, 550.0);
        let mut balance = StatementTable::new();
        balance.set(fy(2022), LineItem::CashAndCashEquivalents, 100.0);
        balance.set(fy(2022), LineItem::TotalShareholdersEquity, 100.0);
        let historical = OperatingModel::historical(income, balance, StatementTable::new());

        let assumptions = Assumptions::default();
        let projected = OperatingModelProjector::default()
            .project(&historical, &assumptions, assumptions.projection_years)
            .unwrap();
        let result = DcfEngine::new().value(&projected, &assumptions).unwrap();

        assert_eq!(result.free_cash_flows.len(), 5);
        assert_relative_eq!(result.net_debt, -100.0);
        assert!(result.enterprise_value.is_finite());
    }
}
