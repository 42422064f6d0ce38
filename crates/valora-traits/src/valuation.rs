//! Valuation output types and the [`Valuator`] trait.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Assumptions, FiscalYear, OperatingModel, Result};

/// Breakdown of the weighted average cost of capital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostOfCapital {
    /// CAPM cost of equity.
    pub cost_of_equity: f64,
    /// Cost of debt after the tax shield.
    pub after_tax_cost_of_debt: f64,
    /// Equity share of capital, `1 / (1 + D/E)`.
    pub equity_weight: f64,
    /// Debt share of capital, `(D/E) / (1 + D/E)`.
    pub debt_weight: f64,
    /// Blended discount rate.
    pub wacc: f64,
}

/// Result of a discounted-cash-flow valuation.
///
/// Per-year maps are keyed by projected fiscal year only and iterate in
/// ascending year order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcfResult {
    /// Discount rate applied to every projected year.
    pub wacc: f64,
    /// Components of the discount rate.
    pub cost_of_capital: CostOfCapital,
    /// Unlevered free cash flow per projected year.
    pub free_cash_flows: BTreeMap<FiscalYear, f64>,
    /// Discounted free cash flow per projected year.
    pub present_value_fcf: BTreeMap<FiscalYear, f64>,
    /// Sum of discounted free cash flows.
    pub total_pv_fcf: f64,
    /// Gordon-growth value at the end of the explicit forecast.
    pub terminal_value: f64,
    /// Terminal value discounted to today.
    pub present_value_terminal: f64,
    /// `total_pv_fcf + present_value_terminal`.
    pub enterprise_value: f64,
    /// Debt less cash on the last historical balance sheet.
    pub net_debt: f64,
    /// `enterprise_value - net_debt`.
    pub equity_value: f64,
    /// Equity value per share, when a share count was supplied.
    pub price_per_share: Option<f64>,
    /// Assumptions the valuation was computed with.
    pub assumptions: Assumptions,
}

/// Values a projected operating model.
///
/// Like [`crate::Projector`], implementations are pure and thread-safe.
pub trait Valuator: Send + Sync {
    /// Name of the valuation method, used in logs.
    fn name(&self) -> &str;

    /// Values `model`, which must contain projected years.
    ///
    /// # Errors
    ///
    /// - [`crate::ValoraError::InvalidAssumption`] when the discount rate is
    ///   not positive or does not exceed the terminal growth rate.
    /// - [`crate::ValoraError::InvalidModel`] when the model has no projected
    ///   years.
    fn value(&self, model: &OperatingModel, assumptions: &Assumptions) -> Result<DcfResult>;
}
