//! Weighted average cost of capital.

use valora_traits::{Assumptions, CostOfCapital};

/// CAPM cost of equity: `risk_free_rate + beta × market_risk_premium`.
#[must_use]
pub fn cost_of_equity(assumptions: &Assumptions) -> f64 {
    assumptions.risk_free_rate + assumptions.beta * assumptions.market_risk_premium
}

/// Cost of debt net of the interest tax shield.
#[must_use]
pub fn after_tax_cost_of_debt(assumptions: &Assumptions) -> f64 {
    assumptions.cost_of_debt * (1.0 - assumptions.tax_rate)
}

/// Computes the cost of capital breakdown.
///
/// Weights come from the debt-to-equity ratio:
/// `E/V = 1 / (1 + D/E)` and `D/V = (D/E) / (1 + D/E)`.
///
/// # Examples
///
/// ```
/// use valora_dcf::cost_of_capital;
/// use valora_traits::Assumptions;
///
/// let coc = cost_of_capital(&Assumptions::default());
/// assert!((coc.cost_of_equity - 0.09).abs() < 1e-12);
/// assert!((coc.wacc - 0.0779).abs() < 1e-4);
/// ```
#[must_use]
pub fn cost_of_capital(assumptions: &Assumptions) -> CostOfCapital {
    let cost_of_equity = cost_of_equity(assumptions);
    let after_tax_cost_of_debt = after_tax_cost_of_debt(assumptions);

    let leverage = assumptions.debt_to_equity;
    let equity_weight = 1.0 / (1.0 + leverage);
    let debt_weight = leverage / (1.0 + leverage);

    CostOfCapital {
        cost_of_equity,
        after_tax_cost_of_debt,
        equity_weight,
        debt_weight,
        wacc: equity_weight * cost_of_equity + debt_weight * after_tax_cost_of_debt,
    }
}
