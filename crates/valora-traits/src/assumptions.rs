//! Driver and cost-of-capital assumptions.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValoraError};

/// Upper bound on the number of projected years.
pub const MAX_PROJECTION_YEARS: i32 = 20;

/// Inputs to the projection and valuation engines.
///
/// Rates are decimal fractions (`0.25` for 25%). The three operating drivers
/// (`revenue_growth`, `gross_margin`, `sga_percent`) are optional; when absent
/// the projector substitutes the historical average of the corresponding ratio.
///
/// # Example
///
/// ```
/// use valora_traits::Assumptions;
///
/// let assumptions = Assumptions {
///     revenue_growth: Some(0.08),
///     ..Default::default()
/// };
/// assert!(assumptions.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    /// Number of years to project.
    pub projection_years: i32,
    /// Risk-free rate.
    pub risk_free_rate: f64,
    /// Equity beta.
    pub beta: f64,
    /// Equity market risk premium.
    pub market_risk_premium: f64,
    /// Pre-tax cost of debt.
    pub cost_of_debt: f64,
    /// Tax rate applied to EBT and to the cost of debt.
    pub tax_rate: f64,
    /// Debt-to-equity ratio used for the WACC capital weights.
    pub debt_to_equity: f64,
    /// Perpetual growth rate after the explicit forecast.
    pub terminal_growth_rate: f64,
    /// Annual revenue growth; historical mean growth when absent.
    #[serde(default)]
    pub revenue_growth: Option<f64>,
    /// Gross margin; historical mean margin when absent.
    #[serde(default)]
    pub gross_margin: Option<f64>,
    /// SG&A as a fraction of revenue; historical mean when absent.
    #[serde(default)]
    pub sga_percent: Option<f64>,
    /// Balance-sheet leverage target; debt is held flat when absent.
    #[serde(default)]
    pub target_debt_to_equity: Option<f64>,
    /// Diluted share count for a per-share value.
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            projection_years: 5,
            risk_free_rate: 0.03,
            beta: 1.0,
            market_risk_premium: 0.06,
            cost_of_debt: 0.05,
            tax_rate: 0.25,
            debt_to_equity: 0.3,
            terminal_growth_rate: 0.03,
            revenue_growth: None,
            gross_margin: None,
            sga_percent: None,
            target_debt_to_equity: None,
            shares_outstanding: None,
        }
    }
}

impl Assumptions {
    /// Checks every field, including `projection_years`, for range and
    /// finiteness.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::InvalidAssumption`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<()> {
        validate_years(self.projection_years, MAX_PROJECTION_YEARS)?;
        self.validate_rates()
    }

    /// Checks every field except `projection_years`.
    ///
    /// Engines that receive the horizon separately validate with this.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::InvalidAssumption`] naming the first offending
    /// field.
    pub fn validate_rates(&self) -> Result<()> {
        let required = [
            ("risk_free_rate", self.risk_free_rate),
            ("beta", self.beta),
            ("market_risk_premium", self.market_risk_premium),
            ("cost_of_debt", self.cost_of_debt),
            ("tax_rate", self.tax_rate),
            ("debt_to_equity", self.debt_to_equity),
            ("terminal_growth_rate", self.terminal_growth_rate),
        ];
        for (name, value) in required {
            ensure_finite(name, value)?;
        }

        let optional = [
            ("revenue_growth", self.revenue_growth),
            ("gross_margin", self.gross_margin),
            ("sga_percent", self.sga_percent),
            ("target_debt_to_equity", self.target_debt_to_equity),
            ("shares_outstanding", self.shares_outstanding),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                ensure_finite(name, value)?;
            }
        }

        if !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(ValoraError::InvalidAssumption(format!(
                "tax_rate must be between 0 and 1, got {}",
                self.tax_rate
            )));
        }
        if self.debt_to_equity <= -1.0 {
            return Err(ValoraError::InvalidAssumption(format!(
                "debt_to_equity must be greater than -1, got {}",
                self.debt_to_equity
            )));
        }
        if self.revenue_growth.is_some_and(|g| g <= -1.0) {
            return Err(ValoraError::InvalidAssumption(
                "revenue_growth must be greater than -1".to_string(),
            ));
        }
        if self.target_debt_to_equity.is_some_and(|d| d < 0.0) {
            return Err(ValoraError::InvalidAssumption(
                "target_debt_to_equity must not be negative".to_string(),
            ));
        }
        if self.shares_outstanding.is_some_and(|s| s <= 0.0) {
            return Err(ValoraError::InvalidAssumption(
                "shares_outstanding must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Checks a projection horizon against `1..=max`.
///
/// # Errors
///
/// Returns [`ValoraError::InvalidAssumption`] when `years` is out of range.
pub fn validate_years(years: i32, max: i32) -> Result<()> {
    if years <= 0 {
        return Err(ValoraError::InvalidAssumption(format!(
            "projection_years must be positive, got {years}"
        )));
    }
    if years > max {
        return Err(ValoraError::InvalidAssumption(format!(
            "projection_years must be at most {max}, got {years}"
        )));
    }
    Ok(())
}

fn ensure_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValoraError::InvalidAssumption(format!(
            "{name} must be a finite number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_assumptions() {
        let a = Assumptions::default();
        assert_eq!(a.projection_years, 5);
        assert_relative_eq!(a.risk_free_rate, 0.03);
        assert_relative_eq!(a.debt_to_equity, 0.3);
        assert!(a.revenue_growth.is_none());
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_years() {
        for years in [0, -1, -10] {
            let a = Assumptions {
                projection_years: years,
                ..Default::default()
            };
            assert!(matches!(
                a.validate(),
                Err(ValoraError::InvalidAssumption(_))
            ));
        }
    }

    #[test]
    fn test_rates_ignore_horizon() {
        let a = Assumptions {
            projection_years: 0,
            ..Default::default()
        };
        assert!(a.validate().is_err());
        assert!(a.validate_rates().is_ok());

        let a = Assumptions {
            projection_years: 0,
            tax_rate: -0.1,
            ..Default::default()
        };
        assert!(a.validate_rates().is_err());
    }

    #[test]
    fn test_rejects_too_many_years() {
        let a = Assumptions {
            projection_years: MAX_PROJECTION_YEARS + 1,
            ..Default::default()
        };
        assert!(a.validate().is_err());

        let a = Assumptions {
            projection_years: MAX_PROJECTION_YEARS,
            ..Default::default()
        };
        assert!(a.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_rates() {
        let a = Assumptions {
            tax_rate: 25.0,
            ..Default::default()
        };
        assert!(a.validate().is_err());

        let a = Assumptions {
            beta: f64::NAN,
            ..Default::default()
        };
        assert!(a.validate().is_err());

        let a = Assumptions {
            debt_to_equity: -1.0,
            ..Default::default()
        };
        assert!(a.validate().is_err());

        let a = Assumptions {
            shares_outstanding: Some(0.0),
            ..Default::default()
        };
        assert!(a.validate().is_err());

        let a = Assumptions {
            gross_margin: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_nulls() {
        let json = r#"{
            "projection_years": 3,
            "risk_free_rate": 0.04,
            "beta": 1.2,
            "market_risk_premium": 0.055,
            "cost_of_debt": 0.06,
            "tax_rate": 0.21,
            "debt_to_equity": 0.5,
            "terminal_growth_rate": 0.025,
            "revenue_growth": null,
            "gross_margin": 0.4
        }"#;
        let a: Assumptions = serde_json::from_str(json).unwrap();
        assert_eq!(a.projection_years, 3);
        assert!(a.revenue_growth.is_none());
        assert_eq!(a.gross_margin, Some(0.4));
        assert!(a.sga_percent.is_none());
        assert!(a.shares_outstanding.is_none());
    }
}
