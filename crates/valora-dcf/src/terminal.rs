//! Terminal value.

use valora_traits::{Result, ValoraError};

/// Gordon growth terminal value at the end of the explicit forecast.
///
/// `TV = FCF_T × (1 + g) / (WACC − g)`.
///
/// # Errors
///
/// Returns [`ValoraError::InvalidAssumption`] unless `wacc > growth`.
pub fn gordon_growth(last_fcf: f64, wacc: f64, growth: f64) -> Result<f64> {
    if wacc <= growth {
        return Err(ValoraError::InvalidAssumption(format!(
            "WACC ({wacc:.4}) must exceed terminal growth rate ({growth:.4})"
        )));
    }
    Ok(last_fcf * (1.0 + growth) / (wacc - growth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gordon_growth() {
        let tv = gordon_growth(100.0, 0.08, 0.03).unwrap();
        assert_relative_eq!(tv, 2060.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_final_flow() {
        let tv = gordon_growth(-50.0, 0.1, 0.0).unwrap();
        assert_relative_eq!(tv, -500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_growth_at_or_above_wacc() {
        assert!(matches!(
            gordon_growth(100.0, 0.03, 0.03),
            Err(ValoraError::InvalidAssumption(_))
        ));
        assert!(gordon_growth(100.0, 0.03, 0.05).is_err());
    }
}
