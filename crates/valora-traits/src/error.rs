//! Error types for the valora engine.
//!
//! Every fatal condition aborts the whole calculation; the engine never
//! returns a partially populated model or valuation. Missing non-critical
//! line items are not errors: they are absorbed where they are read.

use thiserror::Error;

/// The main error type for valora operations.
#[derive(Debug, Error)]
pub enum ValoraError {
    /// No usable historical revenue to project from.
    #[error("Insufficient history: {0}")]
    InsufficientHistory(String),

    /// An assumption is out of range or makes a formula undefined.
    #[error("Invalid assumption: {0}")]
    InvalidAssumption(String),

    /// A model is structurally unusable, e.g. it has no projected years or
    /// fails its own consistency checks.
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// A fiscal-year label could not be parsed.
    #[error("Invalid fiscal year: {0}")]
    InvalidFiscalYear(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for ValoraError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for ValoraError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for valora operations.
///
/// This is a convenience type that uses [`ValoraError`] as the error type.
pub type Result<T> = std::result::Result<T, ValoraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValoraError::InsufficientHistory("no revenue".to_string());
        assert_eq!(err.to_string(), "Insufficient history: no revenue");

        let err = ValoraError::InvalidAssumption("projection_years must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid assumption: projection_years must be positive"
        );
    }

    #[test]
    fn test_error_from_str() {
        let err: ValoraError = "boom".into();
        assert!(matches!(err, ValoraError::Other(ref s) if s == "boom"));

        let err: ValoraError = String::from("bang").into();
        assert!(matches!(err, ValoraError::Other(_)));
    }

    #[test]
    fn test_result_type() {
        let ok_result: Result<i32> = Ok(42);
        assert!(ok_result.is_ok());

        let err_result: Result<i32> = Err(ValoraError::InvalidModel("empty".to_string()));
        assert!(err_result.is_err());
    }
}
