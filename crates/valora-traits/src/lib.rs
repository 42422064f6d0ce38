#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core schema and trait definitions for the valora modeling engine.
//!
//! This crate provides the data model shared by the projector and the
//! valuation engine, the error taxonomy, and the [`Projector`] and
//! [`Valuator`] seams.

/// The version of the valora-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod assumptions;
pub mod error;
pub mod model;
pub mod projector;
pub mod table;
pub mod types;
pub mod valuation;

// Re-exports
pub use assumptions::{Assumptions, MAX_PROJECTION_YEARS, validate_years};
pub use error::{Result, ValoraError};
pub use model::OperatingModel;
pub use projector::Projector;
pub use table::{Row, StatementTable};
pub use types::{FiscalYear, ItemKind, LineItem, Statement, is_ratio_name};
pub use valuation::{CostOfCapital, DcfResult, Valuator};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
