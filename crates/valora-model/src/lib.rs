#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// The version of the valora-model crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod balance;
pub mod cash_flow;
pub mod history;
pub mod income;
pub mod projector;
pub mod ratios;
pub mod resolve;

// Re-export main types
pub use balance::BalanceSheet;
pub use cash_flow::CashFlowYear;
pub use history::{BelowTheLine, HistoricalDrivers, WorkingCapitalRatios};
pub use income::IncomeYear;
pub use projector::{OperatingModelProjector, ProjectorConfig, check_invariants};
pub use resolve::{AssumptionSource, ResolvedAssumptions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
