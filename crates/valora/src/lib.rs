#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ## Crate Organization
//!
//! - [`traits`] - Statement schema, assumptions and the engine seams
//! - [`model`] - The three-statement projector
//! - [`dcf`] - Discounted cash flow valuation

/// The version of the valora crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod pipeline;

pub use pipeline::{Pipeline, Valuation, calculate};

// ============================================================================
// Core Traits and Types
// ============================================================================

/// Statement schema, assumptions, errors and the engine traits.
///
/// - [`Projector`] - Extends historical statements into the future
/// - [`Valuator`] - Values a projected operating model
pub mod traits {
    pub use valora_traits::*;
}

// Re-export core traits at top level for convenience
pub use valora_traits::{Projector, Valuator};

// Re-export error types
pub use valora_traits::{Result, ValoraError};

// Re-export common types
pub use valora_traits::{
    Assumptions, CostOfCapital, DcfResult, FiscalYear, LineItem, OperatingModel, Statement,
    StatementTable,
};

// ============================================================================
// Projection
// ============================================================================

/// Operating model projection.
///
/// [`OperatingModelProjector`] resolves missing drivers from history, then
/// rolls the Income Statement, Balance Sheet and Cash Flow forward one year at
/// a time with cash as the balancing item.
///
/// # Example
///
/// ```ignore
/// use valora::model::{OperatingModelProjector, ProjectorConfig};
/// use valora::{Assumptions, Projector};
///
/// let projector = OperatingModelProjector::new(ProjectorConfig::default());
/// let model = projector.project(&historical, &Assumptions::default(), 5)?;
/// ```
pub mod model {
    pub use valora_model::*;
}

pub use valora_model::{OperatingModelProjector, ProjectorConfig};

// ============================================================================
// Valuation
// ============================================================================

/// Discounted cash flow valuation.
///
/// ## Key Components
///
/// - [`DcfEngine`] - WACC discounting with a Gordon growth terminal value
/// - [`cost_of_capital`](dcf::cost_of_capital) - CAPM and WACC breakdown
pub mod dcf {
    pub use valora_dcf::*;
}

pub use valora_dcf::DcfEngine;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }

    #[test]
    fn test_engines_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OperatingModelProjector>();
        assert_send_sync::<DcfEngine>();
        assert_send_sync::<Pipeline>();
        assert_send_sync::<Valuation>();
    }
}
