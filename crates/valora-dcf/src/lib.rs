#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/valora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # Example
//!
//! ```rust,ignore
//! use valora_dcf::DcfEngine;
//! use valora_traits::Valuator;
//!
//! let result = DcfEngine::new().value(&projected_model, &assumptions)?;
//! println!("enterprise value: {:.0}", result.enterprise_value);
//! ```

/// The version of the valora-dcf crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod engine;
pub mod fcf;
pub mod terminal;
pub mod wacc;

// Re-export main types
pub use engine::{DcfEngine, net_debt};
pub use fcf::{discount, discount_factor, free_cash_flows};
pub use terminal::gordon_growth;
pub use wacc::{after_tax_cost_of_debt, cost_of_capital, cost_of_equity};
