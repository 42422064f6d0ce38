//! Projector trait for extending historical statements.

use crate::{Assumptions, OperatingModel, Result};

/// Extends a historical operating model into the future.
///
/// Implementations are pure functions of their inputs: no I/O, no interior
/// state. Calling [`Projector::project`] twice with the same inputs must
/// give identical results, and implementations must be thread-safe
/// (`Send + Sync`) so independent requests can run concurrently.
///
/// # Example
///
/// ```
/// use valora_traits::{Assumptions, OperatingModel, Projector, Result};
///
/// struct HistoryOnly;
///
/// impl Projector for HistoryOnly {
///     fn name(&self) -> &str {
///         "history_only"
///     }
///
///     fn project(
///         &self,
///         historical: &OperatingModel,
///         _assumptions: &Assumptions,
///         _years: i32,
///     ) -> Result<OperatingModel> {
///         Ok(historical.clone())
///     }
/// }
/// ```
pub trait Projector: Send + Sync {
    /// Name of the projection method, used in logs.
    fn name(&self) -> &str;

    /// Projects `years` fiscal years after the latest historical year.
    ///
    /// The returned model contains the historical years unchanged followed by
    /// the projected years, with `latest_historical_year` and
    /// `projection_years` set.
    ///
    /// # Errors
    ///
    /// - [`crate::ValoraError::InsufficientHistory`] when no historical year
    ///   reports positive revenue.
    /// - [`crate::ValoraError::InvalidAssumption`] when `years` or any
    ///   assumption is out of range.
    fn project(
        &self,
        historical: &OperatingModel,
        assumptions: &Assumptions,
        years: i32,
    ) -> Result<OperatingModel>;
}
