//! The three-statement operating model.

use serde::{Deserialize, Serialize};

use crate::table::StatementTable;
use crate::types::{FiscalYear, Statement};

/// Income Statement, Balance Sheet and Cash Flow across fiscal years.
///
/// A model handed over by the historical normalizer has
/// `projection_years == 0`. A projected model records the last historical year
/// so consumers can split the timeline without guessing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingModel {
    /// Income Statement.
    #[serde(default)]
    pub income_statement: StatementTable,
    /// Balance Sheet.
    #[serde(default)]
    pub balance_sheet: StatementTable,
    /// Cash Flow Statement.
    #[serde(default)]
    pub cash_flow: StatementTable,
    /// Last historical fiscal year; `None` lets it be inferred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_historical_year: Option<FiscalYear>,
    /// Number of projected years following the latest historical year.
    #[serde(default)]
    pub projection_years: usize,
}

impl OperatingModel {
    /// Builds a purely historical model.
    #[must_use]
    pub const fn historical(
        income_statement: StatementTable,
        balance_sheet: StatementTable,
        cash_flow: StatementTable,
    ) -> Self {
        Self {
            income_statement,
            balance_sheet,
            cash_flow,
            latest_historical_year: None,
            projection_years: 0,
        }
    }

    /// Access a statement by kind.
    #[must_use]
    pub const fn statement(&self, statement: Statement) -> &StatementTable {
        match statement {
            Statement::IncomeStatement => &self.income_statement,
            Statement::BalanceSheet => &self.balance_sheet,
            Statement::CashFlow => &self.cash_flow,
        }
    }

    /// Last historical fiscal year.
    ///
    /// Uses the recorded boundary when present. Otherwise every year in the
    /// model is historical, so the latest year across the statements is taken,
    /// preferring the Income Statement.
    #[must_use]
    pub fn latest_historical_year(&self) -> Option<FiscalYear> {
        self.latest_historical_year.or_else(|| {
            self.income_statement.last_year().or_else(|| {
                self.balance_sheet
                    .last_year()
                    .into_iter()
                    .chain(self.cash_flow.last_year())
                    .max()
            })
        })
    }

    /// Projected fiscal years in ascending order.
    #[must_use]
    pub fn projected_years(&self) -> Vec<FiscalYear> {
        match self.latest_historical_year() {
            Some(latest) if self.projection_years > 0 => (1..=self.projection_years)
                .filter_map(|offset| i32::try_from(offset).ok())
                .map_while(|offset| latest.offset(offset))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Whether `year` lies in the projected part of the timeline.
    #[must_use]
    pub fn is_projected(&self, year: FiscalYear) -> bool {
        self.projection_years > 0
            && self
                .latest_historical_year()
                .is_some_and(|latest| year > latest)
    }

    /// Whether the model has any data at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.income_statement.is_empty() && self.balance_sheet.is_empty() && self.cash_flow.is_empty()
    }
}
