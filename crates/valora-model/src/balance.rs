//! Balance sheet state: opening position and roll-forward.

use valora_traits::{FiscalYear, LineItem, StatementTable};

use crate::history::HistoricalDrivers;
use crate::income::IncomeYear;
use crate::resolve::ResolvedAssumptions;

/// Full balance sheet for one fiscal year.
///
/// Subtotals are never stored; they are derived from the components so the
/// sheet cannot disagree with itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceSheet {
    /// Cash and cash equivalents.
    pub cash: f64,
    /// Short-term investments.
    pub short_term_investments: f64,
    /// Accounts receivable, net.
    pub receivables: f64,
    /// Inventories.
    pub inventories: f64,
    /// Other current assets.
    pub other_current_assets: f64,
    /// Property, plant and equipment, net.
    pub ppe: f64,
    /// Other non-current assets.
    pub other_non_current_assets: f64,
    /// Accounts payable.
    pub payables: f64,
    /// Deferred revenue.
    pub deferred_revenue: f64,
    /// Other current liabilities.
    pub other_current_liabilities: f64,
    /// Commercial paper.
    pub commercial_paper: f64,
    /// Current portion of term debt.
    pub term_debt_current: f64,
    /// Non-current term debt.
    pub term_debt_non_current: f64,
    /// Other non-current liabilities.
    pub other_non_current_liabilities: f64,
    /// Common stock and paid-in capital.
    pub paid_in_capital: f64,
    /// Retained earnings.
    pub retained_earnings: f64,
    /// Total shareholders' equity.
    pub total_equity: f64,
}

impl BalanceSheet {
    /// Reads the opening position for `year` from a historical table.
    ///
    /// Missing components count as zero. A reported subtotal that differs
    /// from the sum of its components has the residual folded into the
    /// "other" line at the same level, and any remaining gap between assets
    /// and liabilities plus equity is folded into other non-current
    /// liabilities. The result always balances.
    #[must_use]
    pub fn opening(table: &StatementTable, year: FiscalYear, tolerance: f64) -> Self {
        if !table.contains_year(year) {
            tracing::warn!(%year, "no balance sheet for the latest historical year, opening from zero");
            return Self::default();
        }

        let v = |item| table.value(year, item);
        let mut sheet = Self {
            cash: v(LineItem::CashAndCashEquivalents),
            short_term_investments: v(LineItem::ShortTermInvestments),
            receivables: v(LineItem::AccountsReceivableNet),
            inventories: v(LineItem::Inventories),
            other_current_assets: v(LineItem::OtherCurrentAssets),
            ppe: v(LineItem::PropertyPlantAndEquipmentNet),
            other_non_current_assets: v(LineItem::OtherNonCurrentAssets),
            payables: v(LineItem::AccountsPayable),
            deferred_revenue: v(LineItem::DeferredRevenue),
            other_current_liabilities: v(LineItem::OtherCurrentLiabilities),
            commercial_paper: v(LineItem::CommercialPaper),
            term_debt_current: v(LineItem::TermDebtCurrent),
            term_debt_non_current: v(LineItem::TermDebtNonCurrent),
            other_non_current_liabilities: v(LineItem::OtherNonCurrentLiabilities),
            paid_in_capital: v(LineItem::PaidInCapital),
            retained_earnings: v(LineItem::RetainedEarnings),
            total_equity: 0.0,
        };

        if let Some(reported) = table.get(year, LineItem::TotalCurrentAssets) {
            sheet.other_current_assets += reported - sheet.total_current_assets();
        }
        if let Some(reported) = table.get(year, LineItem::TotalAssets) {
            sheet.other_non_current_assets += reported - sheet.total_assets();
        }
        if let Some(reported) = table.get(year, LineItem::TotalCurrentLiabilities) {
            sheet.other_current_liabilities += reported - sheet.total_current_liabilities();
        }
        if let Some(reported) = table.get(year, LineItem::TotalLiabilities) {
            sheet.other_non_current_liabilities += reported - sheet.total_liabilities();
        }
        sheet.total_equity = table
            .get(year, LineItem::TotalShareholdersEquity)
            .unwrap_or(sheet.paid_in_capital + sheet.retained_earnings);

        let imbalance = sheet.imbalance();
        if imbalance.abs() > tolerance {
            tracing::warn!(
                %year,
                imbalance,
                "historical balance sheet does not balance, folding gap into other non-current liabilities"
            );
        }
        sheet.other_non_current_liabilities += imbalance;

        sheet
    }

    /// Rolls the sheet forward one year.
    ///
    /// Returns the new sheet and the capital expenditure that funded the
    /// change in PP&E. Cash is computed last as the balancing amount.
    #[must_use]
    pub fn roll_forward(
        &self,
        income: &IncomeYear,
        resolved: &ResolvedAssumptions,
        drivers: &HistoricalDrivers,
    ) -> (Self, f64) {
        let revenue = income.revenue;
        let wc = &drivers.working_capital;
        let capex = revenue * drivers.capex_percent;

        let mut term_debt_non_current = self.term_debt_non_current;
        if let Some(target) = resolved.target_debt_to_equity {
            let target_debt = target * self.total_equity;
            term_debt_non_current += target_debt - self.total_debt();
        }

        let mut next = Self {
            cash: 0.0,
            short_term_investments: self.short_term_investments,
            receivables: revenue * wc.receivables,
            inventories: revenue * wc.inventories,
            other_current_assets: revenue * wc.other_current_assets,
            ppe: self.ppe + capex - income.depreciation,
            other_non_current_assets: self.other_non_current_assets,
            payables: revenue * wc.payables,
            deferred_revenue: revenue * wc.deferred_revenue,
            other_current_liabilities: revenue * wc.other_current_liabilities,
            commercial_paper: self.commercial_paper,
            term_debt_current: self.term_debt_current,
            term_debt_non_current,
            other_non_current_liabilities: self.other_non_current_liabilities,
            paid_in_capital: self.paid_in_capital,
            retained_earnings: self.retained_earnings + income.net_income,
            total_equity: self.total_equity + income.net_income,
        };
        next.cash = next.total_liabilities() + next.total_equity - next.non_cash_assets();

        (next, capex)
    }

    /// Receivables, inventories and other current assets.
    #[must_use]
    pub fn working_capital_assets(&self) -> f64 {
        self.receivables + self.inventories + self.other_current_assets
    }

    /// Payables, deferred revenue and other current liabilities.
    #[must_use]
    pub fn working_capital_liabilities(&self) -> f64 {
        self.payables + self.deferred_revenue + self.other_current_liabilities
    }

    /// Commercial paper plus current and non-current term debt.
    #[must_use]
    pub fn total_debt(&self) -> f64 {
        self.commercial_paper + self.term_debt_current + self.term_debt_non_current
    }

    /// Every asset except cash.
    #[must_use]
    pub fn non_cash_assets(&self) -> f64 {
        self.short_term_investments
            + self.working_capital_assets()
            + self.ppe
            + self.other_non_current_assets
    }

    /// Cash, short-term investments and working-capital assets.
    #[must_use]
    pub fn total_current_assets(&self) -> f64 {
        self.cash + self.short_term_investments + self.working_capital_assets()
    }

    /// Total assets.
    #[must_use]
    pub fn total_assets(&self) -> f64 {
        self.cash + self.non_cash_assets()
    }

    /// Working-capital liabilities plus short-term borrowings.
    #[must_use]
    pub fn total_current_liabilities(&self) -> f64 {
        self.working_capital_liabilities() + self.commercial_paper + self.term_debt_current
    }

    /// Total liabilities.
    #[must_use]
    pub fn total_liabilities(&self) -> f64 {
        self.total_current_liabilities()
            + self.term_debt_non_current
            + self.other_non_current_liabilities
    }

    /// Assets minus liabilities and equity.
    #[must_use]
    pub fn imbalance(&self) -> f64 {
        self.total_assets() - (self.total_liabilities() + self.total_equity)
    }

    /// Writes every line and subtotal into `table` for `year`.
    pub fn write_to(&self, table: &mut StatementTable, year: FiscalYear) {
        let lines = [
            (LineItem::CashAndCashEquivalents, self.cash),
            (LineItem::ShortTermInvestments, self.short_term_investments),
            (LineItem::AccountsReceivableNet, self.receivables),
            (LineItem::Inventories, self.inventories),
            (LineItem::OtherCurrentAssets, self.other_current_assets),
            (LineItem::TotalCurrentAssets, self.total_current_assets()),
            (LineItem::PropertyPlantAndEquipmentNet, self.ppe),
            (LineItem::OtherNonCurrentAssets, self.other_non_current_assets),
            (LineItem::TotalAssets, self.total_assets()),
            (LineItem::AccountsPayable, self.payables),
            (LineItem::DeferredRevenue, self.deferred_revenue),
            (LineItem::OtherCurrentLiabilities, self.other_current_liabilities),
            (LineItem::CommercialPaper, self.commercial_paper),
            (LineItem::TermDebtCurrent, self.term_debt_current),
            (LineItem::TotalCurrentLiabilities, self.total_current_liabilities()),
            (LineItem::TermDebtNonCurrent, self.term_debt_non_current),
            (LineItem::OtherNonCurrentLiabilities, self.other_non_current_liabilities),
            (LineItem::TotalLiabilities, self.total_liabilities()),
            (LineItem::PaidInCapital, self.paid_in_capital),
            (LineItem::RetainedEarnings, self.retained_earnings),
            (LineItem::TotalShareholdersEquity, self.total_equity),
        ];
        for (item, value) in lines {
            table.set(year, item, value);
        }
    }
}
