//! Cash flow statement derived from consecutive balance sheets.

use valora_traits::{FiscalYear, LineItem, StatementTable};

use crate::balance::BalanceSheet;
use crate::income::IncomeYear;

/// Derived cash flow for one projected year.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CashFlowYear {
    /// Net income.
    pub net_income: f64,
    /// D&A add-back.
    pub depreciation: f64,
    /// Change in working-capital liabilities less change in working-capital assets.
    pub change_in_working_capital: f64,
    /// Cash from operations.
    pub operating: f64,
    /// Capital expenditures, negative for an outflow.
    pub capital_expenditures: f64,
    /// Cash from investing.
    pub investing: f64,
    /// Net borrowing.
    pub change_in_debt: f64,
    /// Net equity issuance.
    pub change_in_paid_in_capital: f64,
    /// Cash from financing.
    pub financing: f64,
    /// Total change in cash.
    pub net_cash_flow: f64,
}

impl CashFlowYear {
    /// Derives the cash flow that moves `prior` to `current`.
    #[must_use]
    pub fn derive(prior: &BalanceSheet, current: &BalanceSheet, income: &IncomeYear, capex: f64) -> Self {
        let change_in_working_capital = (current.working_capital_liabilities()
            - prior.working_capital_liabilities())
            - (current.working_capital_assets() - prior.working_capital_assets());
        let operating = income.net_income + income.depreciation + change_in_working_capital;

        let capital_expenditures = -capex;
        let investing = capital_expenditures;

        let change_in_debt = current.total_debt() - prior.total_debt();
        let change_in_paid_in_capital = current.paid_in_capital - prior.paid_in_capital;
        let financing = change_in_debt + change_in_paid_in_capital;

        Self {
            net_income: income.net_income,
            depreciation: income.depreciation,
            change_in_working_capital,
            operating,
            capital_expenditures,
            investing,
            change_in_debt,
            change_in_paid_in_capital,
            financing,
            net_cash_flow: operating + investing + financing,
        }
    }

    /// Unlevered free cash flow.
    #[must_use]
    pub fn free_cash_flow(&self) -> f64 {
        self.operating + self.investing
    }

    /// Writes every line into `table` for `year`.
    pub fn write_to(&self, table: &mut StatementTable, year: FiscalYear) {
        let lines = [
            (LineItem::NetIncome, self.net_income),
            (LineItem::DepreciationAndAmortization, self.depreciation),
            (LineItem::ChangeInWorkingCapital, self.change_in_working_capital),
            (LineItem::OperatingCashFlow, self.operating),
            (LineItem::CapitalExpenditures, self.capital_expenditures),
            (LineItem::InvestingCashFlow, self.investing),
            (LineItem::ChangeInDebt, self.change_in_debt),
            (LineItem::ChangeInPaidInCapital, self.change_in_paid_in_capital),
            (LineItem::FinancingCashFlow, self.financing),
            (LineItem::NetCashFlow, self.net_cash_flow),
        ];
        for (item, value) in lines {
            table.set(year, item, value);
        }
    }
}
