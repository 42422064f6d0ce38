//! Income statement projection for a single year.

use valora_traits::{FiscalYear, LineItem, StatementTable};

use crate::history::HistoricalDrivers;
use crate::resolve::ResolvedAssumptions;

/// Projected income statement amounts for one year.
///
/// Expenses are positive magnitudes that are subtracted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IncomeYear {
    /// Revenue.
    pub revenue: f64,
    /// Cost of goods sold.
    pub cogs: f64,
    /// Revenue less COGS.
    pub gross_profit: f64,
    /// SG&A.
    pub sga: f64,
    /// Research and development.
    pub research_and_development: f64,
    /// Other operating expenses.
    pub other_operating_expenses: f64,
    /// Gross profit less cash operating expenses.
    pub ebitda: f64,
    /// Depreciation and amortization.
    pub depreciation: f64,
    /// EBITDA less D&A.
    pub operating_income: f64,
    /// Net other income (expense).
    pub other_income: f64,
    /// Unusual items.
    pub unusual_items: f64,
    /// Earnings before tax.
    pub ebt: f64,
    /// Tax expense.
    pub tax: f64,
    /// Minority interest.
    pub minority_interest: f64,
    /// Net income.
    pub net_income: f64,
}

impl IncomeYear {
    /// Projects the year following one with `prior_revenue`.
    #[must_use]
    pub fn project(
        prior_revenue: f64,
        resolved: &ResolvedAssumptions,
        drivers: &HistoricalDrivers,
    ) -> Self {
        let revenue = prior_revenue * (1.0 + resolved.revenue_growth);
        let cogs = revenue * (1.0 - resolved.gross_margin);
        let gross_profit = revenue - cogs;

        let sga = revenue * resolved.sga_percent;
        let research_and_development = revenue * drivers.rnd_percent;
        let other_operating_expenses = revenue * drivers.other_opex_percent;
        let ebitda = gross_profit - sga - research_and_development - other_operating_expenses;

        let depreciation = revenue * drivers.da_percent;
        let operating_income = ebitda - depreciation;

        let other_income = drivers.other_income.amount(revenue);
        let unusual_items = drivers.unusual_items.amount(revenue);
        let ebt = operating_income + other_income + unusual_items;

        let tax = ebt * resolved.tax_rate;
        let minority_interest = drivers.minority_interest;
        let net_income = ebt - tax - minority_interest;

        Self {
            revenue,
            cogs,
            gross_profit,
            sga,
            research_and_development,
            other_operating_expenses,
            ebitda,
            depreciation,
            operating_income,
            other_income,
            unusual_items,
            ebt,
            tax,
            minority_interest,
            net_income,
        }
    }

    /// Writes the absolute amounts into `table` for `year`.
    ///
    /// Ratio views are added separately by [`crate::ratios`].
    pub fn write_to(&self, table: &mut StatementTable, year: FiscalYear) {
        let lines = [
            (LineItem::Revenue, self.revenue),
            (LineItem::Cogs, self.cogs),
            (LineItem::GrossProfit, self.gross_profit),
            (LineItem::Sga, self.sga),
            (LineItem::ResearchAndDevelopment, self.research_and_development),
            (LineItem::OtherOperatingExpenses, self.other_operating_expenses),
            (LineItem::Ebitda, self.ebitda),
            (LineItem::DepreciationAndAmortization, self.depreciation),
            (LineItem::OperatingIncome, self.operating_income),
            (LineItem::OtherIncomeExpenseNet, self.other_income),
            (LineItem::OtherUnusualItems, self.unusual_items),
            (LineItem::Ebt, self.ebt),
            (LineItem::TaxExpense, self.tax),
            (LineItem::MinorityInterest, self.minority_interest),
            (LineItem::NetIncome, self.net_income),
        ];
        for (item, value) in lines {
            table.set(year, item, value);
        }
    }
}
