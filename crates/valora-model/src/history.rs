//! Driver ratios computed once from the historical statements.

use valora_traits::{FiscalYear, LineItem, OperatingModel, Result, StatementTable, ValoraError};

use crate::balance::BalanceSheet;

/// How a below-the-line item is carried into the projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BelowTheLine {
    /// Signed fraction of revenue.
    PercentOfRevenue(f64),
    /// Fixed absolute amount.
    Flat(f64),
}

impl BelowTheLine {
    /// Projected amount for a year with `revenue`.
    #[must_use]
    pub fn amount(&self, revenue: f64) -> f64 {
        match *self {
            Self::PercentOfRevenue(pct) => revenue * pct,
            Self::Flat(value) => value,
        }
    }
}

/// Working-capital balances as fractions of revenue.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorkingCapitalRatios {
    /// Accounts receivable.
    pub receivables: f64,
    /// Inventories.
    pub inventories: f64,
    /// Other current assets.
    pub other_current_assets: f64,
    /// Accounts payable.
    pub payables: f64,
    /// Deferred revenue.
    pub deferred_revenue: f64,
    /// Other current liabilities.
    pub other_current_liabilities: f64,
}

impl WorkingCapitalRatios {
    /// Ratios of the working-capital lines of `sheet` to `revenue`.
    ///
    /// Subtotal residuals folded into the other current lines by
    /// [`BalanceSheet::opening`] are included.
    #[must_use]
    pub fn of(sheet: &BalanceSheet, revenue: f64) -> Self {
        if revenue <= 0.0 {
            return Self::default();
        }
        Self {
            receivables: sheet.receivables / revenue,
            inventories: sheet.inventories / revenue,
            other_current_assets: sheet.other_current_assets / revenue,
            payables: sheet.payables / revenue,
            deferred_revenue: sheet.deferred_revenue / revenue,
            other_current_liabilities: sheet.other_current_liabilities / revenue,
        }
    }
}

/// Everything the projection needs from history.
///
/// Percentages are means of `|item| / Revenue` over years with positive
/// revenue, and fall back to zero when the item was never reported.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalDrivers {
    /// Last historical fiscal year.
    pub latest_year: FiscalYear,
    /// Revenue of the latest year reporting positive revenue.
    pub anchor_revenue: f64,
    /// Mean year-over-year revenue growth.
    pub revenue_growth: f64,
    /// Mean gross margin.
    pub gross_margin: f64,
    /// Mean SG&A percentage.
    pub sga_percent: f64,
    /// Mean R&D percentage.
    pub rnd_percent: f64,
    /// Mean other operating expense percentage.
    pub other_opex_percent: f64,
    /// Mean D&A percentage.
    pub da_percent: f64,
    /// Mean capital expenditure percentage.
    pub capex_percent: f64,
    /// Projection rule for net other income.
    pub other_income: BelowTheLine,
    /// Projection rule for unusual items.
    pub unusual_items: BelowTheLine,
    /// Minority interest, held flat.
    pub minority_interest: f64,
    /// Reconciled balance sheet of the latest historical year.
    pub opening_balance: BalanceSheet,
    /// Working-capital ratios of the opening balance sheet to anchor revenue.
    pub working_capital: WorkingCapitalRatios,
}

impl HistoricalDrivers {
    /// Computes the drivers from the historical part of `model`.
    ///
    /// Years after the model's latest historical year are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ValoraError::InsufficientHistory`] when no historical year
    /// reports positive revenue.
    pub fn from_history(model: &OperatingModel, tolerance: f64) -> Result<Self> {
        let latest_year = model
            .latest_historical_year()
            .ok_or_else(|| ValoraError::InsufficientHistory("model has no fiscal years".into()))?;

        let income = model.income_statement.through(latest_year);
        let balance = model.balance_sheet.through(latest_year);
        let cash_flow = model.cash_flow.through(latest_year);

        let revenue: Vec<(FiscalYear, f64)> = income
            .series(LineItem::Revenue)
            .filter(|(_, v)| *v > 0.0)
            .collect();
        let Some(&(_, anchor_revenue)) = revenue.last() else {
            return Err(ValoraError::InsufficientHistory(
                "no historical year reports positive revenue".into(),
            ));
        };

        let history = History {
            income: &income,
            cash_flow: &cash_flow,
            revenue: &revenue,
        };

        let gross_margin = mean(revenue.iter().filter_map(|&(year, rev)| {
            income
                .get(year, LineItem::GrossProfit)
                .or_else(|| income.get(year, LineItem::Cogs).map(|cogs| rev - cogs.abs()))
                .map(|gp| gp / rev)
        }));

        let opening_balance = BalanceSheet::opening(&balance, latest_year, tolerance);
        let working_capital = WorkingCapitalRatios::of(&opening_balance, anchor_revenue);

        Ok(Self {
            latest_year,
            anchor_revenue,
            revenue_growth: or_zero("revenue_growth", mean_growth(&income)),
            gross_margin: or_zero("gross_margin", gross_margin),
            sga_percent: history.percent(LineItem::Sga),
            rnd_percent: history.percent(LineItem::ResearchAndDevelopment),
            other_opex_percent: history.percent(LineItem::OtherOperatingExpenses),
            da_percent: history.percent(LineItem::DepreciationAndAmortization),
            capex_percent: history.percent(LineItem::CapitalExpenditures),
            other_income: history.below_the_line(LineItem::OtherIncomeExpenseNet),
            unusual_items: history.below_the_line(LineItem::OtherUnusualItems),
            minority_interest: income
                .series(LineItem::MinorityInterest)
                .next_back()
                .map_or(0.0, |(_, v)| v),
            opening_balance,
            working_capital,
        })
    }
}

struct History<'a> {
    income: &'a StatementTable,
    cash_flow: &'a StatementTable,
    revenue: &'a [(FiscalYear, f64)],
}

impl History<'_> {
    /// Reported value of `item`, reading D&A from the cash flow add-back and
    /// CapEx from the cash flow statement.
    fn reported(&self, year: FiscalYear, item: LineItem) -> Option<f64> {
        match item {
            LineItem::CapitalExpenditures => self.cash_flow.get(year, item),
            LineItem::DepreciationAndAmortization => self
                .income
                .get(year, item)
                .or_else(|| self.cash_flow.get(year, item)),
            _ => self.income.get(year, item),
        }
    }

    fn percent(&self, item: LineItem) -> f64 {
        let ratio = mean(
            self.revenue
                .iter()
                .filter_map(|&(year, rev)| self.reported(year, item).map(|v| v.abs() / rev)),
        );
        or_zero(item.as_str(), ratio)
    }

    fn below_the_line(&self, item: LineItem) -> BelowTheLine {
        let ratios: Vec<f64> = self
            .revenue
            .iter()
            .filter_map(|&(year, rev)| self.income.get(year, item).map(|v| v / rev))
            .collect();
        if ratios.len() >= 2 {
            return BelowTheLine::PercentOfRevenue(ratios.iter().sum::<f64>() / ratios.len() as f64);
        }
        let last = self.income.series(item).next_back().map(|(_, v)| v);
        BelowTheLine::Flat(or_zero(item.as_str(), last))
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn or_zero(name: &str, value: Option<f64>) -> f64 {
    value.unwrap_or_else(|| {
        tracing::debug!(line_item = name, "missing line item, driver defaults to zero");
        0.0
    })
}

/// Mean of `(cur - prev) / |prev|` over consecutive fiscal years reporting
/// revenue.
fn mean_growth(income: &StatementTable) -> Option<f64> {
    let years: Vec<FiscalYear> = income.years().collect();
    mean(years.windows(2).filter_map(|pair| {
        if pair[0].next() != Some(pair[1]) {
            return None;
        }
        let prev = income.get(pair[0], LineItem::Revenue)?;
        let cur = income.get(pair[1], LineItem::Revenue)?;
        (prev != 0.0).then(|| (cur - prev) / prev.abs())
    }))
}
