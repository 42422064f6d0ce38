//! Core schema types: fiscal years, line items and statement kinds.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use derive_more::{Display, From};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValoraError;

/// An ordered fiscal-year key.
///
/// Accepts plain years (`"2023"`), prefixed labels (`"FY2023"`), ISO dates
/// (`"2023-12-31"`, the calendar year is kept) and JSON integers. Always
/// serializes as the bare year string so it can key a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
#[display("{_0}")]
pub struct FiscalYear(i32);

impl FiscalYear {
    /// Creates a fiscal year from its integer value.
    #[must_use]
    pub const fn new(year: i32) -> Self {
        Self(year)
    }

    /// Returns the integer year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.0
    }

    /// Returns the year immediately after this one, or `None` on overflow.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        self.offset(1)
    }

    /// Returns the year `years` after this one, or `None` on overflow.
    #[must_use]
    pub const fn offset(&self, years: i32) -> Option<Self> {
        match self.0.checked_add(years) {
            Some(year) => Some(Self(year)),
            None => None,
        }
    }
}

impl FromStr for FiscalYear {
    type Err = ValoraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let label = trimmed
            .strip_prefix("FY")
            .or_else(|| trimmed.strip_prefix("fy"))
            .unwrap_or(trimmed)
            .trim();

        if !label.is_empty() && label.chars().all(|c| c.is_ascii_digit()) {
            return label
                .parse::<i32>()
                .map(Self)
                .map_err(|e| ValoraError::InvalidFiscalYear(format!("{s}: {e}")));
        }

        NaiveDate::parse_from_str(label, "%Y-%m-%d")
            .map(|date| Self(date.year()))
            .map_err(|_| ValoraError::InvalidFiscalYear(s.to_string()))
    }
}

impl Serialize for FiscalYear {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FiscalYear {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FiscalYearVisitor;

        impl Visitor<'_> for FiscalYearVisitor {
            type Value = FiscalYear;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a fiscal year such as 2023, \"FY2023\" or \"2023-12-31\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                i32::try_from(v)
                    .map(FiscalYear)
                    .map_err(|_| E::custom(format!("fiscal year out of range: {v}")))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i32::try_from(v)
                    .map(FiscalYear)
                    .map_err(|_| E::custom(format!("fiscal year out of range: {v}")))
            }
        }

        deserializer.deserialize_any(FiscalYearVisitor)
    }
}

/// Whether a line item is an additive currency amount or a derived ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Monetary amount in the model's base unit; additive across lines.
    Currency,
    /// Decimal fraction derived from currency lines; never summed.
    Ratio,
}

/// The three financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    /// Income Statement.
    IncomeStatement,
    /// Balance Sheet.
    BalanceSheet,
    /// Cash Flow Statement.
    CashFlow,
}

impl Statement {
    /// All statements in presentation order.
    pub const ALL: [Self; 3] = [Self::IncomeStatement, Self::BalanceSheet, Self::CashFlow];

    /// Human-readable title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "Income Statement",
            Self::BalanceSheet => "Balance Sheet",
            Self::CashFlow => "Cash Flow Statement",
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Canonical line items understood by the engine.
///
/// The historical normalizer may supply additional names; those are kept in
/// the tables but never read by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineItem {
    // Income Statement
    /// Total revenue.
    Revenue,
    /// Cost of goods sold.
    Cogs,
    /// Revenue less COGS.
    GrossProfit,
    /// Selling, general and administrative expense.
    Sga,
    /// Research and development expense.
    ResearchAndDevelopment,
    /// Other operating expenses.
    OtherOperatingExpenses,
    /// Earnings before interest, taxes, depreciation and amortization.
    Ebitda,
    /// Depreciation and amortization.
    DepreciationAndAmortization,
    /// Operating income (EBIT).
    OperatingIncome,
    /// Net non-operating income (positive) or expense (negative).
    OtherIncomeExpenseNet,
    /// Unusual or non-recurring items, signed.
    OtherUnusualItems,
    /// Earnings before tax.
    Ebt,
    /// Income tax expense.
    TaxExpense,
    /// Income attributable to minority interests.
    MinorityInterest,
    /// Net income.
    NetIncome,
    /// Gross profit / revenue.
    GrossMargin,
    /// Operating income / revenue.
    OperatingMargin,
    /// EBITDA / revenue.
    EbitdaMargin,
    /// Net income / revenue.
    NetMargin,
    /// Tax expense / EBT.
    EffectiveTaxRate,
    /// SG&A / revenue.
    SgaPctRevenue,
    /// R&D / revenue.
    ResearchAndDevelopmentPctRevenue,
    /// D&A / revenue.
    DepreciationAndAmortizationPctRevenue,

    // Balance Sheet
    /// Cash and cash equivalents.
    CashAndCashEquivalents,
    /// Short-term investments.
    ShortTermInvestments,
    /// Accounts receivable, net.
    AccountsReceivableNet,
    /// Inventories.
    Inventories,
    /// Other current assets.
    OtherCurrentAssets,
    /// Total current assets.
    TotalCurrentAssets,
    /// Property, plant and equipment, net.
    PropertyPlantAndEquipmentNet,
    /// Other non-current assets.
    OtherNonCurrentAssets,
    /// Total assets.
    TotalAssets,
    /// Accounts payable.
    AccountsPayable,
    /// Deferred revenue.
    DeferredRevenue,
    /// Other current liabilities.
    OtherCurrentLiabilities,
    /// Commercial paper.
    CommercialPaper,
    /// Current portion of term debt.
    TermDebtCurrent,
    /// Total current liabilities.
    TotalCurrentLiabilities,
    /// Non-current term debt.
    TermDebtNonCurrent,
    /// Other non-current liabilities.
    OtherNonCurrentLiabilities,
    /// Total liabilities.
    TotalLiabilities,
    /// Common stock and additional paid-in capital.
    PaidInCapital,
    /// Retained earnings.
    RetainedEarnings,
    /// Total shareholders' equity.
    TotalShareholdersEquity,

    // Cash Flow
    /// Change in operating working capital (cash impact).
    ChangeInWorkingCapital,
    /// Cash from operations.
    OperatingCashFlow,
    /// Capital expenditures, negative when cash is spent.
    CapitalExpenditures,
    /// Cash from investing activities.
    InvestingCashFlow,
    /// Net debt issued (positive) or repaid (negative).
    ChangeInDebt,
    /// Net equity issued.
    ChangeInPaidInCapital,
    /// Cash from financing activities.
    FinancingCashFlow,
    /// Net change in cash.
    NetCashFlow,
    /// |CapEx| / revenue.
    CapExPctRevenue,
}

impl LineItem {
    /// Every canonical line item.
    pub const ALL: [Self; 53] = [
        Self::Revenue,
        Self::Cogs,
        Self::GrossProfit,
        Self::Sga,
        Self::ResearchAndDevelopment,
        Self::OtherOperatingExpenses,
        Self::Ebitda,
        Self::DepreciationAndAmortization,
        Self::OperatingIncome,
        Self::OtherIncomeExpenseNet,
        Self::OtherUnusualItems,
        Self::Ebt,
        Self::TaxExpense,
        Self::MinorityInterest,
        Self::NetIncome,
        Self::GrossMargin,
        Self::OperatingMargin,
        Self::EbitdaMargin,
        Self::NetMargin,
        Self::EffectiveTaxRate,
        Self::SgaPctRevenue,
        Self::ResearchAndDevelopmentPctRevenue,
        Self::DepreciationAndAmortizationPctRevenue,
        Self::CashAndCashEquivalents,
        Self::ShortTermInvestments,
        Self::AccountsReceivableNet,
        Self::Inventories,
        Self::OtherCurrentAssets,
        Self::TotalCurrentAssets,
        Self::PropertyPlantAndEquipmentNet,
        Self::OtherNonCurrentAssets,
        Self::TotalAssets,
        Self::AccountsPayable,
        Self::DeferredRevenue,
        Self::OtherCurrentLiabilities,
        Self::CommercialPaper,
        Self::TermDebtCurrent,
        Self::TotalCurrentLiabilities,
        Self::TermDebtNonCurrent,
        Self::OtherNonCurrentLiabilities,
        Self::TotalLiabilities,
        Self::PaidInCapital,
        Self::RetainedEarnings,
        Self::TotalShareholdersEquity,
        Self::ChangeInWorkingCapital,
        Self::OperatingCashFlow,
        Self::CapitalExpenditures,
        Self::InvestingCashFlow,
        Self::ChangeInDebt,
        Self::ChangeInPaidInCapital,
        Self::FinancingCashFlow,
        Self::NetCashFlow,
        Self::CapExPctRevenue,
    ];

    /// Canonical name as it appears in statement tables.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::Cogs => "COGS",
            Self::GrossProfit => "GrossProfit",
            Self::Sga => "SG&A",
            Self::ResearchAndDevelopment => "R&D",
            Self::OtherOperatingExpenses => "OtherOperatingExpenses",
            Self::Ebitda => "EBITDA",
            Self::DepreciationAndAmortization => "D&A",
            Self::OperatingIncome => "OperatingIncome",
            Self::OtherIncomeExpenseNet => "OtherIncomeExpenseNet",
            Self::OtherUnusualItems => "OtherUnusualItems",
            Self::Ebt => "EBT",
            Self::TaxExpense => "TaxExpense",
            Self::MinorityInterest => "MinorityInterest",
            Self::NetIncome => "NetIncome",
            Self::GrossMargin => "GrossMargin",
            Self::OperatingMargin => "OperatingMargin",
            Self::EbitdaMargin => "EBITDAMargin",
            Self::NetMargin => "NetMargin",
            Self::EffectiveTaxRate => "EffectiveTaxRate",
            Self::SgaPctRevenue => "SG&APctRevenue",
            Self::ResearchAndDevelopmentPctRevenue => "R&DPctRevenue",
            Self::DepreciationAndAmortizationPctRevenue => "D&APctRevenue",
            Self::CashAndCashEquivalents => "CashAndCashEquivalents",
            Self::ShortTermInvestments => "ShortTermInvestments",
            Self::AccountsReceivableNet => "AccountsReceivableNet",
            Self::Inventories => "Inventories",
            Self::OtherCurrentAssets => "OtherCurrentAssets",
            Self::TotalCurrentAssets => "TotalCurrentAssets",
            Self::PropertyPlantAndEquipmentNet => "PropertyPlantAndEquipmentNet",
            Self::OtherNonCurrentAssets => "OtherNonCurrentAssets",
            Self::TotalAssets => "TotalAssets",
            Self::AccountsPayable => "AccountsPayable",
            Self::DeferredRevenue => "DeferredRevenue",
            Self::OtherCurrentLiabilities => "OtherCurrentLiabilities",
            Self::CommercialPaper => "CommercialPaper",
            Self::TermDebtCurrent => "TermDebtCurrent",
            Self::TotalCurrentLiabilities => "TotalCurrentLiabilities",
            Self::TermDebtNonCurrent => "TermDebtNonCurrent",
            Self::OtherNonCurrentLiabilities => "OtherNonCurrentLiabilities",
            Self::TotalLiabilities => "TotalLiabilities",
            Self::PaidInCapital => "PaidInCapital",
            Self::RetainedEarnings => "RetainedEarnings",
            Self::TotalShareholdersEquity => "TotalShareholdersEquity",
            Self::ChangeInWorkingCapital => "ChangeInWorkingCapital",
            Self::OperatingCashFlow => "OperatingCashFlow",
            Self::CapitalExpenditures => "CapitalExpenditures",
            Self::InvestingCashFlow => "InvestingCashFlow",
            Self::ChangeInDebt => "ChangeInDebt",
            Self::ChangeInPaidInCapital => "ChangeInPaidInCapital",
            Self::FinancingCashFlow => "FinancingCashFlow",
            Self::NetCashFlow => "NetCashFlow",
            Self::CapExPctRevenue => "CapExPctRevenue",
        }
    }

    /// Looks up a canonical line item by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|item| item.as_str() == name)
    }

    /// Whether the item is a currency amount or a derived ratio.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::GrossMargin
            | Self::OperatingMargin
            | Self::EbitdaMargin
            | Self::NetMargin
            | Self::EffectiveTaxRate
            | Self::SgaPctRevenue
            | Self::ResearchAndDevelopmentPctRevenue
            | Self::DepreciationAndAmortizationPctRevenue
            | Self::CapExPctRevenue => ItemKind::Ratio,
            _ => ItemKind::Currency,
        }
    }

    /// Returns true for derived ratio items.
    #[must_use]
    pub const fn is_ratio(&self) -> bool {
        matches!(self.kind(), ItemKind::Ratio)
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies any line-item name, canonical or not.
///
/// Canonical items use their declared kind. Unknown names ending in
/// `PctRevenue`, `Margin` or `Rate` are ratios; everything else is currency.
#[must_use]
pub fn is_ratio_name(name: &str) -> bool {
    LineItem::from_name(name).map_or_else(
        || name.ends_with("PctRevenue") || name.ends_with("Margin") || name.ends_with("Rate"),
        |item| item.is_ratio(),
    )
}
