//! Text rendering of statements and valuation results.

use std::fmt::Write;

use valora::{
    CostOfCapital, DcfResult, LineItem, OperatingModel, Statement, StatementTable,
    traits::is_ratio_name,
};

const LABEL_WIDTH: usize = 30;
const COLUMN_WIDTH: usize = 14;

/// Presentation scale for currency amounts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Scale {
    divisor: f64,
    suffix: &'static str,
}

impl Scale {
    /// Choose the scale for the `--millions` flag.
    pub(crate) const fn new(millions: bool) -> Self {
        if millions {
            Self {
                divisor: 1.0e6,
                suffix: " (millions)",
            }
        } else {
            Self {
                divisor: 1.0,
                suffix: "",
            }
        }
    }

    /// Format a currency amount.
    pub(crate) fn currency(&self, value: f64) -> String {
        format!("{:.2}", value / self.divisor)
    }
}

/// Format one cell; ratios are shown as percentages.
pub(crate) fn cell(name: &str, value: f64, scale: Scale) -> String {
    if is_ratio_name(name) {
        format!("{:.2}%", value * 100.0)
    } else {
        scale.currency(value)
    }
}

/// Line-item names in presentation order.
///
/// Canonical items come first in schema order; other reported names follow
/// alphabetically.
pub(crate) fn ordered_items(table: &StatementTable) -> Vec<String> {
    let mut names: Vec<&String> = table.iter().flat_map(|(_, row)| row.keys()).collect();
    names.sort();
    names.dedup();

    let mut ordered: Vec<String> = LineItem::ALL
        .iter()
        .map(LineItem::as_str)
        .filter(|name| names.iter().any(|n| n.as_str() == *name))
        .map(str::to_string)
        .collect();
    ordered.extend(
        names
            .into_iter()
            .filter(|n| LineItem::from_name(n).is_none())
            .cloned(),
    );
    ordered
}

/// Render one statement as a table, years across.
///
/// Projected years carry an `E` suffix.
pub(crate) fn statement(model: &OperatingModel, statement: Statement, scale: Scale) -> String {
    let table = model.statement(statement);
    let mut out = String::new();
    let _ = writeln!(out, "{}{}", statement.title(), scale.suffix);
    let years: Vec<_> = table.years().collect();

    let _ = write!(out, "{:<LABEL_WIDTH$}", "");
    for year in &years {
        let label = if model.is_projected(*year) {
            format!("{year}E")
        } else {
            year.to_string()
        };
        let _ = write!(out, "{label:>COLUMN_WIDTH$}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "─".repeat(LABEL_WIDTH + COLUMN_WIDTH * years.len()));

    for name in ordered_items(table) {
        let _ = write!(out, "{name:<LABEL_WIDTH$}");
        for year in &years {
            let text = table
                .get_named(*year, &name)
                .map_or_else(|| "-".to_string(), |v| cell(&name, v, scale));
            let _ = write!(out, "{text:>COLUMN_WIDTH$}");
        }
        let _ = writeln!(out);
    }
    out
}

/// Render the cost of capital breakdown.
pub(crate) fn cost_of_capital(coc: &CostOfCapital) -> String {
    let rows = [
        ("Cost of equity", coc.cost_of_equity),
        ("After-tax cost of debt", coc.after_tax_cost_of_debt),
        ("Equity weight", coc.equity_weight),
        ("Debt weight", coc.debt_weight),
        ("WACC", coc.wacc),
    ];
    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<LABEL_WIDTH$}{:>COLUMN_WIDTH$}", format!("{:.2}%", value * 100.0));
    }
    out
}

/// Render a DCF result: per-year flows then the value bridge.
pub(crate) fn dcf(result: &DcfResult, scale: Scale) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Free cash flow{}", scale.suffix);
    let _ = writeln!(
        out,
        "{:<LABEL_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}",
        "Year", "FCF", "PV"
    );
    let _ = writeln!(out, "{}", "─".repeat(LABEL_WIDTH + COLUMN_WIDTH * 2));
    for (year, fcf) in &result.free_cash_flows {
        let pv = result.present_value_fcf.get(year).copied().unwrap_or(0.0);
        let _ = writeln!(
            out,
            "{:<LABEL_WIDTH$}{:>COLUMN_WIDTH$}{:>COLUMN_WIDTH$}",
            format!("{year}E"),
            scale.currency(*fcf),
            scale.currency(pv)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Valuation{}", scale.suffix);
    let bridge = [
        ("Sum of PV of FCF", result.total_pv_fcf),
        ("Terminal value", result.terminal_value),
        ("PV of terminal value", result.present_value_terminal),
        ("Enterprise value", result.enterprise_value),
        ("Net debt", result.net_debt),
        ("Equity value", result.equity_value),
    ];
    for (label, value) in bridge {
        let _ = writeln!(out, "{label:<LABEL_WIDTH$}{:>COLUMN_WIDTH$}", scale.currency(value));
    }
    if let Some(price) = result.price_per_share {
        let _ = writeln!(out, "{:<LABEL_WIDTH$}{:>COLUMN_WIDTH$}", "Price per share", format!("{price:.2}"));
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Cost of capital");
    out.push_str(&cost_of_capital(&result.cost_of_capital));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use valora::FiscalYear;

    #[test]
    fn test_cell_formats() {
        assert_eq!(cell("Revenue", 1_234_567.0, Scale::new(false)), "1234567.00");
        assert_eq!(cell("Revenue", 1_234_567.0, Scale::new(true)), "1.23");
        assert_eq!(cell("GrossMargin", 0.4567, Scale::new(true)), "45.67%");
        assert_eq!(cell("InventoryPctRevenue", 0.1, Scale::new(false)), "10.00%");
    }

    #[test]
    fn test_ordered_items() {
        let year = FiscalYear::new(2022);
        let mut table = StatementTable::new();
        table.set(year, LineItem::NetIncome, 1.0);
        table.set(year, LineItem::Revenue, 2.0);
        let mut row = table.row(year).cloned().unwrap_or_default();
        row.insert("Goodwill".to_string(), 3.0);
        row.insert("Adjustments".to_string(), 4.0);
        table.insert_row(year, row);

        assert_eq!(
            ordered_items(&table),
            vec!["Revenue", "NetIncome", "Adjustments", "Goodwill"]
        );
    }

    #[test]
    fn test_statement_marks_projected_years() {
        let mut model = OperatingModel {
            latest_historical_year: Some(FiscalYear::new(2022)),
            projection_years: 1,
            ..Default::default()
        };
        model.income_statement.set(FiscalYear::new(2022), LineItem::Revenue, 100.0);
        model.income_statement.set(FiscalYear::new(2023), LineItem::Revenue, 110.0);

        let text = statement(&model, Statement::IncomeStatement, Scale::new(false));
        assert!(text.starts_with("Income Statement\n"));
        assert!(text.contains("2023E"));
        assert!(!text.contains("2022E"));
        assert!(text.contains("110.00"));
    }

    #[test]
    fn test_cost_of_capital_rows() {
        let coc = CostOfCapital {
            cost_of_equity: 0.09,
            after_tax_cost_of_debt: 0.0375,
            equity_weight: 0.75,
            debt_weight: 0.25,
            wacc: 0.076875,
        };
        let text = cost_of_capital(&coc);
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("9.00%"));
        assert!(text.lines().last().unwrap().starts_with("WACC"));
    }
}
