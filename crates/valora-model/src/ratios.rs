//! Ratio line items as views over absolute amounts.
//!
//! Ratios are never projected directly. After the absolute amounts of every
//! year are in place, each row is stripped of canonical ratio entries and the
//! ratios are recomputed, so a stale margin can never disagree with its inputs.
//! Ratio-like names outside the schema cannot be recomputed and are kept as
//! reported.

use valora_traits::{LineItem, OperatingModel, Row, StatementTable};

/// Recomputes every ratio line in the Income Statement and Cash Flow.
///
/// Absolute amounts and unknown line-item names are left untouched.
pub fn refresh(model: &mut OperatingModel) {
    let cash_flow: StatementTable = model
        .cash_flow
        .iter()
        .map(|(year, row)| {
            let revenue = model.income_statement.get(year, LineItem::Revenue);
            (year, cash_flow_ratios(row, revenue))
        })
        .collect();
    model.income_statement = model
        .income_statement
        .iter()
        .map(|(year, row)| (year, income_ratios(row)))
        .collect();
    model.cash_flow = cash_flow;
}

/// Copy of an Income Statement row with its ratios recomputed.
#[must_use]
pub fn income_ratios(row: &Row) -> Row {
    let mut out = strip(row);
    let get = |item: LineItem| row.get(item.as_str()).copied().filter(|v| v.is_finite());

    if let Some(revenue) = get(LineItem::Revenue).filter(|r| *r > 0.0) {
        let signed = [
            (LineItem::GrossProfit, LineItem::GrossMargin),
            (LineItem::OperatingIncome, LineItem::OperatingMargin),
            (LineItem::Ebitda, LineItem::EbitdaMargin),
            (LineItem::NetIncome, LineItem::NetMargin),
        ];
        for (amount, ratio) in signed {
            if let Some(v) = get(amount) {
                put(&mut out, ratio, v / revenue);
            }
        }

        let magnitudes = [
            (LineItem::Sga, LineItem::SgaPctRevenue),
            (
                LineItem::ResearchAndDevelopment,
                LineItem::ResearchAndDevelopmentPctRevenue,
            ),
            (
                LineItem::DepreciationAndAmortization,
                LineItem::DepreciationAndAmortizationPctRevenue,
            ),
        ];
        for (amount, ratio) in magnitudes {
            if let Some(v) = get(amount) {
                put(&mut out, ratio, v.abs() / revenue);
            }
        }
    }

    if let (Some(tax), Some(ebt)) = (get(LineItem::TaxExpense), get(LineItem::Ebt)) {
        let rate = if ebt == 0.0 { 0.0 } else { tax / ebt };
        put(&mut out, LineItem::EffectiveTaxRate, rate);
    }

    out
}

/// Copy of a Cash Flow row with its ratios recomputed against `revenue`.
#[must_use]
pub fn cash_flow_ratios(row: &Row, revenue: Option<f64>) -> Row {
    let mut out = strip(row);
    let capex = row
        .get(LineItem::CapitalExpenditures.as_str())
        .copied()
        .filter(|v| v.is_finite());
    if let (Some(capex), Some(revenue)) = (capex, revenue.filter(|r| *r > 0.0)) {
        put(&mut out, LineItem::CapExPctRevenue, capex.abs() / revenue);
    }
    out
}

fn strip(row: &Row) -> Row {
    row.iter()
        .filter(|(name, _)| !LineItem::from_name(name).is_some_and(|item| item.is_ratio()))
        .map(|(name, v)| (name.clone(), *v))
        .collect()
}

fn put(row: &mut Row, item: LineItem, value: f64) {
    row.insert(item.as_str().to_string(), value);
}
