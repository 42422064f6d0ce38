//! Free cash flow extraction and discounting.

use std::collections::BTreeMap;

use valora_traits::{FiscalYear, LineItem, OperatingModel, Result, ValoraError};

/// Unlevered free cash flow for every projected year.
///
/// `FCF = OperatingCashFlow + InvestingCashFlow`. The schema carries no
/// interest line, so operating cash flow is already unlevered.
///
/// # Errors
///
/// Returns [`ValoraError::InvalidModel`] when the model has no projected
/// years.
pub fn free_cash_flows(model: &OperatingModel) -> Result<BTreeMap<FiscalYear, f64>> {
    let years = model.projected_years();
    if years.is_empty() {
        return Err(ValoraError::InvalidModel(
            "operating model has no projected years to value".into(),
        ));
    }

    let cash_flow = &model.cash_flow;
    Ok(years
        .into_iter()
        .map(|year| {
            let line = |item: LineItem| {
                cash_flow.get(year, item).unwrap_or_else(|| {
                    tracing::debug!(%year, line_item = %item, "missing line item, using zero");
                    0.0
                })
            };
            let fcf = line(LineItem::OperatingCashFlow) + line(LineItem::InvestingCashFlow);
            (year, fcf)
        })
        .collect())
}

/// Present value of each flow, `FCF_t / (1 + rate)^t` with `t` counted from 1.
#[must_use]
pub fn discount(flows: &BTreeMap<FiscalYear, f64>, rate: f64) -> BTreeMap<FiscalYear, f64> {
    flows
        .iter()
        .zip(1..)
        .map(|((year, fcf), t)| (*year, fcf / discount_factor(rate, t)))
        .collect()
}

/// `(1 + rate)^periods`.
#[must_use]
pub fn discount_factor(rate: f64, periods: i32) -> f64 {
    (1.0 + rate).powi(periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use valora_traits::StatementTable;

    fn fy(y: i32) -> FiscalYear {
        FiscalYear::new(y)
    }

    fn projected(flows: &[(i32, f64, f64)]) -> OperatingModel {
        let mut cash_flow = StatementTable::new();
        for &(year, ocf, icf) in flows {
            cash_flow.set(fy(year), LineItem::OperatingCashFlow, ocf);
            cash_flow.set(fy(year), LineItem::InvestingCashFlow, icf);
        }
        OperatingModel {
            cash_flow,
            latest_historical_year: Some(fy(2022)),
            projection_years: flows.len(),
            ..Default::default()
        }
    }

    #[test]
    fn test_free_cash_flows_keyed_by_projected_year() {
        let mut model = projected(&[(2023, 150.0, -50.0), (2024, 180.0, -60.0)]);
        model.cash_flow.set(fy(2022), LineItem::OperatingCashFlow, 999.0);

        let flows = free_cash_flows(&model).unwrap();
        let years: Vec<_> = flows.keys().copied().collect();
        assert_eq!(years, vec![fy(2023), fy(2024)]);
        assert_relative_eq!(flows[&fy(2023)], 100.0);
        assert_relative_eq!(flows[&fy(2024)], 120.0);
    }

    #[test]
    fn test_missing_lines_count_as_zero() {
        let mut model = projected(&[]);
        model.projection_years = 1;
        model.cash_flow.set(fy(2023), LineItem::OperatingCashFlow, 40.0);

        let flows = free_cash_flows(&model).unwrap();
        assert_relative_eq!(flows[&fy(2023)], 40.0);
    }

    #[test]
    fn test_historical_model_is_rejected() {
        let err = free_cash_flows(&OperatingModel::default()).unwrap_err();
        assert!(matches!(err, ValoraError::InvalidModel(_)));
    }

    #[test]
    fn test_discount() {
        let flows: BTreeMap<_, _> = [(fy(2023), 110.0), (fy(2024), 121.0)].into_iter().collect();
        let pv = discount(&flows, 0.1);
        assert_relative_eq!(pv[&fy(2023)], 100.0, epsilon = 1e-9);
        assert_relative_eq!(pv[&fy(2024)], 100.0, epsilon = 1e-9);
    }
}
