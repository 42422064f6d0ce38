//! Statement tables: fiscal year → line item → value.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{FiscalYear, LineItem};

/// One fiscal year of a statement, keyed by line-item name.
pub type Row = BTreeMap<String, f64>;

/// A single financial statement across fiscal years.
///
/// Absent entries mean "not reported". [`StatementTable::get`] keeps that
/// distinction (returns `None`), while [`StatementTable::value`] treats an
/// absent entry as zero for arithmetic. Non-finite values and JSON `null`s are
/// treated as absent.
///
/// Years iterate in ascending order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementTable {
    rows: BTreeMap<FiscalYear, Row>,
}

impl StatementTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// Returns true when no fiscal year is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of fiscal years in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Fiscal years in ascending order.
    pub fn years(&self) -> impl DoubleEndedIterator<Item = FiscalYear> + '_ {
        self.rows.keys().copied()
    }

    /// Earliest fiscal year.
    #[must_use]
    pub fn first_year(&self) -> Option<FiscalYear> {
        self.rows.keys().next().copied()
    }

    /// Latest fiscal year.
    #[must_use]
    pub fn last_year(&self) -> Option<FiscalYear> {
        self.rows.keys().next_back().copied()
    }

    /// Whether the table has a row for `year`.
    #[must_use]
    pub fn contains_year(&self, year: FiscalYear) -> bool {
        self.rows.contains_key(&year)
    }

    /// Row for `year`, if present.
    #[must_use]
    pub fn row(&self, year: FiscalYear) -> Option<&Row> {
        self.rows.get(&year)
    }

    /// Iterates rows in ascending year order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (FiscalYear, &Row)> + '_ {
        self.rows.iter().map(|(year, row)| (*year, row))
    }

    /// Reported value of a canonical item, `None` when not reported.
    #[must_use]
    pub fn get(&self, year: FiscalYear, item: LineItem) -> Option<f64> {
        self.get_named(year, item.as_str())
    }

    /// Reported value of any named item, `None` when not reported.
    #[must_use]
    pub fn get_named(&self, year: FiscalYear, name: &str) -> Option<f64> {
        self.rows
            .get(&year)
            .and_then(|row| row.get(name))
            .copied()
            .filter(|v| v.is_finite())
    }

    /// Value of a canonical item with absent entries treated as zero.
    #[must_use]
    pub fn value(&self, year: FiscalYear, item: LineItem) -> f64 {
        self.get(year, item).unwrap_or(0.0)
    }

    /// Sets a canonical item, creating the row if needed.
    pub fn set(&mut self, year: FiscalYear, item: LineItem, value: f64) {
        self.rows
            .entry(year)
            .or_default()
            .insert(item.as_str().to_string(), value);
    }

    /// Inserts or replaces a whole row.
    pub fn insert_row(&mut self, year: FiscalYear, row: Row) {
        self.rows.insert(year, row);
    }

    /// Values of `item` for every year that reports it, ascending by year.
    pub fn series(&self, item: LineItem) -> impl DoubleEndedIterator<Item = (FiscalYear, f64)> + '_ {
        self.years()
            .filter_map(move |year| self.get(year, item).map(|v| (year, v)))
    }

    /// Copy of the table restricted to years `<= last`.
    #[must_use]
    pub fn through(&self, last: FiscalYear) -> Self {
        Self {
            rows: self.rows.range(..=last).map(|(y, r)| (*y, r.clone())).collect(),
        }
    }
}

impl FromIterator<(FiscalYear, Row)> for StatementTable {
    fn from_iter<I: IntoIterator<Item = (FiscalYear, Row)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl Serialize for StatementTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StatementTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<FiscalYear, BTreeMap<String, Option<f64>>>::deserialize(deserializer)?;
        let rows = raw
            .into_iter()
            .map(|(year, row)| {
                let row = row
                    .into_iter()
                    .filter_map(|(name, v)| v.filter(|v| v.is_finite()).map(|v| (name, v)))
                    .collect();
                (year, row)
            })
            .collect();
        Ok(Self { rows })
    }
}
