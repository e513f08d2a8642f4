//! Two-dimensional counts, e.g. version bucket × failure point.

use std::collections::BTreeMap;

use serde::Serialize;

use super::frequency::percentage;

/// Counts keyed by `(row, column)`. Serializes as `{row: {column: count}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CrossTab {
    cells: BTreeMap<String, BTreeMap<String, usize>>,
}

impl CrossTab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, row: impl Into<String>, column: impl Into<String>) {
        *self
            .cells
            .entry(row.into())
            .or_default()
            .entry(column.into())
            .or_insert(0) += 1;
    }

    pub fn count(&self, row: &str, column: &str) -> usize {
        self.cells
            .get(row)
            .and_then(|cols| cols.get(column))
            .copied()
            .unwrap_or(0)
    }

    pub fn row_total(&self, row: &str) -> usize {
        self.cells.get(row).map(|cols| cols.values().sum()).unwrap_or(0)
    }

    /// Share of `column` within `row`, as a percentage.
    pub fn row_share(&self, row: &str, column: &str) -> f64 {
        percentage(self.count(row, column), self.row_total(row))
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, usize>)> {
        self.cells.iter().map(|(row, cols)| (row.as_str(), cols))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<R: Into<String>, C: Into<String>> FromIterator<(R, C)> for CrossTab {
    fn from_iter<I: IntoIterator<Item = (R, C)>>(iter: I) -> Self {
        let mut tab = Self::new();
        for (row, column) in iter {
            tab.add(row, column);
        }
        tab
    }
}
