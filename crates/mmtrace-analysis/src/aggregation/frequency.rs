//! Frequency tables: category label → count, with percentages against a
//! caller-chosen denominator.

use rustc_hash::FxHashMap;
use serde::Serialize;

/// What a percentage is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Denominator {
    /// Sum of all counts in the table.
    #[default]
    Total,
    /// An explicit base, e.g. total classified sessions when the table only
    /// holds failed ones.
    Fixed(usize),
}

/// One category of a frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

/// Counts per category label, remembering first-seen order for rankings.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: FxHashMap<String, usize>,
    first_seen: Vec<String>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: impl Into<String>) {
        self.add_n(label, 1);
    }

    pub fn add_n(&mut self, label: impl Into<String>, n: usize) {
        let label = label.into();
        match self.counts.get_mut(&label) {
            Some(count) => *count += n,
            None => {
                self.first_seen.push(label.clone());
                self.counts.insert(label, n);
            }
        }
    }

    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Rows sorted by count descending, then label ascending. The result does
    /// not depend on insertion order. A zero denominator gives 0% everywhere.
    pub fn rows(&self, denominator: Denominator) -> Vec<FrequencyRow> {
        let base = match denominator {
            Denominator::Total => self.total(),
            Denominator::Fixed(n) => n,
        };
        let mut rows: Vec<FrequencyRow> = self
            .counts
            .iter()
            .map(|(label, &count)| FrequencyRow {
                label: label.clone(),
                count,
                percentage: percentage(count, base),
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        rows
    }

    /// The `n` most frequent labels. Ties keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<(String, usize)> = self
            .first_seen
            .iter()
            .map(|label| (label.clone(), self.count(label)))
            .collect();
        // Stable sort keeps first-seen order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl<S: Into<String>> FromIterator<S> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = Self::new();
        for label in iter {
            table.add(label);
        }
        table
    }
}

/// `part / whole` as a percentage; 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
