use crate::ranks::RankConfig;
use serde::Serialize;

/// Display percentage for one rank
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightEntry {
    pub key: String,
    pub percent: f64,
}

/// Per-rank percentages, in config order, summing to 100.00
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeightTable {
    entries: Vec<WeightEntry>,
}

impl WeightTable {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.percent)
    }

    /// Percentage at a position in config order
    pub fn at(&self, idx: usize) -> Option<f64> {
        self.entries.get(idx).map(|e| e.percent)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.percent).sum()
    }
}

/// Round to two decimal places, ties to even
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Derive display percentages from rank limits.
///
/// Every rank but the last is rounded independently to two decimals; the last
/// rank receives `100 - sum(previous)` so the table always totals 100.00.
/// When every limit is zero the split is equal.
pub fn normalize(config: &RankConfig) -> WeightTable {
    let n = config.len();
    if n == 0 {
        return WeightTable::default();
    }

    let total = config.total_limit();
    let mut entries = Vec::with_capacity(n);
    let mut assigned = 0.0;

    for rank in config.iter().take(n - 1) {
        let percent = if total == 0 {
            round2(100.0 / n as f64)
        } else {
            round2(rank.limit as f64 / total as f64 * 100.0)
        };
        assigned += percent;
        entries.push(WeightEntry {
            key: rank.key.clone(),
            percent,
        });
    }

    // Last rank absorbs the accumulated rounding error
    if let Some(last) = config.at(n - 1) {
        entries.push(WeightEntry {
            key: last.key.clone(),
            percent: round2(100.0 - assigned),
        });
    }

    WeightTable { entries }
}
