//! Frequency tables for categorical columns

use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
    /// Share of non-missing cells, in percent
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCounts {
    pub column: String,
    /// Non-missing cells counted
    pub total: usize,
    pub missing: usize,
    /// Distinct values before truncation to `top_n`
    pub distinct: usize,
    pub entries: Vec<ValueCount>,
}

impl ValueCounts {
    /// Count values by descending frequency, ties in order of first
    /// appearance, keeping at most `top_n` entries.
    pub fn from_cells(column: impl Into<String>, cells: &[Option<String>], top_n: usize) -> Self {
        // value -> (count, first row)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut missing = 0;
        for (row, cell) in cells.iter().enumerate() {
            match cell {
                Some(v) => counts.entry(v.as_str()).or_insert((0, row)).0 += 1,
                None => missing += 1,
            }
        }
        let total = cells.len() - missing;
        let distinct = counts.len();

        let mut ranked: Vec<(&str, usize, usize)> =
            counts.into_iter().map(|(v, (c, first))| (v, c, first)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let entries = ranked
            .into_iter()
            .take(top_n)
            .map(|(value, count, _)| ValueCount {
                value: value.to_string(),
                count,
                percentage: count as f64 / total as f64 * 100.0,
            })
            .collect();

        Self {
            column: column.into(),
            total,
            missing,
            distinct,
            entries,
        }
    }
}
