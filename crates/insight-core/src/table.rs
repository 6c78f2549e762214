//! Column-major table model
//!
//! A [`Table`] is an ordered set of named, typed, nullable columns sharing one
//! row count. Engines only ever borrow it; anything that needs a re-typed or
//! filtered table gets a fresh copy ([`Table::coerce_types`],
//! [`Table::take_rows`]).
//!
//! Each table carries a fingerprint of its contents, computed once at
//! construction. Results record the fingerprint they were computed against so
//! a cache can refuse to serve them for a different table.

use crate::classify::{classify_text, parse_datetime, Classification, InferredKind};
use crate::error::{Error, Result};
use crate::math::cmp_f64;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Declared kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Datetime,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
            ColumnKind::Datetime => write!(f, "datetime"),
        }
    }
}

/// Cell storage for one column. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    Datetime(Vec<Option<NaiveDateTime>>),
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

/// Hashable view of a single cell, used for fingerprints and duplicate rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
    Time(NaiveDateTime),
}

impl Column {
    /// Numeric column. NaN cells are stored as missing.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn categorical(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Categorical(values),
        }
    }

    pub fn datetime(name: impl Into<String>, values: Vec<Option<NaiveDateTime>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Datetime(values),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn kind(&self) -> ColumnKind {
        match self.data {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
            ColumnData::Datetime(_) => ColumnKind::Datetime,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind() == ColumnKind::Numeric
    }

    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
            ColumnData::Datetime(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric(v) => matches!(v.get(row), Some(None)),
            ColumnData::Categorical(v) => matches!(v.get(row), Some(None)),
            ColumnData::Datetime(v) => matches!(v.get(row), Some(None)),
        }
    }

    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_missing(i)).count()
    }

    pub fn non_missing_count(&self) -> usize {
        self.len() - self.missing_count()
    }

    /// Raw numeric cells, `None` for non-numeric columns.
    pub fn numeric_values(&self) -> Option<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Non-missing numeric values in row order.
    pub fn valid_numeric(&self) -> Option<Vec<f64>> {
        self.numeric_values()
            .map(|v| v.iter().flatten().copied().collect())
    }

    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&[Option<NaiveDateTime>]> {
        match &self.data {
            ColumnData::Datetime(v) => Some(v),
            _ => None,
        }
    }

    fn cell_key(&self, row: usize) -> CellKey<'_> {
        match &self.data {
            ColumnData::Numeric(v) => match v[row] {
                // Normalise -0.0 so it compares equal to 0.0
                Some(x) => CellKey::Number((x + 0.0).to_bits()),
                None => CellKey::Missing,
            },
            ColumnData::Categorical(v) => match &v[row] {
                Some(s) => CellKey::Text(s),
                None => CellKey::Missing,
            },
            ColumnData::Datetime(v) => match v[row] {
                Some(t) => CellKey::Time(t),
                None => CellKey::Missing,
            },
        }
    }

    /// Number of distinct non-missing values.
    pub fn unique_count(&self) -> usize {
        (0..self.len())
            .map(|i| self.cell_key(i))
            .filter(|k| *k != CellKey::Missing)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Row order that sorts this column ascending.
    ///
    /// The sort is stable and missing cells go last. Text columns sort by
    /// their parsed date when every non-missing cell parses as one, and
    /// lexicographically otherwise.
    pub fn argsort(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.len()).collect();
        match &self.data {
            ColumnData::Numeric(v) => order.sort_by(|&a, &b| cmp_missing_last(&v[a], &v[b], cmp_f64)),
            ColumnData::Datetime(v) => order.sort_by(|&a, &b| cmp_missing_last(&v[a], &v[b], Ord::cmp)),
            ColumnData::Categorical(v) => {
                let parsed: Option<Vec<Option<NaiveDateTime>>> = v
                    .iter()
                    .map(|cell| match cell {
                        Some(s) => parse_datetime(s).map(Some),
                        None => Some(None),
                    })
                    .collect();
                match parsed {
                    Some(times) => {
                        order.sort_by(|&a, &b| cmp_missing_last(&times[a], &times[b], Ord::cmp))
                    }
                    None => order.sort_by(|&a, &b| cmp_missing_last(&v[a], &v[b], Ord::cmp)),
                }
            }
        }
        order
    }

    /// New column holding the given rows, in the given order.
    pub fn take(&self, rows: &[usize]) -> Column {
        fn pick<T: Clone>(v: &[Option<T>], rows: &[usize]) -> Vec<Option<T>> {
            rows.iter().map(|&i| v[i].clone()).collect()
        }
        let data = match &self.data {
            ColumnData::Numeric(v) => ColumnData::Numeric(pick(v, rows)),
            ColumnData::Categorical(v) => ColumnData::Categorical(pick(v, rows)),
            ColumnData::Datetime(v) => ColumnData::Datetime(pick(v, rows)),
        };
        Column {
            name: self.name.clone(),
            data,
        }
    }
}

fn cmp_missing_last<T>(a: &Option<T>, b: &Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Per-column line of a [`DatasetOverview`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOverview {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    pub unique: usize,
}

/// Shape and completeness of a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    pub total_missing: usize,
    /// Missing cells as a percentage of all cells, 0 for an empty table
    pub missing_percentage: f64,
    pub duplicate_rows: usize,
    pub column_summaries: Vec<ColumnOverview>,
}

/// Classification made for one column by [`Table::coerce_types`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeConversion {
    pub column: String,
    pub inferred: InferredKind,
}

/// Ordered, positionally aligned collection of columns
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
    fingerprint: u64,
}

impl Table {
    /// Build a table, checking that names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut names = HashSet::new();
        for col in &columns {
            if !names.insert(col.name()) {
                return Err(Error::DuplicateColumn(col.name().to_string()));
            }
            if col.len() != row_count {
                return Err(Error::LengthMismatch {
                    column: col.name().to_string(),
                    expected: row_count,
                    actual: col.len(),
                });
            }
        }
        let fingerprint = fingerprint(&columns, row_count);
        Ok(Self {
            columns,
            row_count,
            fingerprint,
        })
    }

    pub fn builder() -> TableBuilder {
        TableBuilder::default()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Look up a column, failing with [`Error::ColumnNotFound`].
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    fn names_of_kind(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind() == kind)
            .map(Column::name)
            .collect()
    }

    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.names_of_kind(ColumnKind::Numeric)
    }

    pub fn categorical_column_names(&self) -> Vec<&str> {
        self.names_of_kind(ColumnKind::Categorical)
    }

    pub fn datetime_column_names(&self) -> Vec<&str> {
        self.names_of_kind(ColumnKind::Datetime)
    }

    /// Content fingerprint computed at construction.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// New table containing the given rows in the given order. Indices past
    /// the last row are ignored.
    pub fn take_rows(&self, rows: &[usize]) -> Table {
        let rows: Vec<usize> = rows
            .iter()
            .copied()
            .filter(|&i| i < self.row_count)
            .collect();
        let columns: Vec<Column> = self.columns.iter().map(|c| c.take(&rows)).collect();
        let fingerprint = fingerprint(&columns, rows.len());
        Table {
            columns,
            row_count: rows.len(),
            fingerprint,
        }
    }

    /// Number of rows identical to an earlier row.
    pub fn duplicate_row_count(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.row_count);
        (0..self.row_count)
            .filter(|&row| {
                let key: Vec<CellKey<'_>> = self.columns.iter().map(|c| c.cell_key(row)).collect();
                !seen.insert(key)
            })
            .count()
    }

    pub fn overview(&self) -> DatasetOverview {
        let column_summaries: Vec<ColumnOverview> = self
            .columns
            .iter()
            .map(|c| ColumnOverview {
                name: c.name().to_string(),
                kind: c.kind(),
                missing: c.missing_count(),
                unique: c.unique_count(),
            })
            .collect();
        let total_missing: usize = column_summaries.iter().map(|c| c.missing).sum();
        let cells = self.row_count * self.columns.len();
        let missing_percentage = if cells == 0 {
            0.0
        } else {
            total_missing as f64 / cells as f64 * 100.0
        };
        DatasetOverview {
            rows: self.row_count,
            columns: self.columns.len(),
            total_missing,
            missing_percentage,
            duplicate_rows: self.duplicate_row_count(),
            column_summaries,
        }
    }

    /// Copy of this table with every categorical column re-typed by
    /// [`classify_text`], plus the classification made for each of them.
    ///
    /// The receiver is left untouched.
    pub fn coerce_types(&self) -> (Table, Vec<TypeConversion>) {
        let mut conversions = Vec::new();
        let columns: Vec<Column> = self
            .columns
            .iter()
            .map(|col| match col.as_text() {
                Some(cells) => {
                    let class = classify_text(cells);
                    conversions.push(TypeConversion {
                        column: col.name().to_string(),
                        inferred: class.kind(),
                    });
                    match class {
                        Classification::Numeric(v) => Column::numeric(col.name(), v),
                        Classification::Datetime(v) => Column::datetime(col.name(), v),
                        Classification::Text { .. } => col.clone(),
                    }
                }
                None => col.clone(),
            })
            .collect();
        let fingerprint = fingerprint(&columns, self.row_count);
        tracing::debug!(converted = conversions.len(), "coerced column types");
        (
            Table {
                columns,
                row_count: self.row_count,
                fingerprint,
            },
            conversions,
        )
    }
}

fn fingerprint(columns: &[Column], row_count: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    row_count.hash(&mut hasher);
    for col in columns {
        col.name().hash(&mut hasher);
        col.kind().hash(&mut hasher);
        for row in 0..col.len() {
            col.cell_key(row).hash(&mut hasher);
        }
    }
    hasher.finish()
}

/// Incremental table construction
///
/// ```
/// use insight_core::Table;
///
/// let table = Table::builder()
///     .values("a", [1.0, 2.0, f64::NAN])
///     .categorical("region", [Some("north"), None, Some("south")])
///     .build()
///     .unwrap();
///
/// assert_eq!(table.row_count(), 3);
/// assert_eq!(table.column("a").unwrap().missing_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct TableBuilder {
    columns: Vec<Column>,
}

impl TableBuilder {
    /// Nullable numeric column.
    pub fn numeric(mut self, name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        self.columns
            .push(Column::numeric(name, values.into_iter().collect()));
        self
    }

    /// Numeric column where NaN marks a missing cell.
    pub fn values(self, name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        self.numeric(name, values.into_iter().map(Some))
    }

    /// Nullable integer column, widened to `f64`.
    pub fn integer(self, name: impl Into<String>, values: impl IntoIterator<Item = Option<i64>>) -> Self {
        self.numeric(name, values.into_iter().map(|v| v.map(|x| x as f64)))
    }

    pub fn categorical<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        let cells = values.into_iter().map(|v| v.map(Into::into)).collect();
        self.columns.push(Column::categorical(name, cells));
        self
    }

    pub fn datetime(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<NaiveDateTime>>,
    ) -> Self {
        self.columns
            .push(Column::datetime(name, values.into_iter().collect()));
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn build(self) -> Result<Table> {
        Table::new(self.columns)
    }
}
