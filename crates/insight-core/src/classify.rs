//! Column type classification
//!
//! Text columns are re-typed by ordered parse attempts: numeric first, then
//! datetime, otherwise the column stays text. Every attempt produces a typed
//! outcome, so a failed attempt carries the first offending cell instead of
//! being swallowed.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date-time layouts tried in order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Date-only layouts, interpreted at midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Kind inferred for a text column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredKind {
    Numeric,
    Datetime,
    Text,
}

impl fmt::Display for InferredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferredKind::Numeric => write!(f, "numeric"),
            InferredKind::Datetime => write!(f, "datetime"),
            InferredKind::Text => write!(f, "text"),
        }
    }
}

/// Why a parse attempt did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The column holds no non-missing values, so nothing can be inferred
    NoValues,
    /// A cell that the attempted kind cannot represent
    Unparseable { row: usize, value: String },
}

/// Outcome of classifying a text column
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Numeric(Vec<Option<f64>>),
    Datetime(Vec<Option<NaiveDateTime>>),
    Text {
        numeric: ParseFailure,
        datetime: ParseFailure,
    },
}

impl Classification {
    pub fn kind(&self) -> InferredKind {
        match self {
            Classification::Numeric(_) => InferredKind::Numeric,
            Classification::Datetime(_) => InferredKind::Datetime,
            Classification::Text { .. } => InferredKind::Text,
        }
    }
}

/// Parse a single date or date-time string.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

fn try_parse<T>(
    values: &[Option<String>],
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Vec<Option<T>>, ParseFailure> {
    let mut out = Vec::with_capacity(values.len());
    let mut seen = false;
    for (row, cell) in values.iter().enumerate() {
        match cell {
            None => out.push(None),
            Some(s) => match parse(s) {
                Some(v) => {
                    seen = true;
                    out.push(Some(v));
                }
                None => {
                    return Err(ParseFailure::Unparseable {
                        row,
                        value: s.clone(),
                    })
                }
            },
        }
    }
    if seen {
        Ok(out)
    } else {
        Err(ParseFailure::NoValues)
    }
}

/// Attempt to read every non-missing cell as a number. NaN cells become
/// missing.
pub fn try_numeric(values: &[Option<String>]) -> Result<Vec<Option<f64>>, ParseFailure> {
    try_parse(values, parse_number)
        .map(|parsed| parsed.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect())
}

/// Attempt to read every non-missing cell as a date or date-time.
pub fn try_datetime(
    values: &[Option<String>],
) -> Result<Vec<Option<NaiveDateTime>>, ParseFailure> {
    try_parse(values, parse_datetime)
}

/// Classify a text column: numeric, then datetime, else text.
pub fn classify_text(values: &[Option<String>]) -> Classification {
    let numeric = match try_numeric(values) {
        Ok(parsed) => return Classification::Numeric(parsed),
        Err(failure) => failure,
    };
    let datetime = match try_datetime(values) {
        Ok(parsed) => return Classification::Datetime(parsed),
        Err(failure) => failure,
    };
    Classification::Text { numeric, datetime }
}
