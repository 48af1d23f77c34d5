//! Cell value enum

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// A dynamic value extracted from a row for one column.
///
/// Accessors produce these; renderers turn them into display text.
///
/// # Example
///
/// ```
/// use tableview_lib::model::CellValue;
///
/// let name = CellValue::from("Baseline run");
/// let count = CellValue::from(42);
/// let empty = CellValue::Null;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    /// Null/empty value.
    #[default]
    Null,
    /// Free text.
    String(String),
    /// Any numeric value.
    Number(f64),
    /// Timestamp.
    Time(DateTime<Utc>),
    /// Named numeric scores (e.g. averaged feedback scores).
    NumberMap(BTreeMap<String, f64>),
    /// Ordered list of values.
    List(Vec<CellValue>),
    /// Arbitrary keyed values.
    Map(BTreeMap<String, CellValue>),
}

impl CellValue {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::Time(value)
    }
}

impl From<BTreeMap<String, f64>> for CellValue {
    fn from(value: BTreeMap<String, f64>) -> Self {
        CellValue::NumberMap(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}
