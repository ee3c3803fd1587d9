//! Runtime values

use serde::{Deserialize, Serialize};
use std::fmt;

/// A row of values in declared column order.
pub type Row = Vec<Value>;

/// Engine-assigned row identifier: table-scoped, monotonically increasing,
/// never reused.
pub type RowId = u64;

/// A runtime value held by a row.
///
/// DATE values are carried as `Str`; only their 10-character shape is
/// checked at validation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The canonical text form, used by equality comparisons and by
    /// VARCHAR/TEXT coercion. Floats always keep a fractional point
    /// (`2.0`, not `2`), so a FLOAT column round-trips through its own
    /// text form.
    pub fn as_text(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(v) => format!("{v:?}"),
            Value::Str(s) => s.clone(),
        }
    }

    /// Numeric coercion backing `>`/`<` comparisons, SUM/AVG, and MIN/MAX
    /// numeric mode. Numeric-looking strings coerce; everything else is
    /// `None`.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(v) => Some(*v),
            Value::Str(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(_) | Value::Null => None,
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
