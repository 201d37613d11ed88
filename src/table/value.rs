//! Cell values.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// A single nullable cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Floats in [-2^63, 2^63) convert to i64 exactly.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell. Only `Int` and `Float` are numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Ordering used when sorting rows by a column. Nulls sort last; mixed
    /// kinds fall back to comparing their display text.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Greater,
            (_, Value::Null) => Ordering::Less,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.to_string().cmp(&b.to_string()),
            },
        }
    }

    /// Hashable identity for grouping. `None` for nulls.
    ///
    /// Numbers group by value, not storage: `Int(1)`, `Float(1.0)` share a
    /// key, as do `0.0` and `-0.0`.
    pub fn group_key(&self) -> Option<GroupKey> {
        match self {
            Value::Null => None,
            Value::Bool(b) => Some(GroupKey::Bool(*b)),
            Value::Int(n) => Some(GroupKey::Int(*n)),
            Value::Float(f) if f.fract() == 0.0 && *f >= I64_LOWER && *f < I64_UPPER => {
                Some(GroupKey::Int(*f as i64))
            }
            Value::Float(f) => Some(GroupKey::Float(f.to_bits())),
            Value::Text(s) => Some(GroupKey::Text(s.clone())),
            Value::DateTime(dt) => Some(GroupKey::DateTime(*dt)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
                write!(f, "{:.1}", x)
            }
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(x) if x.is_finite() => serializer.serialize_f64(*x),
            Value::Float(_) => serializer.serialize_none(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::DateTime(dt) => serializer.collect_str(&dt.format(DATETIME_FORMAT)),
        }
    }
}

/// Hashable form of a non-null value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl From<GroupKey> for Value {
    fn from(key: GroupKey) -> Self {
        match key {
            GroupKey::Bool(b) => Value::Bool(b),
            GroupKey::Int(n) => Value::Int(n),
            GroupKey::Float(bits) => Value::Float(f64::from_bits(bits)),
            GroupKey::Text(s) => Value::Text(s),
            GroupKey::DateTime(dt) => Value::DateTime(dt),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
