//! Cell values and their NDJSON encoding

use chrono::NaiveDateTime;
use eyre::{Result, eyre};
use serde_json::{Value, json};
use std::hash::{Hash, Hasher};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const TIMESTAMP_KEY: &str = "$timestamp";
const UNPARSEABLE_KEY: &str = "$unparseable";

/// A single value in a table
#[derive(Debug, Clone)]
pub enum Cell {
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(NaiveDateTime),
    /// A date-like value that could not be interpreted as a timestamp
    Unparseable,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// `Null` and NaN floats carry no recorded data
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Render a present value as plain text
    ///
    /// Integral floats drop their fractional part so that a number stored as
    /// `5551234.0` renders as `5551234`. Missing and unparseable cells have
    /// no rendering.
    pub fn render(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{:.0}", f))
            }
            Self::Float(f) => Some(f.to_string()),
            Self::Boolean(b) => Some(b.to_string()),
            Self::Timestamp(ts) => Some(ts.format(TIMESTAMP_FORMAT).to_string()),
            Self::Null | Self::Unparseable => None,
        }
    }

    /// Encode as a JSON value for the NDJSON store
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Text(s) => Value::String(s.clone()),
            Self::Integer(i) => json!(i),
            // Non-finite floats have no JSON form; NaN is missing anyway
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Timestamp(ts) => json!({ TIMESTAMP_KEY: ts.format(TIMESTAMP_FORMAT).to_string() }),
            Self::Unparseable => json!({ UNPARSEABLE_KEY: true }),
        }
    }

    /// Decode a JSON value written by [`Cell::to_json`]
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Bool(b) => Ok(Self::Boolean(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float))
                .ok_or_else(|| eyre!("Unsupported number: {}", n)),
            Value::Object(obj) => {
                if let Some(raw) = obj.get(TIMESTAMP_KEY).and_then(|v| v.as_str()) {
                    let ts = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
                        .map_err(|e| eyre!("Invalid stored timestamp '{}': {}", raw, e))?;
                    Ok(Self::Timestamp(ts))
                } else if obj.contains_key(UNPARSEABLE_KEY) {
                    Ok(Self::Unparseable)
                } else {
                    Err(eyre!("Unknown cell object: {}", value))
                }
            }
            Value::Array(_) => Err(eyre!("Arrays are not valid cells: {}", value)),
        }
    }
}

/// Bit pattern used for float equality and hashing
///
/// NaNs compare equal to each other and `-0.0` is folded into `0.0`.
fn float_key(f: f64) -> u64 {
    if f == 0.0 {
        0.0f64.to_bits()
    } else {
        f.to_bits()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => float_key(*a) == float_key(*b),
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::Unparseable, Self::Unparseable) => true,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Text(s) => s.hash(state),
            Self::Integer(i) => i.hash(state),
            Self::Float(f) => float_key(*f).hash(state),
            Self::Boolean(b) => b.hash(state),
            Self::Timestamp(ts) => ts.hash(state),
            Self::Null | Self::Unparseable => {}
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}
