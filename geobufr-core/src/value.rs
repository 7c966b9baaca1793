//! Scalar values carried by decoded observation records.

use std::fmt;
use std::num::FpCategory;

/// A single decoded field value.
///
/// Decoders surface absent or "missing value" encodings as
/// [`FieldValue::Missing`]. The raw `geometry` field is an [`FieldValue::Array`]
/// holding `[longitude, latitude]`.
///
/// # Examples
/// ```
/// use geobufr_core::FieldValue;
///
/// assert!(FieldValue::from("EPSG:4326").is_truthy());
/// assert!(!FieldValue::from("").is_truthy());
/// assert_eq!(FieldValue::from(3_i64).as_f64(), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum FieldValue {
    /// No value was decoded for the field.
    #[default]
    Missing,
    /// A flag value.
    Bool(bool),
    /// An integral value, e.g. a code table entry or station number.
    Int(i64),
    /// A floating-point measurement.
    Float(f64),
    /// A character value.
    Text(String),
    /// A fixed-length group of values such as a coordinate pair.
    Array(Vec<FieldValue>),
}

impl FieldValue {
    /// Return `true` unless the value is missing.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::Missing)
    }

    /// Truthiness as used by CRS validation.
    ///
    /// Missing values, `false`, zero, empty strings and empty arrays are
    /// falsy. `NaN` counts as truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Missing => false,
            Self::Bool(flag) => *flag,
            Self::Int(value) => *value != 0,
            Self::Float(value) => value.classify() != FpCategory::Zero,
            Self::Text(text) => !text.is_empty(),
            Self::Array(items) => !items.is_empty(),
        }
    }

    /// Numeric view of the value, if it is a number.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Borrow the text content, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Array(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<(f64, f64)> for FieldValue {
    fn from((x, y): (f64, f64)) -> Self {
        Self::Array(vec![Self::Float(x), Self::Float(y)])
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for FieldValue {
    /// Map a JSON value onto a field value.
    ///
    /// Integral numbers stay integral. Nested objects have no scalar
    /// counterpart and are kept as their JSON text.
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Missing,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => number
                .as_i64()
                .map(Self::Int)
                .or_else(|| number.as_f64().map(Self::Float))
                .unwrap_or(Self::Missing),
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            object @ Value::Object(_) => Self::Text(object.to_string()),
        }
    }
}
