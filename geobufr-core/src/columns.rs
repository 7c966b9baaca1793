//! Requested column sets and their normalization.
//!
//! Callers request columns as an ordered list, a fixed tuple or an unordered
//! set. Normalization guarantees the geometry and CRS columns are present
//! while keeping the caller's container kind.

use std::collections::BTreeSet;

use log::debug;
use thiserror::Error;

use crate::record::{CRS, GEOMETRY};

/// Columns that every geospatial read must request.
pub const SENTINEL_COLUMNS: [&str; 2] = [GEOMETRY, CRS];

/// Errors returned when a column specification has an unsupported shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The columns were supplied in a container that is not a list, tuple or set.
    #[error("columns must be an instance of list or tuple or set, found {found}")]
    UnsupportedContainer {
        /// Kind of value that was supplied.
        found: &'static str,
    },
    /// A column name was not a string.
    #[error("column names must be strings, found {found}")]
    NonTextColumn {
        /// The offending member, rendered as JSON.
        found: String,
    },
}

/// A caller-supplied collection of column names.
///
/// # Examples
/// ```
/// use geobufr_core::Columns;
///
/// let columns = Columns::list(["station_id", "windSpeed"]).normalize();
/// assert_eq!(
///     columns.iter().collect::<Vec<_>>(),
///     ["station_id", "windSpeed", "geometry", "CRS"],
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Columns {
    /// Ordered, growable sequence.
    List(Vec<String>),
    /// Ordered, fixed-length sequence. Adding a column builds a new tuple.
    Tuple(Box<[String]>),
    /// Unordered collection of unique names.
    Set(BTreeSet<String>),
}

impl Columns {
    /// Build a list of columns.
    pub fn list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(names.into_iter().map(Into::into).collect())
    }

    /// Build a tuple of columns.
    pub fn tuple<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Tuple(names.into_iter().map(Into::into).collect())
    }

    /// Build a set of columns.
    pub fn set<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Set(names.into_iter().map(Into::into).collect())
    }

    /// Return `true` when `name` is requested.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        match self {
            Self::List(names) => names.iter().any(|n| n == name),
            Self::Tuple(names) => names.iter().any(|n| n == name),
            Self::Set(names) => names.contains(name),
        }
    }

    /// Number of requested columns.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(names) => names.len(),
            Self::Tuple(names) => names.len(),
            Self::Set(names) => names.len(),
        }
    }

    /// Return `true` when no columns are requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the column names.
    ///
    /// Lists and tuples yield their own order; sets yield names sorted.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let names: Box<dyn Iterator<Item = &String> + '_> = match self {
            Self::List(names) => Box::new(names.iter()),
            Self::Tuple(names) => Box::new(names.iter()),
            Self::Set(names) => Box::new(names.iter()),
        };
        names.map(String::as_str)
    }

    /// Column names as an owned vector, in iteration order.
    #[must_use]
    pub fn to_names(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }

    /// Add one column using the container's own growth operation.
    ///
    /// Lists push in place, tuples are rebuilt with the name appended and
    /// sets take the union. Names already present are left alone.
    #[must_use]
    pub fn with_added(self, name: &str) -> Self {
        if self.contains(name) {
            return self;
        }
        match self {
            Self::List(mut names) => {
                names.push(name.to_owned());
                Self::List(names)
            }
            Self::Tuple(names) => Self::Tuple(
                names
                    .iter()
                    .cloned()
                    .chain(std::iter::once(name.to_owned()))
                    .collect(),
            ),
            Self::Set(names) => {
                Self::Set(&names | &BTreeSet::from([name.to_owned()]))
            }
        }
    }

    /// Guarantee the `geometry` and `CRS` columns are requested.
    ///
    /// Missing sentinels are added in that order. Normalizing twice is a
    /// no-op.
    #[must_use]
    pub fn normalize(self) -> Self {
        SENTINEL_COLUMNS.into_iter().fold(self, |columns, sentinel| {
            if columns.contains(sentinel) {
                columns
            } else {
                debug!("adding {sentinel} to requested columns");
                columns.with_added(sentinel)
            }
        })
    }

    /// Interpret a dynamic column specification.
    ///
    /// A JSON array is a list, `{"tuple": [...]}` is a tuple and
    /// `{"set": [...]}` is a set. Anything else is rejected.
    ///
    /// # Examples
    /// ```
    /// use geobufr_core::{Columns, ConfigurationError};
    /// use serde_json::json;
    ///
    /// let set = Columns::from_value(json!({"set": ["windSpeed"]}))?;
    /// assert!(matches!(set, Columns::Set(_)));
    ///
    /// let err = Columns::from_value(json!({"windSpeed": true})).unwrap_err();
    /// assert!(matches!(err, ConfigurationError::UnsupportedContainer { .. }));
    /// # Ok::<(), ConfigurationError>(())
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigurationError> {
        use serde_json::Value;

        match value {
            Value::Array(items) => names_from_json(items).map(Self::List),
            Value::Object(mut object) if object.len() == 1 => {
                if let Some(Value::Array(items)) = object.remove("tuple") {
                    return names_from_json(items).map(Self::tuple);
                }
                if let Some(Value::Array(items)) = object.remove("set") {
                    return names_from_json(items).map(Self::set);
                }
                Err(ConfigurationError::UnsupportedContainer { found: "mapping" })
            }
            other => Err(ConfigurationError::UnsupportedContainer {
                found: json_kind(&other),
            }),
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<serde_json::Value> for Columns {
    type Error = ConfigurationError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

#[cfg(feature = "serde")]
fn names_from_json(items: Vec<serde_json::Value>) -> Result<Vec<String>, ConfigurationError> {
    items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::String(name) => Ok(name),
            other => Err(ConfigurationError::NonTextColumn {
                found: other.to_string(),
            }),
        })
        .collect()
}

#[cfg(feature = "serde")]
const fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}
