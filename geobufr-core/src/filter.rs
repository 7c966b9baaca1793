//! Per-field filters and required-column policies.
//!
//! Filters are built by the caller and handed to a decoder untouched. The
//! decoder applies them while streaming; the materializer never filters
//! again.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use geo::Point;

use crate::geometry::{distance, point_from_value};
use crate::{Columns, FieldValue, Record};

type TransformFn = dyn Fn(&FieldValue) -> Option<FieldValue> + Send + Sync;
type PredicateFn = dyn Fn(&FieldValue) -> bool + Send + Sync;

/// Built-in type coercions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Convert numbers, flags and numeric text to [`FieldValue::Float`].
    Float,
    /// Convert integral numbers, flags and integral text to [`FieldValue::Int`].
    Int,
    /// Render any present value as [`FieldValue::Text`].
    Text,
}

impl Coercion {
    /// Apply the coercion, returning `None` when the value cannot be converted.
    ///
    /// Missing values never coerce.
    #[must_use]
    pub fn apply(self, value: &FieldValue) -> Option<FieldValue> {
        match (self, value) {
            (_, FieldValue::Missing) => None,
            (Self::Float, FieldValue::Bool(flag)) => {
                Some(FieldValue::Float(if *flag { 1.0 } else { 0.0 }))
            }
            (Self::Float, FieldValue::Text(text)) => {
                text.trim().parse().ok().map(FieldValue::Float)
            }
            (Self::Float, other) => other.as_f64().map(FieldValue::Float),
            (Self::Int, FieldValue::Bool(flag)) => Some(FieldValue::Int(i64::from(*flag))),
            (Self::Int, FieldValue::Int(number)) => Some(FieldValue::Int(*number)),
            (Self::Int, FieldValue::Float(number)) => float_to_int(*number).map(FieldValue::Int),
            (Self::Int, FieldValue::Text(text)) => text.trim().parse().ok().map(FieldValue::Int),
            (Self::Int, FieldValue::Array(_)) => None,
            (Self::Text, other) => Some(FieldValue::Text(other.to_string())),
        }
    }
}

// Truncates toward zero; values beyond the exact-integer range of f64 are rejected.
fn float_to_int(value: f64) -> Option<i64> {
    const LIMIT: f64 = 9_007_199_254_740_992.0;
    let truncated = value.trunc();
    (truncated.is_finite() && truncated.abs() <= LIMIT).then_some(truncated as i64)
}

/// How a single field constrains and rewrites records.
pub enum FieldFilter {
    /// Replace the value with its coercion; drop the record when coercion fails.
    Coerce(Coercion),
    /// Replace the value with the closure's output; drop the record on `None`.
    Transform(Box<TransformFn>),
    /// Keep the record only when the predicate holds.
    Predicate(Box<PredicateFn>),
}

impl FieldFilter {
    /// Wrap a predicate closure.
    ///
    /// # Examples
    /// ```
    /// use geobufr_core::{FieldFilter, FieldValue};
    ///
    /// let strong_wind = FieldFilter::predicate(|v| v.as_f64().is_some_and(|s| s > 5.0));
    /// assert!(strong_wind.apply(FieldValue::Float(7.0)).is_some());
    /// assert!(strong_wind.apply(FieldValue::Float(2.0)).is_none());
    /// ```
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Box::new(predicate))
    }

    /// Wrap a transforming closure.
    pub fn transform<F>(transform: F) -> Self
    where
        F: Fn(&FieldValue) -> Option<FieldValue> + Send + Sync + 'static,
    {
        Self::Transform(Box::new(transform))
    }

    /// Keep records whose raw `[x, y]` geometry lies strictly within
    /// `radius_m` metres of `center`.
    ///
    /// Values that are not coordinate pairs fail the predicate.
    #[must_use]
    pub fn within(center: Point<f64>, radius_m: f64) -> Self {
        Self::predicate(move |value| {
            point_from_value(value).is_some_and(|position| distance(center, position) < radius_m)
        })
    }

    /// Run the filter against one value.
    ///
    /// Returns the value to store, or `None` when the record must be dropped.
    #[must_use]
    pub fn apply(&self, value: FieldValue) -> Option<FieldValue> {
        match self {
            Self::Coerce(coercion) => coercion.apply(&value),
            Self::Transform(transform) => transform(&value),
            Self::Predicate(predicate) => predicate(&value).then_some(value),
        }
    }
}

impl fmt::Debug for FieldFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coerce(coercion) => f.debug_tuple("Coerce").field(coercion).finish(),
            Self::Transform(_) => f.write_str("Transform(..)"),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Field filters keyed by field name.
///
/// # Examples
/// ```
/// use geobufr_core::{Coercion, FieldFilter, FieldValue, Filters, Record};
///
/// let filters = Filters::new()
///     .with("windSpeed", FieldFilter::Coerce(Coercion::Float))
///     .with("windDirection", FieldFilter::Coerce(Coercion::Float));
///
/// let calm = Record::from_iter([
///     ("windSpeed", FieldValue::Int(0)),
///     ("windDirection", FieldValue::Missing),
/// ]);
/// assert!(filters.apply(calm).is_none());
/// ```
#[derive(Debug, Default)]
pub struct Filters {
    by_field: BTreeMap<String, FieldFilter>,
}

impl Filters {
    /// No filtering.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the filter for `field`.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, filter: FieldFilter) -> Self {
        self.by_field.insert(field.into(), filter);
        self
    }

    /// Return `true` when no filters are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    /// Names of the filtered fields.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.by_field.keys().map(String::as_str)
    }

    /// Apply every filter to `record`.
    ///
    /// Fields absent from the record are filtered as
    /// [`FieldValue::Missing`]. Returns the rewritten record, or `None` when
    /// any filter rejects it.
    #[must_use]
    pub fn apply(&self, mut record: Record) -> Option<Record> {
        for (field, filter) in &self.by_field {
            let value = record.remove(field).unwrap_or_default();
            let kept = filter.apply(value)?;
            record.insert(field.clone(), kept);
        }
        Some(record)
    }
}

/// Which requested columns must carry a value for a record to be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequiredColumns {
    /// Every requested column is mandatory.
    #[default]
    All,
    /// Only the listed columns are mandatory.
    Subset(BTreeSet<String>),
}

impl RequiredColumns {
    /// Build an explicit subset of mandatory columns.
    pub fn subset<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Subset(names.into_iter().map(Into::into).collect())
    }

    /// Return `true` when `record` has a value for every mandatory column.
    #[must_use]
    pub fn is_satisfied_by(&self, record: &Record, columns: &Columns) -> bool {
        match self {
            Self::All => columns.iter().all(|name| record.has_value(name)),
            Self::Subset(names) => names.iter().all(|name| record.has_value(name)),
        }
    }
}

impl From<bool> for RequiredColumns {
    /// `true` requires every column; `false` requires none.
    fn from(all: bool) -> Self {
        if all {
            Self::All
        } else {
            Self::Subset(BTreeSet::new())
        }
    }
}
