//! Tabular results: the raw accumulated table and its geospatial form.

use std::fmt;

use geo::Point;

use crate::{FieldValue, Record};

/// Records drained from a decoder, row-aligned with the requested columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl RawTable {
    /// Assemble a table from its columns and rows.
    #[must_use]
    pub const fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self { columns, rows }
    }

    /// Column names in request order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in decode order.
    #[must_use]
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Values of one column, row by row.
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a FieldValue> + 'a {
        self.rows.iter().map(move |row| row.value(name))
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return `true` when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Split the table into columns and rows.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Record>) {
        (self.columns, self.rows)
    }
}

/// Coordinate reference system attached to a whole [`GeoTable`].
///
/// # Examples
/// ```
/// use geobufr_core::{Crs, FieldValue};
///
/// let crs = Crs::from_value(&FieldValue::from("EPSG:4326")).unwrap();
/// assert_eq!(crs.as_str(), "EPSG:4326");
/// assert!(Crs::from_value(&FieldValue::from("")).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Crs(String);

impl Crs {
    /// Derive a CRS from a decoded `CRS` field.
    ///
    /// Falsy values (missing, empty, zero) mean the decoder could not map
    /// the reference system and yield `None`.
    #[must_use]
    pub fn from_value(value: &FieldValue) -> Option<Self> {
        value.is_truthy().then(|| Self(value.to_string()))
    }

    /// The CRS identifier, e.g. `EPSG:4326`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One geospatial row: a point and the remaining fields.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    /// Observation location, `x = longitude`, `y = latitude`.
    pub geometry: Point<f64>,
    /// All other requested fields, including `CRS`.
    pub properties: Record,
}

/// A non-empty table whose rows carry point geometries and share one CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTable {
    columns: Vec<String>,
    features: Vec<GeoFeature>,
    crs: Crs,
}

impl GeoTable {
    pub(crate) const fn new(columns: Vec<String>, features: Vec<GeoFeature>, crs: Crs) -> Self {
        Self {
            columns,
            features,
            crs,
        }
    }

    /// The table-level coordinate reference system.
    #[must_use]
    pub const fn crs(&self) -> &Crs {
        &self.crs
    }

    /// Column names in request order, including `geometry`.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in decode order.
    #[must_use]
    pub fn features(&self) -> &[GeoFeature] {
        &self.features
    }

    /// The geometry column.
    pub fn geometries(&self) -> impl Iterator<Item = Point<f64>> + '_ {
        self.features.iter().map(|feature| feature.geometry)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Return `true` when the table has no rows.
    ///
    /// Tables built by the materializer always hold at least one row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Consume the table, returning its rows.
    #[must_use]
    pub fn into_features(self) -> Vec<GeoFeature> {
        self.features
    }
}

/// Result of a geospatial read.
///
/// An empty result keeps the plain table shape: callers branch on
/// emptiness before relying on geometry or CRS.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// No records passed filtering.
    Empty(RawTable),
    /// At least one record, materialized with geometry and CRS.
    Geo(GeoTable),
}

impl ReadOutcome {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Empty(table) => table.len(),
            Self::Geo(table) => table.len(),
        }
    }

    /// Return `true` for [`ReadOutcome::Empty`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    /// Borrow the geospatial table, if any.
    #[must_use]
    pub const fn as_geo(&self) -> Option<&GeoTable> {
        match self {
            Self::Geo(table) => Some(table),
            Self::Empty(_) => None,
        }
    }

    /// Take the geospatial table, if any.
    #[must_use]
    pub fn into_geo(self) -> Option<GeoTable> {
        match self {
            Self::Geo(table) => Some(table),
            Self::Empty(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FieldValue::Missing)]
    #[case(FieldValue::from(""))]
    #[case(FieldValue::Int(0))]
    fn falsy_crs_values_are_rejected(#[case] value: FieldValue) {
        assert!(Crs::from_value(&value).is_none());
    }

    #[rstest]
    fn raw_table_exposes_columns() {
        let table = RawTable::new(
            vec!["windSpeed".into()],
            vec![
                Record::from_iter([("windSpeed", 3.5)]),
                Record::from_iter([("windSpeed", 7.0)]),
            ],
        );
        let speeds: Vec<_> = table.column("windSpeed").filter_map(FieldValue::as_f64).collect();
        assert_eq!(speeds, [3.5, 7.0]);
    }
}
