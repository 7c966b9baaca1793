//! Decoded observation records.

use std::collections::BTreeMap;

use crate::{Columns, FieldValue};

/// Name of the raw coordinate-pair field.
pub const GEOMETRY: &str = "geometry";
/// Name of the coordinate reference system field.
pub const CRS: &str = "CRS";

/// One decoded observation: field name to value.
///
/// # Examples
/// ```
/// use geobufr_core::{FieldValue, Record};
///
/// let record = Record::from_iter([("windSpeed", FieldValue::Float(7.2))]);
/// assert_eq!(record.get("windSpeed"), Some(&FieldValue::Float(7.2)));
/// assert!(record.get("windDirection").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Look up a field, treating absence as [`FieldValue::Missing`].
    #[must_use]
    pub fn value(&self, field: &str) -> &FieldValue {
        const MISSING: &FieldValue = &FieldValue::Missing;
        self.fields.get(field).unwrap_or(MISSING)
    }

    /// Return `true` when the field exists and is not missing.
    #[must_use]
    pub fn has_value(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(FieldValue::is_present)
    }

    /// Set a field, returning the previous value.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(field.into(), value.into())
    }

    /// Remove a field, returning its value.
    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    /// Return `true` when the record has an entry for `field`.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Return `true` when the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Keep only the requested columns.
    ///
    /// Requested columns absent from the record are filled with
    /// [`FieldValue::Missing`] so every projected row has the same shape.
    ///
    /// A column requested more than once keeps its value.
    #[must_use]
    pub fn project(mut self, columns: &Columns) -> Self {
        let mut fields = BTreeMap::new();
        for name in columns.iter() {
            if fields.contains_key(name) {
                continue;
            }
            let value = self.fields.remove(name).unwrap_or_default();
            fields.insert(name.to_owned(), value);
        }
        Self { fields }
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Record {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RequiredColumns;
    use rstest::rstest;

    #[rstest]
    fn projection_fills_missing_columns() {
        let record = Record::from_iter([("windSpeed", 4.0), ("pressure", 1013.2)]);
        let columns = Columns::list(["windSpeed", "windDirection"]);
        let projected = record.project(&columns);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected.value("windSpeed"), &FieldValue::Float(4.0));
        assert_eq!(projected.value("windDirection"), &FieldValue::Missing);
        assert!(!projected.contains("pressure"));
    }

    #[rstest]
    #[case(Columns::list(["windSpeed", "windSpeed"]))]
    #[case(Columns::tuple(["windSpeed", "CRS", "windSpeed"]))]
    fn repeated_columns_keep_their_value(#[case] columns: Columns) {
        let record = Record::from_iter([
            ("windSpeed", FieldValue::Float(6.0)),
            ("CRS", FieldValue::from("EPSG:4326")),
        ]);
        let projected = record.project(&columns);
        assert_eq!(projected.value("windSpeed"), &FieldValue::Float(6.0));
        assert!(RequiredColumns::All.is_satisfied_by(&projected, &columns));
    }

    #[rstest]
    fn missing_entries_have_no_value() {
        let mut record = Record::new();
        record.insert("windSpeed", FieldValue::Missing);
        assert!(record.contains("windSpeed"));
        assert!(!record.has_value("windSpeed"));
    }
}
