//! Fields computed from other fields of a decoded observation.
//!
//! Dumps carry station coordinates as separate `longitude` and `latitude`
//! fields and the reference system as a BUFR code. The pipeline expects a
//! raw `[x, y]` pair under `geometry` and an identifier under `CRS`.

use geobufr_core::{CRS, FieldValue, GEOMETRY, Record};

/// Field holding the station longitude.
pub const LONGITUDE: &str = "longitude";
/// Field holding the station latitude.
pub const LATITUDE: &str = "latitude";
/// Field holding the BUFR coordinate reference system code.
pub const CRS_CODE: &str = "coordinateReferenceSystem";

/// CRS assumed when a record carries no reference system code.
pub const DEFAULT_CRS: &str = "EPSG:4326";

/// Map a coordinate reference system code to its EPSG identifier.
///
/// Unknown codes map to an empty string, which the materializer rejects as
/// unsupported.
///
/// # Examples
/// ```
/// use geobufr_core::FieldValue;
/// use geobufr_data::virtual_fields::crs_for_code;
///
/// assert_eq!(crs_for_code(&FieldValue::Int(1)), FieldValue::from("EPSG:4258"));
/// assert_eq!(crs_for_code(&FieldValue::Missing), FieldValue::from("EPSG:4326"));
/// assert_eq!(crs_for_code(&FieldValue::Int(7)), FieldValue::from(""));
/// ```
#[must_use]
pub fn crs_for_code(code: &FieldValue) -> FieldValue {
    if !code.is_present() {
        return FieldValue::from(DEFAULT_CRS);
    }
    let identifier = match integral_code(code) {
        Some(0) => DEFAULT_CRS,
        Some(1) => "EPSG:4258",
        Some(2) => "EPSG:4269",
        Some(3) => "EPSG:4314",
        _ => "",
    };
    FieldValue::from(identifier)
}

fn integral_code(code: &FieldValue) -> Option<i64> {
    match code {
        FieldValue::Int(value) => Some(*value),
        FieldValue::Float(value) if value.fract() == 0.0 && value.abs() < 1.0e6 => {
            Some(*value as i64)
        }
        _ => None,
    }
}

/// Build the raw geometry pair from the record's coordinates.
///
/// Yields [`FieldValue::Missing`] unless both coordinates are numeric.
#[must_use]
pub fn geometry_for(record: &Record) -> FieldValue {
    let longitude = record.value(LONGITUDE).as_f64();
    let latitude = record.value(LATITUDE).as_f64();
    FieldValue::from(longitude.zip(latitude))
}

/// Add `geometry` and `CRS` to `record` when `wanted` asks for them and the
/// record does not already carry them.
pub fn synthesize(record: &mut Record, wanted: impl Fn(&str) -> bool) {
    if wanted(GEOMETRY) && !record.contains(GEOMETRY) {
        let geometry = geometry_for(record);
        record.insert(GEOMETRY, geometry);
    }
    if wanted(CRS) && !record.contains(CRS) {
        let crs = crs_for_code(record.value(CRS_CODE));
        record.insert(CRS, crs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FieldValue::Missing, "EPSG:4326")]
    #[case(FieldValue::Int(0), "EPSG:4326")]
    #[case(FieldValue::Int(1), "EPSG:4258")]
    #[case(FieldValue::Int(2), "EPSG:4269")]
    #[case(FieldValue::Float(3.0), "EPSG:4314")]
    #[case(FieldValue::Int(4), "")]
    #[case(FieldValue::from("WGS84"), "")]
    fn maps_reference_system_codes(#[case] code: FieldValue, #[case] expected: &str) {
        assert_eq!(crs_for_code(&code), FieldValue::from(expected));
    }

    #[rstest]
    fn geometry_requires_both_coordinates() {
        let located = Record::from_iter([(LONGITUDE, 11.01), (LATITUDE, 47.8)]);
        assert_eq!(geometry_for(&located), FieldValue::from((11.01, 47.8)));

        let partial = Record::from_iter([(LONGITUDE, FieldValue::Float(11.01))]);
        assert_eq!(geometry_for(&partial), FieldValue::Missing);
    }

    #[rstest]
    fn integral_coordinates_become_floats() {
        let record = Record::from_iter([
            (LONGITUDE, FieldValue::Int(11)),
            (LATITUDE, FieldValue::Int(47)),
        ]);
        assert_eq!(geometry_for(&record), FieldValue::from((11.0, 47.0)));
    }

    #[rstest]
    fn existing_fields_are_kept() {
        let mut record = Record::from_iter([
            (GEOMETRY, FieldValue::from((1.0, 2.0))),
            (LONGITUDE, FieldValue::Float(11.01)),
            (LATITUDE, FieldValue::Float(47.8)),
            (CRS, FieldValue::from("EPSG:4258")),
        ]);
        synthesize(&mut record, |_| true);
        assert_eq!(record.value(GEOMETRY), &FieldValue::from((1.0, 2.0)));
        assert_eq!(record.value(CRS), &FieldValue::from("EPSG:4258"));
    }

    #[rstest]
    fn unwanted_fields_are_not_added() {
        let mut record = Record::from_iter([(LONGITUDE, 11.01), (LATITUDE, 47.8)]);
        synthesize(&mut record, |field| field == GEOMETRY);
        assert!(record.contains(GEOMETRY));
        assert!(!record.contains(CRS));
    }
}
