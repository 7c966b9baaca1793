//! Drive a decoder and materialize its records as a geospatial table.
//!
//! Two integration modes share the same geometry and CRS pass:
//! [`read_geo_table`] owns the whole read, while [`materialize`] accepts a
//! table already assembled by [`read_table`] or another tabular reader.

mod error;

pub use error::{GeoReadError, MaterializeError};

use log::{debug, warn};

use crate::geometry::point_from_value;
use crate::record::{CRS, GEOMETRY};
use crate::{
    Columns, Crs, Filters, GeoFeature, GeoTable, RawTable, ReadOutcome, RecordDecoder,
    RequiredColumns, StreamRequest,
};

/// Read selected observations into a geospatial table.
///
/// `columns` is normalized first so `geometry` and `CRS` are always
/// requested. The decoder applies `filters` and `required_columns`; the
/// records it yields are drained into a [`RawTable`] and passed to
/// [`materialize`]. The decoder handle is dropped before this function
/// returns, whichever path it takes.
///
/// # Examples
/// ```
/// use std::convert::Infallible;
/// use geobufr_core::{
///     Columns, FieldValue, Filters, Record, RecordDecoder, RecordStream, RequiredColumns,
///     StreamRequest, read_geo_table,
/// };
///
/// struct Hohenpeissenberg;
///
/// impl RecordDecoder for Hohenpeissenberg {
///     type Source = str;
///     type Handle = ();
///     type Error = Infallible;
///
///     fn open(&self, _source: &str) -> Result<(), Infallible> {
///         Ok(())
///     }
///
///     fn stream<'h>(
///         &'h self,
///         _handle: &'h mut (),
///         request: StreamRequest<'h>,
///     ) -> RecordStream<'h, Infallible> {
///         let record = Record::from_iter([
///             ("station_id", FieldValue::Int(10962)),
///             ("geometry", FieldValue::from((11.01, 47.80))),
///             ("CRS", FieldValue::from("EPSG:4326")),
///         ]);
///         Box::new(std::iter::once(Ok(record.project(request.columns))))
///     }
/// }
///
/// let outcome = read_geo_table(
///     &Hohenpeissenberg,
///     "synop",
///     Columns::list(["station_id"]),
///     &Filters::new(),
///     &RequiredColumns::All,
/// )?;
/// let table = outcome.into_geo().expect("one row was decoded");
/// assert_eq!(table.crs().as_str(), "EPSG:4326");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn read_geo_table<D>(
    decoder: &D,
    source: &D::Source,
    columns: Columns,
    filters: &Filters,
    required_columns: &RequiredColumns,
) -> Result<ReadOutcome, GeoReadError<D::Error>>
where
    D: RecordDecoder,
{
    let table = read_table(
        decoder,
        source,
        columns.normalize(),
        filters,
        required_columns,
    )?;
    Ok(materialize(table)?)
}

/// Drain the decoder into a plain table without touching geometry or CRS.
///
/// The requested columns are passed through unchanged.
pub fn read_table<D>(
    decoder: &D,
    source: &D::Source,
    columns: Columns,
    filters: &Filters,
    required_columns: &RequiredColumns,
) -> Result<RawTable, GeoReadError<D::Error>>
where
    D: RecordDecoder,
{
    let mut handle = decoder
        .open(source)
        .map_err(|source| GeoReadError::Open { source })?;
    let request = StreamRequest {
        columns: &columns,
        filters,
        required_columns,
    };
    let rows = decoder
        .stream(&mut handle, request)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| GeoReadError::Decode { source })?;
    drop(handle);
    debug!("decoded {} records", rows.len());
    Ok(RawTable::new(columns.to_names(), rows))
}

/// Convert a drained table into its geospatial form.
///
/// Empty tables are returned unchanged as [`ReadOutcome::Empty`]. Otherwise
/// every row's raw `geometry` pair becomes a point and the first row's `CRS`
/// becomes the table CRS. Later rows are not required to agree; a
/// disagreement is logged.
///
/// # Errors
/// [`MaterializeError::MalformedGeometry`] when any row lacks a numeric
/// coordinate pair, checked before the CRS.
/// [`MaterializeError::UnsupportedCrs`] when the first row's CRS is falsy.
pub fn materialize(table: RawTable) -> Result<ReadOutcome, MaterializeError> {
    if table.is_empty() {
        return Ok(ReadOutcome::Empty(table));
    }
    let (columns, rows) = table.into_parts();

    let features = rows
        .into_iter()
        .enumerate()
        .map(|(row, mut properties)| {
            let value = properties.remove(GEOMETRY).unwrap_or_default();
            match point_from_value(&value) {
                Some(geometry) => Ok(GeoFeature {
                    geometry,
                    properties,
                }),
                None => Err(MaterializeError::MalformedGeometry { row, value }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let first = features
        .first()
        .map(|feature| feature.properties.value(CRS).clone())
        .unwrap_or_default();
    let crs = Crs::from_value(&first).ok_or_else(|| MaterializeError::UnsupportedCrs {
        value: first.clone(),
    })?;

    let disagreeing = features
        .iter()
        .filter(|feature| feature.properties.value(CRS) != &first)
        .count();
    if disagreeing > 0 {
        warn!("{disagreeing} rows carry a CRS other than {crs}; using {crs} for the whole table");
    }

    Ok(ReadOutcome::Geo(GeoTable::new(columns, features, crs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryDecoder;
    use crate::{FieldFilter, FieldValue, Record};
    use rstest::{fixture, rstest};

    fn observation(station: i64, geometry: FieldValue, crs: &str) -> Record {
        Record::from_iter([
            ("station_id", FieldValue::Int(station)),
            ("windSpeed", FieldValue::Float(4.0)),
            ("geometry", geometry),
            ("CRS", FieldValue::from(crs)),
        ])
    }

    #[fixture]
    fn columns() -> Columns {
        Columns::list(["station_id", "windSpeed"])
    }

    #[rstest]
    fn empty_table_short_circuits() {
        let table = RawTable::new(vec!["geometry".into(), "CRS".into()], Vec::new());
        let outcome = materialize(table.clone()).expect("empty table never fails");
        assert_eq!(outcome, ReadOutcome::Empty(table));
    }

    #[rstest]
    fn converts_pairs_to_points(columns: Columns) {
        let decoder = MemoryDecoder::new([observation(
            10962,
            FieldValue::from((11.01, 47.80)),
            "EPSG:4326",
        )]);
        let outcome = read_geo_table(
            &decoder,
            "synop",
            columns,
            &Filters::new(),
            &RequiredColumns::All,
        )
        .expect("read succeeds");
        let table = outcome.into_geo().expect("non-empty result");
        let point = table.geometries().next().expect("one row");
        assert_eq!((point.x(), point.y()), (11.01, 47.80));
        assert_eq!(
            table.columns(),
            ["station_id", "windSpeed", "geometry", "CRS"]
        );
        let feature = table.features().first().expect("one row");
        assert!(!feature.properties.contains("geometry"));
        assert_eq!(feature.properties.value("CRS"), &FieldValue::from("EPSG:4326"));
    }

    #[rstest]
    fn empty_crs_fails_fast(columns: Columns) {
        let decoder = MemoryDecoder::new([observation(1, FieldValue::from((1.0, 2.0)), "")]);
        let err = read_geo_table(
            &decoder,
            "synop",
            columns,
            &Filters::new(),
            &RequiredColumns::subset(["station_id"]),
        )
        .expect_err("empty CRS must be rejected");
        assert!(matches!(
            err,
            GeoReadError::Materialize(MaterializeError::UnsupportedCrs { .. })
        ));
    }

    #[rstest]
    fn malformed_geometry_fails_whole_table(columns: Columns) {
        let decoder = MemoryDecoder::new([
            observation(1, FieldValue::from((1.0, 2.0)), "EPSG:4326"),
            observation(2, FieldValue::from("1.0 2.0"), "EPSG:4326"),
        ]);
        let err = read_geo_table(
            &decoder,
            "synop",
            columns,
            &Filters::new(),
            &RequiredColumns::All,
        )
        .expect_err("malformed geometry must be rejected");
        match err {
            GeoReadError::Materialize(MaterializeError::MalformedGeometry { row, value }) => {
                assert_eq!(row, 1);
                assert_eq!(value, FieldValue::from("1.0 2.0"));
            }
            other => panic!("expected malformed geometry, got {other:?}"),
        }
    }

    #[rstest]
    fn geometry_is_checked_before_crs(columns: Columns) {
        let decoder = MemoryDecoder::new([observation(1, FieldValue::Int(7), "")]);
        let err = read_geo_table(
            &decoder,
            "synop",
            columns,
            &Filters::new(),
            &RequiredColumns::subset(["station_id"]),
        )
        .expect_err("both checks fail");
        assert!(matches!(
            err,
            GeoReadError::Materialize(MaterializeError::MalformedGeometry { row: 0, .. })
        ));
    }

    #[rstest]
    fn first_row_crs_wins(columns: Columns) {
        let decoder = MemoryDecoder::new([
            observation(1, FieldValue::from((1.0, 2.0)), "EPSG:4258"),
            observation(2, FieldValue::from((3.0, 4.0)), "EPSG:4326"),
        ]);
        let table = read_geo_table(
            &decoder,
            "synop",
            columns,
            &Filters::new(),
            &RequiredColumns::All,
        )
        .expect("read succeeds")
        .into_geo()
        .expect("non-empty result");
        assert_eq!(table.crs().as_str(), "EPSG:4258");
        assert_eq!(table.len(), 2);
    }

    #[rstest]
    fn filters_are_left_to_the_decoder(columns: Columns) {
        let decoder = MemoryDecoder::new([
            observation(1, FieldValue::from((1.0, 2.0)), "EPSG:4326"),
            observation(2, FieldValue::from((3.0, 4.0)), "EPSG:4326"),
        ]);
        let filters = Filters::new().with(
            "station_id",
            FieldFilter::predicate(|value| value == &FieldValue::Int(2)),
        );
        let outcome = read_geo_table(
            &decoder,
            "synop",
            columns,
            &filters,
            &RequiredColumns::All,
        )
        .expect("read succeeds");
        assert_eq!(outcome.len(), 1);
        assert_eq!(decoder.streamed(), 1);
    }

    #[rstest]
    fn repeated_columns_do_not_drop_records() {
        let decoder = MemoryDecoder::new([observation(
            10962,
            FieldValue::from((11.01, 47.80)),
            "EPSG:4326",
        )]);
        let table = read_geo_table(
            &decoder,
            "synop",
            Columns::list(["windSpeed", "windSpeed", "geometry", "geometry"]),
            &Filters::new(),
            &RequiredColumns::All,
        )
        .expect("read succeeds")
        .into_geo()
        .expect("the record is kept");
        assert_eq!(table.len(), 1);
        let feature = table.features().first().expect("one row");
        assert_eq!(feature.properties.value("windSpeed"), &FieldValue::Float(4.0));
    }

    #[rstest]
    fn read_table_does_not_add_sentinels(columns: Columns) {
        let decoder = MemoryDecoder::new([observation(
            1,
            FieldValue::from((1.0, 2.0)),
            "EPSG:4326",
        )]);
        let table = read_table(
            &decoder,
            "synop",
            columns,
            &Filters::new(),
            &RequiredColumns::All,
        )
        .expect("read succeeds");
        assert_eq!(table.columns(), ["station_id", "windSpeed"]);
        let row = table.rows().first().expect("one row");
        assert!(!row.contains("geometry"));
    }
}
