//! Unit tests for the record-dump decoder.

use std::io::Write;

use camino::Utf8PathBuf;
use geobufr_core::{
    Coercion, Columns, FieldFilter, FieldValue, Filters, GeoReadError, RawTable, RecordDecoder,
    RequiredColumns, StreamRequest, read_table,
};
use rstest::{fixture, rstest};
use tempfile::TempDir;

use super::JsonRecordDecoder;
use crate::RecordDumpError;

struct Dump {
    _dir: TempDir,
    path: Utf8PathBuf,
}

#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

fn write_dump(dir: TempDir, lines: &[&str]) -> Dump {
    let path = Utf8PathBuf::from_path_buf(dir.path().join("records.ndjson"))
        .expect("temp paths are UTF-8");
    let mut file = std::fs::File::create(&path).expect("create dump");
    for line in lines {
        writeln!(file, "{line}").expect("write dump line");
    }
    Dump { _dir: dir, path }
}

fn read(
    dump: &Dump,
    columns: Columns,
    filters: &Filters,
) -> Result<RawTable, GeoReadError<RecordDumpError>> {
    read_table(
        &JsonRecordDecoder,
        dump.path.as_path(),
        columns,
        filters,
        &RequiredColumns::from(false),
    )
}

#[rstest]
fn projects_onto_requested_columns(temp_dir: TempDir) {
    let dump = write_dump(
        temp_dir,
        &[r#"{"station_id": 10962, "windSpeed": 6.2, "airTemperature": 281.4}"#],
    );
    let columns = Columns::list(["station_id", "windSpeed", "windDirection"]);
    let table = read(&dump, columns, &Filters::new()).expect("dump should decode");
    let row = &table.rows()[0];
    assert_eq!(row.len(), 3);
    assert_eq!(row.value("station_id"), &FieldValue::Int(10962));
    assert_eq!(row.value("windDirection"), &FieldValue::Missing);
    assert!(!row.contains("airTemperature"));
}

#[rstest]
fn synthesizes_geometry_and_crs(temp_dir: TempDir) {
    let dump = write_dump(
        temp_dir,
        &[
            r#"{"longitude": 11.01, "latitude": 47.8}"#,
            r#"{"longitude": 11.06, "latitude": 47.48, "coordinateReferenceSystem": 1}"#,
            r#"{"longitude": null, "latitude": 47.48, "coordinateReferenceSystem": 9}"#,
        ],
    );
    let table = read(&dump, Columns::list(["geometry", "CRS"]), &Filters::new())
        .expect("dump should decode");
    let geometries: Vec<_> = table.column("geometry").cloned().collect();
    let crs: Vec<_> = table.column("CRS").cloned().collect();
    assert_eq!(
        geometries,
        [
            FieldValue::from((11.01, 47.8)),
            FieldValue::from((11.06, 47.48)),
            FieldValue::Missing,
        ]
    );
    assert_eq!(
        crs,
        [
            FieldValue::from("EPSG:4326"),
            FieldValue::from("EPSG:4258"),
            FieldValue::from(""),
        ]
    );
}

#[rstest]
fn skips_blank_lines(temp_dir: TempDir) {
    let dump = write_dump(
        temp_dir,
        &["", r#"{"windSpeed": 1.5}"#, "   ", r#"{"windSpeed": 2}"#],
    );
    let table =
        read(&dump, Columns::list(["windSpeed"]), &Filters::new()).expect("dump should decode");
    assert_eq!(table.len(), 2);
}

#[rstest]
fn applies_filters_before_projection(temp_dir: TempDir) {
    let dump = write_dump(
        temp_dir,
        &[
            r#"{"windSpeed": "7", "windDirection": 250}"#,
            r#"{"windSpeed": "//", "windDirection": 90}"#,
        ],
    );
    let filters = Filters::new()
        .with("windSpeed", FieldFilter::Coerce(Coercion::Float))
        .with(
            "windDirection",
            FieldFilter::predicate(|v| v.as_f64().is_some_and(|d| d > 180.0)),
        );
    let table = read(&dump, Columns::list(["windSpeed"]), &filters).expect("dump should decode");
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows()[0].value("windSpeed"), &FieldValue::Float(7.0));
    assert!(!table.rows()[0].contains("windDirection"));
}

#[rstest]
fn required_columns_drop_incomplete_records(temp_dir: TempDir) {
    let dump = write_dump(
        temp_dir,
        &[r#"{"windSpeed": 3.0}"#, r#"{"windSpeed": null}"#, r#"{}"#],
    );
    let table = read_table(
        &JsonRecordDecoder,
        dump.path.as_path(),
        Columns::list(["windSpeed"]),
        &Filters::new(),
        &RequiredColumns::All,
    )
    .expect("dump should decode");
    assert_eq!(table.len(), 1);
}

#[rstest]
#[case(&[r#"{"windSpeed": 1}"#, "{not json"], 2)]
#[case(&["", r#"{"windSpeed": 1}"#, "[1, 2]"], 3)]
fn reports_the_failing_line(temp_dir: TempDir, #[case] lines: &[&str], #[case] expected: usize) {
    let dump = write_dump(temp_dir, lines);
    let err = read(&dump, Columns::list(["windSpeed"]), &Filters::new())
        .expect_err("malformed line should fail");
    let GeoReadError::Decode { source } = err else {
        panic!("expected a decode error, got {err:?}");
    };
    assert_eq!(source.line(), Some(expected));
}

#[rstest]
fn missing_dump_fails_to_open(temp_dir: TempDir) {
    let path = Utf8PathBuf::from_path_buf(temp_dir.path().join("absent.ndjson"))
        .expect("temp paths are UTF-8");
    let err = JsonRecordDecoder
        .open(&path)
        .expect_err("absent dump should not open");
    assert!(matches!(err, RecordDumpError::Open { .. }));
    assert_eq!(err.line(), None);
}

#[rstest]
fn stream_stops_after_an_error(temp_dir: TempDir) {
    let dump = write_dump(temp_dir, &["{broken", r#"{"windSpeed": 1}"#]);
    let columns = Columns::list(["windSpeed"]);
    let filters = Filters::new();
    let required = RequiredColumns::All;
    let mut handle = JsonRecordDecoder.open(&dump.path).expect("dump opens");
    let request = StreamRequest {
        columns: &columns,
        filters: &filters,
        required_columns: &required,
    };
    let results: Vec<_> = JsonRecordDecoder.stream(&mut handle, request).collect();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_err());
}
