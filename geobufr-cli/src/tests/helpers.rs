//! Test helpers for writing record dumps.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use geobufr_core::test_support::station_fixture;
use geobufr_core::{CRS, GEOMETRY};
use tempfile::TempDir;

pub(super) fn utf8_root(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace")
}

/// Write the station fixture as a record dump, leaving `geometry` and `CRS`
/// for the decoder to synthesize.
pub(super) fn write_station_dump(path: &Utf8Path) {
    let mut file = std::fs::File::create(path).expect("create dump");
    for mut record in station_fixture() {
        record.remove(GEOMETRY);
        record.remove(CRS);
        let line = serde_json::to_string(&record).expect("serialize record");
        writeln!(file, "{line}").expect("write dump line");
    }
}
