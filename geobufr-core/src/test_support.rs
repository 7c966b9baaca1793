//! In-memory decoder and synoptic station fixtures used by unit and
//! behaviour tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Point;
use thiserror::Error;

use crate::{FieldValue, Record, RecordDecoder, RecordStream, StreamRequest};

/// Longitude and latitude of the Hohenpeißenberg observatory.
pub const HOHENPEISSENBERG: (f64, f64) = (11.010754, 47.800864);

/// Search radius, in metres, used with the station fixture.
pub const FIXTURE_RADIUS_M: f64 = 100_000.0;

/// CRS carried by every fixture record.
pub const FIXTURE_CRS: &str = "EPSG:4326";

/// Errors raised by [`MemoryDecoder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryDecodeError {
    /// The decoder was configured to refuse the source.
    #[error("message source {source_name} is unavailable")]
    Unavailable {
        /// Name passed to `open`.
        source_name: String,
    },
    /// The decoder was configured to fail at a record.
    #[error("record {index} could not be decoded")]
    Corrupt {
        /// Zero-based index of the failing record.
        index: usize,
    },
}

#[derive(Debug, Default)]
struct Counters {
    opened: AtomicUsize,
    released: AtomicUsize,
    streamed: AtomicUsize,
}

/// Open handle on a [`MemoryDecoder`]; counts its own release.
#[derive(Debug)]
pub struct MemoryHandle {
    counters: Arc<Counters>,
}

impl Drop for MemoryHandle {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Decoder over a fixed set of records.
///
/// Honours filters and required columns the way a real decoder does and
/// records how many handles were opened and released.
#[derive(Debug, Default)]
pub struct MemoryDecoder {
    records: Vec<Record>,
    fail_at: Option<usize>,
    unavailable: bool,
    counters: Arc<Counters>,
}

impl MemoryDecoder {
    /// Decode the supplied records.
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        Self {
            records: records.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Fail with [`MemoryDecodeError::Corrupt`] when reaching record `index`.
    #[must_use]
    pub fn failing_at(mut self, index: usize) -> Self {
        self.fail_at = Some(index);
        self
    }

    /// Refuse to open any source.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Handles opened so far.
    #[must_use]
    pub fn opened(&self) -> usize {
        self.counters.opened.load(Ordering::SeqCst)
    }

    /// Handles released so far.
    #[must_use]
    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }

    /// Records handed to the caller so far.
    #[must_use]
    pub fn streamed(&self) -> usize {
        self.counters.streamed.load(Ordering::SeqCst)
    }
}

impl RecordDecoder for MemoryDecoder {
    type Source = str;
    type Handle = MemoryHandle;
    type Error = MemoryDecodeError;

    fn open(&self, source: &str) -> Result<MemoryHandle, MemoryDecodeError> {
        if self.unavailable {
            return Err(MemoryDecodeError::Unavailable {
                source_name: source.to_owned(),
            });
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryHandle {
            counters: Arc::clone(&self.counters),
        })
    }

    fn stream<'h>(
        &'h self,
        handle: &'h mut MemoryHandle,
        request: StreamRequest<'h>,
    ) -> RecordStream<'h, MemoryDecodeError> {
        let fail_at = self.fail_at;
        Box::new(
            self.records
                .iter()
                .enumerate()
                .filter_map(move |(index, record)| {
                    if fail_at == Some(index) {
                        return Some(Err(MemoryDecodeError::Corrupt { index }));
                    }
                    let projected = request.filters.apply(record.clone())?.project(request.columns);
                    if !request
                        .required_columns
                        .is_satisfied_by(&projected, request.columns)
                    {
                        return None;
                    }
                    handle.counters.streamed.fetch_add(1, Ordering::SeqCst);
                    Some(Ok(projected))
                }),
        )
    }
}

/// Hohenpeißenberg as a point.
#[must_use]
pub fn fixture_center() -> Point<f64> {
    Point::new(HOHENPEISSENBERG.0, HOHENPEISSENBERG.1)
}

const NEARBY_STATIONS: [(i64, &str, f64, f64, i64, f64); 13] = [
    (10962, "Hohenpeissenberg", 11.0108, 47.8009, 250, 6.2),
    (10963, "Garmisch-Partenkirchen", 11.0621, 47.4830, 90, 1.5),
    (10961, "Zugspitze", 10.9849, 47.4210, 270, 12.3),
    (10946, "Kempten", 10.3342, 47.7233, 230, 3.1),
    (10852, "Augsburg", 10.9420, 48.4254, 240, 4.6),
    (10865, "Muenchen-Stadt", 11.5429, 48.1632, 200, 2.8),
    (10980, "Oberstdorf", 10.2767, 47.3984, 180, 0.9),
    (10947, "Kaufbeuren", 10.6144, 47.8640, 250, 3.7),
    (10855, "Landsberg", 10.8600, 48.0500, 260, 5.4),
    (10966, "Wielenbach", 11.1558, 47.8833, 220, 2.2),
    (10964, "Mittenwald", 11.2617, 47.4344, 60, 1.1),
    (10967, "Attenkam", 11.3625, 47.8772, 210, 4.0),
    (10968, "Bad Toelz", 11.5600, 47.7600, 240, 3.3),
];

fn station(
    id: i64,
    name: &str,
    location: Option<(f64, f64)>,
    wind_direction: FieldValue,
    wind_speed: FieldValue,
) -> Record {
    let (longitude, latitude) = location.unzip();
    Record::from_iter([
        ("station_id", FieldValue::Int(id)),
        ("stationOrSiteName", FieldValue::from(name)),
        ("longitude", FieldValue::from(longitude)),
        ("latitude", FieldValue::from(latitude)),
        ("geometry", FieldValue::from(location)),
        ("CRS", FieldValue::from(FIXTURE_CRS)),
        ("windDirection", wind_direction),
        ("windSpeed", wind_speed),
    ])
}

/// Synoptic observations around southern Germany.
///
/// Requesting `station_id`, `geometry`, `windDirection` and `windSpeed`
/// with every column required keeps 204 records. Coercing both wind fields
/// to float keeps 201, and additionally restricting `geometry` to
/// [`FIXTURE_RADIUS_M`] around [`HOHENPEISSENBERG`] keeps 13.
///
/// Six further records have no coordinates and are always dropped by the
/// required-column check.
#[must_use]
pub fn station_fixture() -> Vec<Record> {
    let mut records = Vec::with_capacity(210);

    for (id, name, lon, lat, direction, speed) in NEARBY_STATIONS {
        records.push(station(
            id,
            name,
            Some((lon, lat)),
            FieldValue::Int(direction),
            FieldValue::Float(speed),
        ));
    }

    // A regular grid over northern and central Germany, all far outside
    // the search radius.
    let mut next_id = 10_000_i64;
    for row in 0_u32..12 {
        for col in 0_u32..16 {
            if next_id == 10_188 {
                break;
            }
            let lon = 6.0 + f64::from(col) * 0.5;
            let lat = 50.5 + f64::from(row) * 0.3;
            let direction = (next_id * 37) % 360;
            let speed = f64::from((row * 16 + col) % 15) + 0.5;
            records.push(station(
                next_id,
                "Grid station",
                Some((lon, lat)),
                FieldValue::Int(direction),
                FieldValue::Float(speed),
            ));
            next_id += 1;
        }
    }

    // Present but non-numeric wind speed, as reported for broken sensors.
    for lon in [8.0, 9.0, 10.0] {
        records.push(station(
            next_id,
            "Coastal station",
            Some((lon, 54.2)),
            FieldValue::Int(0),
            FieldValue::from("//"),
        ));
        next_id += 1;
    }

    for _ in 0..6 {
        records.push(station(
            next_id,
            "Mobile station",
            None,
            FieldValue::Int(180),
            FieldValue::Float(2.0),
        ));
        next_id += 1;
    }

    records
}
