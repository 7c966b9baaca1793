//! Record-dump decoding for the geobufr pipeline.
//!
//! Responsibilities:
//! - Read newline-delimited JSON dumps of decoded BUFR observations.
//! - Synthesize the `geometry` and `CRS` virtual fields from station
//!   coordinates and the coordinate reference system code.
//! - Apply the caller's filters and required-column policy while streaming.
//!
//! Boundaries:
//! - No geometry construction or CRS validation (lives in `geobufr-core`).
//!
//! Invariants:
//! - Each open dump is owned by one handle and closed when it drops.
#![forbid(unsafe_code)]

mod decoder;
mod error;
pub mod virtual_fields;

pub use decoder::{JsonRecordDecoder, RecordDumpHandle};
pub use error::RecordDumpError;
