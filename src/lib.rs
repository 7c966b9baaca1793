//! Facade crate for geo-enriched reads of decoded BUFR observations.
//!
//! This crate re-exports the core pipeline types and exposes the record-dump
//! decoder behind a feature flag.

#![forbid(unsafe_code)]

pub use geobufr_core::{
    Coercion, Columns, ConfigurationError, Crs, FieldFilter, FieldValue, Filters, GeoFeature,
    GeoReadError, GeoTable, MaterializeError, RawTable, ReadOutcome, Record, RecordDecoder,
    RecordStream, RequiredColumns, StreamRequest, distance, materialize, read_geo_table,
    read_table,
};

#[cfg(feature = "record-dump")]
pub use geobufr_data::{JsonRecordDecoder, RecordDumpError};
