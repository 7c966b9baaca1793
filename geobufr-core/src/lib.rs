//! Core types and the geo-enrichment pipeline for decoded BUFR observations.
//!
//! A [`RecordDecoder`] streams decoded observations as [`Record`]s. The
//! pipeline makes sure the `geometry` and `CRS` columns are always requested,
//! drains the filtered stream into a [`RawTable`] and, when it is not empty,
//! turns the raw coordinate pairs into points sharing a single [`Crs`].
//!
//! Decoders own parsing and filtering. This crate only defines the seam and
//! consumes what decoders yield.

pub mod columns;
pub mod decoder;
pub mod filter;
pub mod geometry;
pub mod materialize;
pub mod record;
pub mod table;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod value;

pub use columns::{Columns, ConfigurationError, SENTINEL_COLUMNS};
pub use decoder::{RecordDecoder, RecordStream, StreamRequest};
pub use filter::{Coercion, FieldFilter, Filters, RequiredColumns};
pub use geometry::{distance, point_from_value};
pub use materialize::{GeoReadError, MaterializeError, materialize, read_geo_table, read_table};
pub use record::{CRS, GEOMETRY, Record};
pub use table::{Crs, GeoFeature, GeoTable, RawTable, ReadOutcome};
pub use value::FieldValue;
