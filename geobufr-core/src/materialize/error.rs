use thiserror::Error;

use crate::FieldValue;

/// Errors from turning a non-empty table into a [`crate::GeoTable`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaterializeError {
    /// A row's `geometry` field is not a numeric `[x, y]` pair.
    ///
    /// One malformed row fails the whole table; no partial result is built.
    #[error("row {row} has malformed geometry {value:?}; expected an [x, y] coordinate pair")]
    MalformedGeometry {
        /// Zero-based row index.
        row: usize,
        /// The raw field value.
        value: FieldValue,
    },
    /// The first row's `CRS` field is empty or missing.
    #[error(
        "the decoder does not currently support the coordinate system reference present in the data (found {value:?})"
    )]
    UnsupportedCrs {
        /// The raw field value.
        value: FieldValue,
    },
}

/// Errors from [`crate::read_table`] and [`crate::read_geo_table`].
#[derive(Debug, Error)]
pub enum GeoReadError<E> {
    /// The decoder could not open the source.
    #[error("failed to open message source: {source}")]
    Open {
        /// Decoder failure.
        source: E,
    },
    /// The decoder failed while streaming records.
    #[error("failed to decode observations: {source}")]
    Decode {
        /// Decoder failure.
        source: E,
    },
    /// The decoded rows could not be materialized.
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}
