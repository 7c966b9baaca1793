//! The seam between the materializer and a structured-message decoder.

use crate::{Columns, Filters, Record, RequiredColumns};

/// Lazily decoded records, or the decoder's error for the failing record.
pub type RecordStream<'h, E> = Box<dyn Iterator<Item = Result<Record, E>> + 'h>;

/// Everything a decoder needs to select records.
#[derive(Debug, Clone, Copy)]
pub struct StreamRequest<'a> {
    /// Columns to return for every record.
    pub columns: &'a Columns,
    /// Per-field filters; the decoder applies them.
    pub filters: &'a Filters,
    /// Which columns must carry a value for a record to be kept.
    pub required_columns: &'a RequiredColumns,
}

/// Decode observation records from a message source.
///
/// Implementations own message framing and filtering. `open` acquires a
/// handle that releases its resources when dropped, so callers get release
/// on every exit path without explicit cleanup. `stream` yields a single
/// pass over the records that satisfy the request, projected onto the
/// requested columns.
///
/// # Examples
///
/// ```rust
/// use std::convert::Infallible;
/// use geobufr_core::{
///     Columns, FieldValue, Filters, Record, RecordDecoder, RecordStream, RequiredColumns,
///     StreamRequest, read_table,
/// };
///
/// struct Single;
///
/// impl RecordDecoder for Single {
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
///         let record = Record::from_iter([("windSpeed", FieldValue::Float(3.0))]);
///         Box::new(std::iter::once(Ok(record.project(request.columns))))
///     }
/// }
///
/// let table = read_table(
///     &Single,
///     "memory",
///     Columns::list(["windSpeed"]),
///     &Filters::new(),
///     &RequiredColumns::All,
/// )?;
/// assert_eq!(table.len(), 1);
/// # Ok::<(), geobufr_core::GeoReadError<Infallible>>(())
/// ```
pub trait RecordDecoder {
    /// What identifies a message source, e.g. a path.
    type Source: ?Sized;
    /// Open source state, released on drop.
    type Handle;
    /// Failure to open or decode the source.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Acquire a handle on `source`.
    fn open(&self, source: &Self::Source) -> Result<Self::Handle, Self::Error>;

    /// Stream the records selected by `request`.
    fn stream<'h>(
        &'h self,
        handle: &'h mut Self::Handle,
        request: StreamRequest<'h>,
    ) -> RecordStream<'h, Self::Error>;
}
