//! Newline-delimited JSON record dumps as a [`RecordDecoder`].

use std::io::{BufRead, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use geobufr_core::{FieldValue, Record, RecordDecoder, RecordStream, StreamRequest};
use log::debug;
use serde_json::Value;

use crate::RecordDumpError;
use crate::virtual_fields::synthesize;

/// Decoder for record dumps: one JSON object per line, one observation per
/// object.
///
/// Blank lines are skipped. `geometry` and `CRS` are synthesized when they
/// are requested or filtered and the line does not carry them.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use geobufr_core::{Columns, Filters, RequiredColumns, read_geo_table};
/// use geobufr_data::JsonRecordDecoder;
///
/// let outcome = read_geo_table(
///     &JsonRecordDecoder,
///     Utf8Path::new("synop.ndjson"),
///     Columns::list(["station_id", "windSpeed"]),
///     &Filters::new(),
///     &RequiredColumns::All,
/// )?;
/// println!("{} stations", outcome.len());
/// # Ok::<(), geobufr_core::GeoReadError<geobufr_data::RecordDumpError>>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecordDecoder;

/// An open record dump. The file closes when the handle drops.
#[derive(Debug)]
pub struct RecordDumpHandle {
    path: Utf8PathBuf,
    reader: BufReader<fs_utf8::File>,
    line: usize,
}

impl RecordDumpHandle {
    /// Path the dump was opened from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl RecordDecoder for JsonRecordDecoder {
    type Source = Utf8Path;
    type Handle = RecordDumpHandle;
    type Error = RecordDumpError;

    fn open(&self, path: &Utf8Path) -> Result<RecordDumpHandle, RecordDumpError> {
        let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
            RecordDumpError::Open {
                source,
                path: path.to_path_buf(),
            }
        })?;
        debug!("opened record dump {path}");
        Ok(RecordDumpHandle {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            line: 0,
        })
    }

    fn stream<'h>(
        &'h self,
        handle: &'h mut RecordDumpHandle,
        request: StreamRequest<'h>,
    ) -> RecordStream<'h, RecordDumpError> {
        Box::new(DumpRecords {
            handle,
            request,
            buffer: String::new(),
            failed: false,
        })
    }
}

struct DumpRecords<'h> {
    handle: &'h mut RecordDumpHandle,
    request: StreamRequest<'h>,
    buffer: String,
    failed: bool,
}

impl DumpRecords<'_> {
    fn next_line(&mut self) -> Option<Result<(), RecordDumpError>> {
        self.buffer.clear();
        match self.handle.reader.read_line(&mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                self.handle.line += 1;
                Some(Ok(()))
            }
            Err(source) => Some(Err(RecordDumpError::Read {
                source,
                path: self.handle.path.clone(),
                line: self.handle.line + 1,
            })),
        }
    }

    fn parse_line(&self) -> Result<Record, RecordDumpError> {
        let path = &self.handle.path;
        let line = self.handle.line;
        let value: Value =
            serde_json::from_str(&self.buffer).map_err(|source| RecordDumpError::Parse {
                source,
                path: path.clone(),
                line,
            })?;
        let Value::Object(fields) = value else {
            return Err(RecordDumpError::NotAnObject {
                path: path.clone(),
                line,
            });
        };
        Ok(fields
            .into_iter()
            .map(|(name, value)| (name, FieldValue::from(value)))
            .collect())
    }

    fn select(&self, mut record: Record) -> Option<Record> {
        let StreamRequest {
            columns,
            filters,
            required_columns,
        } = self.request;
        synthesize(&mut record, |field| {
            columns.contains(field) || filters.fields().any(|name| name == field)
        });
        let projected = filters.apply(record)?.project(columns);
        required_columns
            .is_satisfied_by(&projected, columns)
            .then_some(projected)
    }
}

impl Iterator for DumpRecords<'_> {
    type Item = Result<Record, RecordDumpError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Err(err) = self.next_line()? {
                self.failed = true;
                return Some(Err(err));
            }
            if self.buffer.trim().is_empty() {
                continue;
            }
            let record = match self.parse_line() {
                Ok(record) => record,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            };
            if let Some(selected) = self.select(record) {
                return Some(Ok(selected));
            }
        }
    }
}

#[cfg(test)]
mod tests;
