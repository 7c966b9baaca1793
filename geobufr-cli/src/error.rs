//! Error types emitted by the geobufr CLI.
//!
//! Keep this error type reasonably small, as CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use geobufr_core::GeoReadError;
use geobufr_data::RecordDumpError;
use thiserror::Error;

/// Errors emitted by the geobufr CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The search radius is not a positive distance.
    #[error("--within-km must be a positive distance, found {value}")]
    InvalidRadius { value: f64 },
    /// Reading or materializing the record dump failed.
    #[error("failed to read observations from {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: Box<GeoReadError<RecordDumpError>>,
    },
    /// Serializing the feature collection failed.
    #[error("failed to serialize feature collection: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the feature collection failed.
    #[error("failed to write feature collection: {0}")]
    WriteOutput(#[source] std::io::Error),
}
