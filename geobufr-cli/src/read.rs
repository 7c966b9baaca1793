//! Read command implementation for the geobufr CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Point;
use geobufr_core::{
    Coercion, Columns, FieldFilter, Filters, GEOMETRY, ReadOutcome, RequiredColumns,
    read_geo_table,
};
use geobufr_data::JsonRecordDecoder;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::geojson::feature_collection;
use crate::{
    ARG_CENTER_LAT, ARG_CENTER_LON, ARG_COLUMN, ARG_FLOAT, ARG_REQUIRED, ARG_SOURCE,
    ARG_WITHIN_KM, CliError, ENV_CENTER_LAT, ENV_CENTER_LON, ENV_COLUMN, ENV_SOURCE,
};

/// CLI arguments for the `read` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Read a newline-delimited JSON dump of decoded BUFR \
                 observations, keep the records that carry every required \
                 column and pass the filters, and print them as a GeoJSON \
                 feature collection. The geometry and CRS columns are always \
                 included.",
    about = "Read observations as GeoJSON"
)]
#[ortho_config(prefix = "GEOBUFR")]
pub(crate) struct ReadArgs {
    /// Path to the record dump.
    #[arg(long = ARG_SOURCE, value_name = "path")]
    #[serde(default)]
    pub(crate) source: Option<Utf8PathBuf>,
    /// Column to return. Repeat for several columns.
    #[arg(long = ARG_COLUMN, value_name = "name")]
    #[serde(default)]
    pub(crate) column: Vec<String>,
    /// Column that must carry a value. Defaults to every requested column.
    #[arg(long = ARG_REQUIRED, value_name = "name")]
    #[serde(default)]
    pub(crate) required: Vec<String>,
    /// Field to coerce to a float; records that cannot be coerced are dropped.
    #[arg(long = ARG_FLOAT, value_name = "name")]
    #[serde(default)]
    pub(crate) float: Vec<String>,
    /// Keep only observations within this many kilometres of the center.
    #[arg(long = ARG_WITHIN_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) within_km: Option<f64>,
    /// Longitude of the search center.
    #[arg(long = ARG_CENTER_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) center_lon: Option<f64>,
    /// Latitude of the search center.
    #[arg(long = ARG_CENTER_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) center_lat: Option<f64>,
}

impl ReadArgs {
    pub(crate) fn into_config(self) -> Result<ReadConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ReadConfig::try_from(merged)
    }
}

/// Circle that observations must fall inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SearchArea {
    pub(crate) center: Point<f64>,
    pub(crate) radius_m: f64,
}

/// Resolved `read` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReadConfig {
    pub(crate) source: Utf8PathBuf,
    pub(crate) columns: Columns,
    pub(crate) required_columns: RequiredColumns,
    pub(crate) float_fields: Vec<String>,
    pub(crate) search_area: Option<SearchArea>,
}

impl ReadConfig {
    /// Filters handed to the decoder.
    pub(crate) fn filters(&self) -> Filters {
        let coerced = self.float_fields.iter().fold(Filters::new(), |filters, field| {
            filters.with(field.as_str(), FieldFilter::Coerce(Coercion::Float))
        });
        match self.search_area {
            Some(area) => coerced.with(GEOMETRY, FieldFilter::within(area.center, area.radius_m)),
            None => coerced,
        }
    }
}

impl TryFrom<ReadArgs> for ReadConfig {
    type Error = CliError;

    fn try_from(args: ReadArgs) -> Result<Self, Self::Error> {
        let source = args.source.ok_or(CliError::MissingArgument {
            field: ARG_SOURCE,
            env: ENV_SOURCE,
        })?;
        if args.column.is_empty() {
            return Err(CliError::MissingArgument {
                field: ARG_COLUMN,
                env: ENV_COLUMN,
            });
        }
        let required_columns = if args.required.is_empty() {
            RequiredColumns::All
        } else {
            RequiredColumns::subset(args.required)
        };
        let search_area = args
            .within_km
            .map(|km| search_area(km, args.center_lon, args.center_lat))
            .transpose()?;

        Ok(Self {
            source,
            columns: Columns::list(args.column),
            required_columns,
            float_fields: args.float,
            search_area,
        })
    }
}

fn search_area(
    km: f64,
    center_lon: Option<f64>,
    center_lat: Option<f64>,
) -> Result<SearchArea, CliError> {
    if !(km.is_finite() && km > 0.0) {
        return Err(CliError::InvalidRadius { value: km });
    }
    let lon = center_lon.ok_or(CliError::MissingArgument {
        field: ARG_CENTER_LON,
        env: ENV_CENTER_LON,
    })?;
    let lat = center_lat.ok_or(CliError::MissingArgument {
        field: ARG_CENTER_LAT,
        env: ENV_CENTER_LAT,
    })?;
    Ok(SearchArea {
        center: Point::new(lon, lat),
        radius_m: km * 1_000.0,
    })
}

pub(crate) fn run_read(args: ReadArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_read_with(args, &mut stdout)
}

pub(crate) fn run_read_with(args: ReadArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let outcome = execute_read(&config)?;
    write_feature_collection(writer, &outcome)
}

pub(crate) fn execute_read(config: &ReadConfig) -> Result<ReadOutcome, CliError> {
    let outcome = read_geo_table(
        &JsonRecordDecoder,
        config.source.as_path(),
        config.columns.clone(),
        &config.filters(),
        &config.required_columns,
    )
    .map_err(|source| CliError::Read {
        path: config.source.clone(),
        source: Box::new(source),
    })?;
    info!("read {} observations from {}", outcome.len(), config.source);
    Ok(outcome)
}

fn write_feature_collection(writer: &mut dyn Write, outcome: &ReadOutcome) -> Result<(), CliError> {
    let collection = feature_collection(outcome).map_err(CliError::SerializeOutput)?;
    let payload = serde_json::to_string_pretty(&collection).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
