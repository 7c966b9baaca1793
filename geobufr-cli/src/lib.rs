//! Command-line interface for reading record dumps as GeoJSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod geojson;
mod read;

pub use error::CliError;

use read::{ReadArgs, run_read};

const ARG_SOURCE: &str = "source";
const ARG_COLUMN: &str = "column";
const ARG_REQUIRED: &str = "required";
const ARG_FLOAT: &str = "float";
const ARG_WITHIN_KM: &str = "within-km";
const ARG_CENTER_LON: &str = "center-lon";
const ARG_CENTER_LAT: &str = "center-lat";
const ENV_SOURCE: &str = "GEOBUFR_CMDS_READ_SOURCE";
const ENV_COLUMN: &str = "GEOBUFR_CMDS_READ_COLUMN";
const ENV_CENTER_LON: &str = "GEOBUFR_CMDS_READ_CENTER_LON";
const ENV_CENTER_LAT: &str = "GEOBUFR_CMDS_READ_CENTER_LAT";

/// Run the CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Read(args) => run_read(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "geobufr",
    about = "Read decoded BUFR observations as geospatial features",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read a record dump and print a GeoJSON feature collection.
    Read(ReadArgs),
}

#[cfg(test)]
mod tests;
