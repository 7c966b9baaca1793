//! Shared test harness modules for the geobufr CLI.
use super::*;

mod helpers;
