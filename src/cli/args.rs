//! Command-line argument definitions for argo-wrangler
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::{AccessorConfig, CoordinatePolicy, LoaderConfig};
use crate::constants::{DEFAULT_LOG_LEVEL, PROFILE_COORDINATES};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reshape Argo float measurements between point and profile layouts
#[derive(Debug, Clone, Parser)]
#[command(
    name = "argo-wrangler",
    version,
    about = "Normalise and reshape Argo float measurement collections",
    long_about = "Locates float files in a local Argo snapshot, normalises QC and metadata \
                  storage, and reshapes flat point tables into padded profile grids (and back)."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print the path of a float's multi-profile file
    Locate(FloatArgs),
    /// Reshape a table of points into a table of profile cells
    Reshape(ReshapeArgs),
    /// Load a float's profiles and write them as a table of points
    #[cfg(feature = "netcdf")]
    Flatten(FlattenArgs),
}

/// Identifies one float in a local snapshot
#[derive(Debug, Clone, Parser)]
pub struct FloatArgs {
    /// Snapshot root directory
    ///
    /// Contains one directory per institute. Defaults to `<data dir>/argo`.
    #[arg(long = "root", value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Institute code (e.g. IF) or directory name (e.g. coriolis)
    #[arg(short = 'i', long = "institute", value_name = "INST")]
    pub institute: String,

    /// WMO platform number
    #[arg(short = 'w', long = "wmo", value_name = "WMO")]
    pub wmo: u64,
}

impl FloatArgs {
    pub fn loader_config(&self) -> LoaderConfig {
        match &self.root {
            Some(root) => LoaderConfig::new(root),
            None => LoaderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Parser)]
pub struct ReshapeArgs {
    /// Point table (.parquet or .csv)
    #[arg(long = "input", value_name = "PATH")]
    pub input: PathBuf,

    /// Output Parquet file
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: PathBuf,

    /// Skip QC and metadata type normalisation
    #[arg(long = "no-cast")]
    pub no_cast: bool,

    /// Columns treated as coordinates
    #[arg(
        long = "coords",
        value_name = "LIST",
        value_delimiter = ',',
        default_values_t = PROFILE_COORDINATES.iter().map(|c| c.to_string()).collect::<Vec<_>>()
    )]
    pub coords: Vec<String>,

    /// Keep the first coordinate value of a profile instead of failing on conflicts
    #[arg(long = "first-seen")]
    pub first_seen: bool,
}

impl ReshapeArgs {
    pub fn accessor_config(&self) -> AccessorConfig {
        AccessorConfig {
            coordinate_policy: if self.first_seen {
                CoordinatePolicy::FirstSeen
            } else {
                CoordinatePolicy::Strict
            },
        }
    }
}

#[cfg(feature = "netcdf")]
#[derive(Debug, Clone, Parser)]
pub struct FlattenArgs {
    #[command(flatten)]
    pub float: FloatArgs,

    /// Output Parquet file
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: PathBuf,

    /// Skip QC and metadata type normalisation
    #[arg(long = "no-cast")]
    pub no_cast: bool,
}

impl Args {
    /// Log level for the crate's own targets
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => DEFAULT_LOG_LEVEL,
                1 => "debug",
                _ => "trace",
            }
        }
    }
}
