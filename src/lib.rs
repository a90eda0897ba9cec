//! Argo Wrangler Library
//!
//! Reshapes Argo float measurement collections between a flat "points"
//! layout (one row per measurement along `index`) and a padded "profiles"
//! layout (`N_PROF` x `N_LEVELS`).
//!
//! This library provides tools for:
//! - Normalising QC flags and float metadata to canonical storage types
//! - Grouping points into profiles keyed by platform and cycle number
//! - Flattening profiles back into points without padded cells
//! - Locating and opening float files in a local snapshot

pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod io;
pub mod loader;
pub mod models;

pub mod accessor;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use accessor::ArgoAccessor;
pub use config::{AccessorConfig, CoordinatePolicy, LoaderConfig};
pub use dataset::{AttrValue, Dataset, Variable, VariableRole};
pub use error::{ArgoError, Result};
pub use loader::{DatasetReader, Institute, LocalLoader};
pub use models::{CastReport, Layout, ProfileUid};
