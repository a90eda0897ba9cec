//! Error handling for Argo dataset operations.
//!
//! Structural mismatches and missing files are the two failures callers are
//! expected to match on; the remaining variants carry underlying library
//! errors with their source attached.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArgoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    Netcdf(#[from] netcdf::Error),

    #[error("Invalid dataset structure: {reason}")]
    StructuralMismatch { reason: String },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ArgoError {
    pub fn structural(reason: impl Into<String>) -> Self {
        Self::StructuralMismatch {
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArgoError>;
