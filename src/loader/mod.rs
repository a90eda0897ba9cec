//! Local snapshot loader.
//!
//! Resolves a float's multi-profile file under
//! `<root>/<institute>/<wmo>/<wmo>_prof.nc` and opens it with a
//! [`DatasetReader`]. A missing file is reported as
//! [`ArgoError::FileNotFound`] carrying the path that was tried.

#[cfg(feature = "netcdf")]
pub mod netcdf;

#[cfg(test)]
pub mod tests;

use crate::config::LoaderConfig;
use crate::constants::PROFILE_FILE_SUFFIX;
use crate::dataset::Dataset;
use crate::error::{ArgoError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Opens a file into a [`Dataset`]
pub trait DatasetReader {
    fn read(&self, path: &Path) -> Result<Dataset>;
}

impl<F> DatasetReader for F
where
    F: Fn(&Path) -> Result<Dataset>,
{
    fn read(&self, path: &Path) -> Result<Dataset> {
        self(path)
    }
}

/// Institute a float belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Institute<'a> {
    /// Two-letter data assembly centre code, e.g. `IF`
    Code(&'a str),
    /// Snapshot directory name, e.g. `coriolis`
    Name(&'a str),
}

impl<'a> Institute<'a> {
    /// Two upper-case letters are read as a code, anything else as a name
    pub fn parse(value: &'a str) -> Self {
        if value.len() == 2 && value.chars().all(|c| c.is_ascii_uppercase()) {
            Institute::Code(value)
        } else {
            Institute::Name(value)
        }
    }
}

impl fmt::Display for Institute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Institute::Code(code) => write!(f, "{code}"),
            Institute::Name(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocalLoader<R> {
    config: LoaderConfig,
    reader: R,
}

impl<R: DatasetReader> LocalLoader<R> {
    pub fn new(config: LoaderConfig, reader: R) -> Self {
        Self { config, reader }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Path of a float's multi-profile file; does not touch the filesystem
    pub fn profile_path(&self, institute: Institute<'_>, wmo: u64) -> Result<PathBuf> {
        let directory = match institute {
            Institute::Code(code) => self.config.institute_dir(code).ok_or_else(|| {
                ArgoError::configuration(format!("unknown institute code '{code}'"))
            })?,
            Institute::Name(name) => name,
        };

        Ok(self
            .config
            .root
            .join(directory)
            .join(wmo.to_string())
            .join(format!("{wmo}{PROFILE_FILE_SUFFIX}")))
    }

    pub fn load(&self, institute: Institute<'_>, wmo: u64) -> Result<Dataset> {
        let path = self.profile_path(institute, wmo)?;
        self.load_nc(&path)
    }

    /// Load by data assembly centre code, e.g. `IF`
    pub fn load_from_inst_code(&self, code: &str, wmo: u64) -> Result<Dataset> {
        self.load(Institute::Code(code), wmo)
    }

    /// Load by snapshot directory name, e.g. `coriolis`
    pub fn load_from_inst(&self, name: &str, wmo: u64) -> Result<Dataset> {
        self.load(Institute::Name(name), wmo)
    }

    fn load_nc(&self, path: &Path) -> Result<Dataset> {
        if !path.is_file() {
            return Err(ArgoError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        debug!("Opening {}", path.display());
        self.reader.read(path)
    }
}

#[cfg(feature = "netcdf")]
impl LocalLoader<netcdf::NetcdfReader> {
    /// Loader reading netCDF files without decoding times
    pub fn netcdf(config: LoaderConfig) -> Self {
        Self::new(config, netcdf::NetcdfReader)
    }
}
