//! Configuration management.
//!
//! Provides the accessor settings that govern reshaping and the loader
//! settings that describe a local Argo snapshot.

use crate::constants::{DEFAULT_ROOT_DIR_NAME, INSTITUTES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// How per-profile coordinates are collapsed when points become profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordinatePolicy {
    /// Every row of a profile must carry the same coordinate value
    #[default]
    Strict,
    /// Keep the first row's value and log the conflict
    FirstSeen,
}

/// Settings for [`crate::accessor::ArgoAccessor`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessorConfig {
    pub coordinate_policy: CoordinatePolicy,
}

/// Settings for [`crate::loader::LocalLoader`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Root directory of the snapshot (contains one directory per institute)
    pub root: PathBuf,

    /// Two-letter institute code to directory name
    pub institutes: BTreeMap<String, String>,
}

impl LoaderConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            institutes: default_institutes(),
        }
    }

    pub fn institute_dir(&self, code: &str) -> Option<&str> {
        self.institutes.get(code).map(String::as_str)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        let root = dirs::data_dir()
            .map(|dir| dir.join(DEFAULT_ROOT_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."));
        debug!("Using default snapshot root: {}", root.display());
        Self::new(root)
    }
}

/// The standard data assembly centre table
pub fn default_institutes() -> BTreeMap<String, String> {
    INSTITUTES
        .iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect()
}
