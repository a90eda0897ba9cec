//! Shared fixtures for loader tests

use crate::constants::DIM_N_PROF;
use crate::dataset::{Dataset, Variable};
use crate::error::Result;
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub mod loader_tests;

/// Create `<root>/<institute>/<wmo>/<wmo>_prof.nc` with placeholder bytes
pub fn create_profile_file(temp_dir: &TempDir, institute: &str, wmo: u64) -> PathBuf {
    let float_dir = temp_dir.path().join(institute).join(wmo.to_string());
    fs::create_dir_all(&float_dir).unwrap();

    let path = float_dir.join(format!("{wmo}_prof.nc"));
    fs::write(&path, b"CDF\x01").unwrap();
    path
}

/// Reader that ignores the file and returns a one-profile dataset tagged with its path
pub fn stub_reader(path: &Path) -> Result<Dataset> {
    let mut dataset = Dataset::new();
    dataset.insert(
        "CYCLE_NUMBER",
        Variable::new(&[DIM_N_PROF], Series::new("".into(), [1i64])),
    )?;
    dataset.set_attr("source", path.display().to_string());
    Ok(dataset)
}
