//! Table input and output.
//!
//! Point tables are read from Parquet or CSV; results are written as Parquet
//! with statistics so downstream readers can prune row groups.

use crate::error::{ArgoError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Read a flat table, choosing the format from the file extension
pub fn read_table(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(ArgoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let frame = match extension.as_deref() {
        Some("parquet") | Some("pq") => {
            LazyFrame::scan_parquet(path, ScanArgsParquet::default())?.collect()?
        }
        Some("csv") => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_try_parse_dates(true)
            .finish()?
            .collect()?,
        _ => {
            return Err(ArgoError::configuration(format!(
                "unsupported table format for {} (expected .parquet or .csv)",
                path.display()
            )));
        }
    };

    debug!(
        "Read {} rows x {} columns from {}",
        frame.height(),
        frame.width(),
        path.display()
    );
    Ok(frame)
}

/// Write a frame as a Snappy-compressed Parquet file, returning the row count
pub fn write_parquet(frame: &mut DataFrame, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Snappy)
        .with_statistics(StatisticsOptions::full())
        .finish(frame)?;

    debug!("Wrote {} rows to {}", frame.height(), path.display());
    Ok(frame.height())
}
