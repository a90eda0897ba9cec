//! Type normalisation for collections of points.
//!
//! Quality control flags arrive as one-character text (sometimes widened to
//! three characters by an embedded "nan") or as raw bytes; they end up as
//! integers. A handful of metadata variables get their canonical storage.
//! Only data variables are touched, coordinates keep their storage.
//! A cast that fails is reported and the column is left as it was.

use crate::constants::{DATA_MODE, DIRECTION, MAX_REPORTED_VALUES, PLATFORM_NUMBER, QC_MARKER};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::models::{CastFailure, CastReport};
use polars::prelude::*;
use tracing::{debug, info, warn};

pub(crate) fn cast_types(dataset: &mut Dataset) -> Result<CastReport> {
    let mut report = CastReport::default();

    for name in dataset.variable_names() {
        let variable = dataset.get(&name)?;
        if variable.is_coordinate() {
            continue;
        }
        let original = variable.data().clone();

        let normalised = if name.contains(QC_MARKER) {
            normalise_qc(&original, &mut report)?
        } else if name == PLATFORM_NUMBER && original.dtype() == &DataType::Float64 {
            cast_or_report(&original, &DataType::Int64, &mut report)
        } else if (name == DATA_MODE || name == DIRECTION) && original.dtype() == &DataType::Binary
        {
            bytes_to_text(&original)?
        } else {
            continue;
        };

        if normalised.dtype() != original.dtype() {
            debug!(
                "Cast '{}' from {} to {}",
                name,
                original.dtype(),
                normalised.dtype()
            );
            report.converted.push(name.clone());
        }
        dataset.replace_data(&name, normalised)?;
    }

    info!(
        "Normalised {} variables ({} cast failures)",
        report.converted.len(),
        report.failures.len()
    );
    Ok(report)
}

fn normalise_qc(series: &Series, report: &mut CastReport) -> Result<Series> {
    let mut series = if series.dtype() == &DataType::Binary {
        bytes_to_text(series)?
    } else {
        series.clone()
    };

    if series.dtype() == &DataType::String && text_width(&series)? == 3 {
        series = map_text(&series, |cell| match cell {
            "   " | "nan" => "0".to_string(),
            other => other.chars().take(1).collect(),
        })?;
    }

    if series.dtype() == &DataType::String && text_width(&series)? == 1 {
        series = map_text(&series, |cell| match cell {
            " " => "0".to_string(),
            other => other.to_string(),
        })?;
    }

    Ok(cast_or_report(&series, &DataType::Int64, report))
}

/// Longest cell, in characters
fn text_width(series: &Series) -> Result<usize> {
    Ok(series
        .str()?
        .into_iter()
        .flatten()
        .map(|cell| cell.chars().count())
        .max()
        .unwrap_or(0))
}

fn map_text(series: &Series, f: impl Fn(&str) -> String) -> Result<Series> {
    let mapped: StringChunked = series
        .str()?
        .into_iter()
        .map(|cell| cell.map(&f))
        .collect();
    Ok(mapped.with_name(series.name().clone()).into_series())
}

fn bytes_to_text(series: &Series) -> Result<Series> {
    let text: StringChunked = series
        .binary()?
        .into_iter()
        .map(|cell| cell.map(|bytes| String::from_utf8_lossy(bytes).into_owned()))
        .collect();
    Ok(text.with_name(series.name().clone()).into_series())
}

/// Strict cast; on failure the input is returned untouched and the failure
/// is logged and recorded
fn cast_or_report(series: &Series, to: &DataType, report: &mut CastReport) -> Series {
    match series.strict_cast(to) {
        Ok(cast) => cast,
        Err(e) => {
            let distinct_values = distinct_values(series);
            warn!(
                "Fail to cast '{}' from {} into {}: {}. Possible values: {:?}",
                series.name(),
                series.dtype(),
                to,
                e,
                distinct_values
            );
            report.failures.push(CastFailure {
                column: series.name().to_string(),
                from: series.dtype().clone(),
                to: to.clone(),
                distinct_values,
            });
            series.clone()
        }
    }
}

fn distinct_values(series: &Series) -> Vec<String> {
    let Ok(unique) = series.unique() else {
        return Vec::new();
    };
    let mut values: Vec<String> = (0..unique.len())
        .filter_map(|i| unique.get(i).ok())
        .map(|value| match value {
            AnyValue::String(s) => s.to_string(),
            other => other.to_string(),
        })
        .collect();
    values.sort();
    values.truncate(MAX_REPORTED_VALUES);
    values
}
