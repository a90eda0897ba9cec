//! netCDF reader.
//!
//! Times are left as raw numbers. Float cells equal to `_FillValue` become
//! NaN; integers are widened to Int64 with their raw values, so the Argo
//! integer fill (99999) survives as the integer sentinel. `char` arrays whose
//! last dimension is a string length (`STRINGnn`, `DATE_TIME`) collapse into
//! one byte-string cell per string, other `char` arrays keep one cell per
//! character. Per-profile variables with an `axis` attribute become
//! coordinates.

#[cfg(test)]
pub mod tests;

use super::DatasetReader;
use crate::constants::DIM_N_PROF;
use crate::dataset::{AttrValue, Dataset, Variable, VariableRole};
use crate::error::Result;
use netcdf::AttributeValue;
use netcdf::types::{FloatType, IntType, NcVariableType};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

const FILL_VALUE_ATTR: &str = "_FillValue";

#[derive(Debug, Clone, Copy, Default)]
pub struct NetcdfReader;

impl DatasetReader for NetcdfReader {
    fn read(&self, path: &Path) -> Result<Dataset> {
        let file = netcdf::open(path)?;
        let mut dataset = Dataset::new();

        for dim in file.dimensions() {
            dataset.set_dim(dim.name(), dim.len())?;
        }

        for var in file.variables() {
            let name = var.name();
            let mut dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();

            let data = match var.vartype() {
                NcVariableType::Char => {
                    let width = if dims.last().is_some_and(|d| is_string_length(d)) {
                        dims.pop();
                        var.dimensions().last().map_or(1, |d| d.len())
                    } else {
                        1
                    };
                    read_chars(&var.get_raw_values(..)?, width, &name)
                }
                NcVariableType::Float(FloatType::F64) => {
                    let values = var.get_values::<f64, _>(..)?;
                    let values = replace_fill(values, fill_value(&var), f64::NAN);
                    Series::new(name.as_str().into(), values)
                }
                NcVariableType::Float(FloatType::F32) => {
                    let values = var.get_values::<f32, _>(..)?;
                    let fill = fill_value(&var).map(|f| f as f32);
                    Series::new(name.as_str().into(), replace_fill(values, fill, f32::NAN))
                }
                NcVariableType::Int(int_type) => {
                    Series::new(name.as_str().into(), read_ints(&var, int_type)?)
                }
                other => {
                    debug!("Skipping '{}' of unsupported type {:?}", name, other);
                    continue;
                }
            };

            let role = variable_role(&dims, var.attribute("axis").is_some());
            let dims: Vec<&str> = dims.iter().map(String::as_str).collect();
            dataset.insert(name, Variable::with_role(&dims, data, role))?;
        }

        for attr in file.attributes() {
            match attr.value()? {
                AttributeValue::Str(text) => dataset.set_attr(attr.name(), text),
                AttributeValue::Double(v) => dataset.set_attr(attr.name(), v),
                AttributeValue::Float(v) => dataset.set_attr(attr.name(), f64::from(v)),
                AttributeValue::Int(v) => dataset.set_attr(attr.name(), i64::from(v)),
                AttributeValue::Short(v) => dataset.set_attr(attr.name(), i64::from(v)),
                AttributeValue::Longlong(v) => dataset.set_attr(attr.name(), AttrValue::Int(v)),
                other => debug!("Skipping global attribute '{}': {:?}", attr.name(), other),
            }
        }

        debug!(
            "Read {} variables from {}",
            dataset.variable_names().len(),
            path.display()
        );
        Ok(dataset)
    }
}

fn is_string_length(dim: &str) -> bool {
    dim.starts_with("STRING") || dim == "DATE_TIME"
}

/// Only per-profile axes are coordinates; `PRES(N_PROF, N_LEVELS)` carries
/// `axis = "Z"` but varies within a profile
fn variable_role(dims: &[String], has_axis: bool) -> VariableRole {
    if has_axis && dims.len() == 1 && dims[0] == DIM_N_PROF {
        VariableRole::Coordinate
    } else {
        VariableRole::Data
    }
}

fn replace_fill<T: Copy + PartialEq>(values: Vec<T>, fill: Option<T>, nan: T) -> Vec<T> {
    match fill {
        Some(fill) => values
            .into_iter()
            .map(|v| if v == fill { nan } else { v })
            .collect(),
        None => values,
    }
}

fn fill_value(var: &netcdf::Variable<'_>) -> Option<f64> {
    match var.attribute_value(FILL_VALUE_ATTR)?.ok()? {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        _ => None,
    }
}

/// One byte-string cell per `width` characters, trailing NULs removed
fn read_chars(bytes: &[u8], width: usize, name: &str) -> Series {
    let cells: Vec<&[u8]> = bytes
        .chunks(width.max(1))
        .map(|cell| {
            let end = cell.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            &cell[..end]
        })
        .collect();
    Series::new(name.into(), cells)
}

fn read_ints(var: &netcdf::Variable<'_>, int_type: IntType) -> Result<Vec<Option<i64>>> {
    let values = match int_type {
        IntType::I8 => widen(var.get_values::<i8, _>(..)?),
        IntType::I16 => widen(var.get_values::<i16, _>(..)?),
        IntType::I32 => widen(var.get_values::<i32, _>(..)?),
        IntType::I64 => widen(var.get_values::<i64, _>(..)?),
        IntType::U8 => widen(var.get_values::<u8, _>(..)?),
        IntType::U16 => widen(var.get_values::<u16, _>(..)?),
        IntType::U32 => widen(var.get_values::<u32, _>(..)?),
        IntType::U64 => var
            .get_values::<u64, _>(..)?
            .into_iter()
            .map(|v| i64::try_from(v).ok())
            .collect(),
    };
    Ok(values)
}

fn widen<T: Into<i64>>(values: Vec<T>) -> Vec<Option<i64>> {
    values.into_iter().map(|v| Some(v.into())).collect()
}
