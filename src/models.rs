//! Core data structures and types for Argo wrangling.
//!
//! Defines dataset layouts, profile identities, element kinds with their fill
//! sentinels, and the report returned by type normalisation.

use crate::constants::{UID_FACTOR, fill};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognised arrangements of an Argo collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// One row per measurement along `index`
    Point,
    /// Rectangular `N_PROF` x `N_LEVELS` grid
    Profile,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Point => write!(f, "point"),
            Layout::Profile => write!(f, "profile"),
        }
    }
}

/// Injective integer encoding of a `(platform_number, cycle_number)` pair
///
/// ```
/// use argo_wrangler::models::ProfileUid;
///
/// let uid = ProfileUid::encode(6902746, 34).unwrap();
/// assert_eq!(uid.value(), 69027460034);
/// assert_eq!(uid.decode(), (6902746, 34));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProfileUid(i64);

impl ProfileUid {
    /// Encode a float identity, `None` when the pair cannot be represented
    pub fn encode(platform_number: i64, cycle_number: i64) -> Option<Self> {
        if platform_number < 0 || !(0..UID_FACTOR).contains(&cycle_number) {
            return None;
        }
        platform_number
            .checked_mul(UID_FACTOR)
            .and_then(|base| base.checked_add(cycle_number))
            .map(Self)
    }

    /// Recover `(platform_number, cycle_number)`
    pub fn decode(self) -> (i64, i64) {
        (self.0 / UID_FACTOR, self.0 % UID_FACTOR)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProfileUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (platform, cycle) = self.decode();
        write!(f, "{platform}/{cycle:03}")
    }
}

/// Storage class of a variable, used to pick its fill sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Text,
    Integer,
    Datetime,
    Float,
    /// Raw byte strings and anything else without a natural sentinel
    Opaque,
}

impl ElementKind {
    pub fn of(dtype: &DataType) -> Self {
        match dtype {
            DataType::String => ElementKind::Text,
            DataType::Datetime(_, _) | DataType::Date => ElementKind::Datetime,
            dt if dt.is_integer() => ElementKind::Integer,
            dt if dt.is_float() => ElementKind::Float,
            _ => ElementKind::Opaque,
        }
    }

    pub fn fill_value(self) -> FillValue {
        match self {
            ElementKind::Text => FillValue::Text(fill::TEXT),
            ElementKind::Integer => FillValue::Integer(fill::INTEGER),
            ElementKind::Datetime => FillValue::NotATime,
            ElementKind::Float => FillValue::NaN,
            ElementKind::Opaque => FillValue::Missing,
        }
    }
}

/// Sentinel marking "no measurement at this level for this profile"
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillValue {
    Text(&'static str),
    Integer(i64),
    NotATime,
    NaN,
    Missing,
}

impl FillValue {
    /// Single-cell series holding the sentinel in the given storage type.
    ///
    /// Integer storage too narrow for the sentinel yields a null cell.
    pub fn series(self, name: PlSmallStr, dtype: &DataType) -> PolarsResult<Series> {
        match self {
            FillValue::Text(text) => Series::new(name, &[text]).cast(dtype),
            FillValue::Integer(value) => Series::new(name, &[value]).cast(dtype),
            FillValue::NaN => Series::new(name, &[f64::NAN]).cast(dtype),
            FillValue::NotATime | FillValue::Missing => Ok(Series::full_null(name, 1, dtype)),
        }
    }
}

/// Flag every cell that holds its kind's fill sentinel or is null.
///
/// Byte strings count a blank or empty cell as padding, like text.
pub fn sentinel_mask(series: &Series) -> PolarsResult<Vec<bool>> {
    let mask = match ElementKind::of(series.dtype()) {
        ElementKind::Text => series
            .str()?
            .into_iter()
            .map(|v| v.is_none_or(|s| s == fill::TEXT))
            .collect(),
        ElementKind::Integer => {
            let widened = series.cast(&DataType::Int64)?;
            widened
                .i64()?
                .into_iter()
                .map(|v| v.is_none_or(|x| x == fill::INTEGER))
                .collect()
        }
        ElementKind::Float => {
            let widened = series.cast(&DataType::Float64)?;
            widened
                .f64()?
                .into_iter()
                .map(|v| v.is_none_or(f64::is_nan))
                .collect()
        }
        // netCDF char cells pad with a blank, or with NULs trimmed to nothing
        ElementKind::Opaque if series.dtype() == &DataType::Binary => series
            .binary()?
            .into_iter()
            .map(|v| v.is_none_or(|b| b.is_empty() || b == fill::TEXT.as_bytes()))
            .collect(),
        ElementKind::Datetime | ElementKind::Opaque => {
            let nulls = series.is_null();
            nulls.into_iter().map(|v| v.unwrap_or(true)).collect()
        }
    };
    Ok(mask)
}

/// A conversion the normaliser gave up on
#[derive(Debug, Clone, PartialEq)]
pub struct CastFailure {
    /// Variable whose cast failed
    pub column: String,
    /// Storage type the column kept
    pub from: DataType,
    /// Storage type the cast aimed for
    pub to: DataType,
    /// Distinct source values, truncated
    pub distinct_values: Vec<String>,
}

/// Outcome of a normalisation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CastReport {
    /// Variables whose storage type changed, in name order
    pub converted: Vec<String>,
    /// Casts that failed; those variables are unchanged
    pub failures: Vec<CastFailure>,
}

impl CastReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
