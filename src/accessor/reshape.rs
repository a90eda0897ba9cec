//! Point <-> profile reshaping.
//!
//! Points are grouped by profile UID once; every row then knows its
//! `(profile, level)` cell and each variable is scattered with a single
//! gather. Padding cells hold the fill sentinel of the variable's kind.

use crate::config::CoordinatePolicy;
use crate::constants::{
    CYCLE_NUMBER, DIM_INDEX, DIM_N_LEVELS, DIM_N_PROF, PLATFORM_NUMBER, SPARSINESS_ATTR,
};
use crate::dataset::{Dataset, Variable, VariableRole};
use crate::error::{ArgoError, Result};
use crate::models::{ElementKind, ProfileUid, sentinel_mask};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Row-to-cell assignment of a collection of points
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileGrouping {
    /// Profile UIDs in ascending order, one per `N_PROF` position
    pub uids: Vec<ProfileUid>,
    /// Profile position of every row
    pub profile: Vec<usize>,
    /// Level position of every row, dense and in row order within a profile
    pub level: Vec<usize>,
    /// Deepest profile's row count
    pub n_levels: usize,
}

impl ProfileGrouping {
    /// Group rows by UID in one pass over the identity columns
    pub fn from_identities(platforms: &[i64], cycles: &[i64]) -> Result<Self> {
        if platforms.len() != cycles.len() {
            return Err(ArgoError::structural(format!(
                "{} platform numbers for {} cycle numbers",
                platforms.len(),
                cycles.len()
            )));
        }

        let row_uids = platforms
            .iter()
            .zip(cycles)
            .enumerate()
            .map(|(row, (&platform, &cycle))| {
                ProfileUid::encode(platform, cycle).ok_or_else(|| {
                    ArgoError::structural(format!(
                        "row {row}: cannot encode a profile UID from platform {platform} and cycle {cycle}"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut sizes: BTreeMap<ProfileUid, usize> = BTreeMap::new();
        for uid in &row_uids {
            *sizes.entry(*uid).or_insert(0) += 1;
        }

        let position: BTreeMap<ProfileUid, usize> =
            sizes.keys().enumerate().map(|(i, uid)| (*uid, i)).collect();
        let n_levels = sizes.values().copied().max().unwrap_or(0);

        let mut next_level = vec![0usize; sizes.len()];
        let mut profile = Vec::with_capacity(row_uids.len());
        let mut level = Vec::with_capacity(row_uids.len());
        for uid in &row_uids {
            let p = position[uid];
            profile.push(p);
            level.push(next_level[p]);
            next_level[p] += 1;
        }

        Ok(Self {
            uids: sizes.into_keys().collect(),
            profile,
            level,
            n_levels,
        })
    }

    pub fn n_prof(&self) -> usize {
        self.uids.len()
    }

    pub fn n_rows(&self) -> usize {
        self.profile.len()
    }

    /// First row of every profile
    fn first_rows(&self) -> Vec<usize> {
        let mut first = vec![usize::MAX; self.n_prof()];
        for (row, &p) in self.profile.iter().enumerate().rev() {
            first[p] = row;
        }
        first
    }

    /// Percent of the padded grid holding real measurements
    pub fn sparsiness(&self) -> f64 {
        let cells = (self.n_prof() * self.n_levels) as f64;
        (100.0 * self.n_rows() as f64 / cells * 100.0).round() / 100.0
    }
}

pub(crate) fn point_to_profile(
    points: &Dataset,
    exclude: &[String],
    policy: CoordinatePolicy,
) -> Result<Dataset> {
    let n_rows = points.dim_len(DIM_INDEX).unwrap_or(0);
    if n_rows == 0 {
        return Err(ArgoError::structural(
            "collection of points is empty, nothing to reshape",
        ));
    }

    let platforms = identity_values(points, PLATFORM_NUMBER)?;
    let cycles = identity_values(points, CYCLE_NUMBER)?;
    let grouping = ProfileGrouping::from_identities(&platforms, &cycles)?;
    let n_prof = grouping.n_prof();
    let n_levels = grouping.n_levels;
    debug_assert!(n_prof * n_levels >= n_rows);
    debug!(
        "Reshaping {} points into {} profiles of up to {} levels",
        n_rows, n_prof, n_levels
    );

    let mut profiles = Dataset::new();
    profiles.set_dim(DIM_N_PROF, n_prof)?;
    profiles.set_dim(DIM_N_LEVELS, n_levels)?;

    let first_rows = grouping.first_rows();
    let cell_rows = cell_rows(&grouping);

    for (name, variable) in points.variables() {
        if !variable.has_dims(&[DIM_INDEX]) || exclude.iter().any(|e| e == name) {
            debug!("Not reshaping '{}' (dims {:?})", name, variable.dims());
            continue;
        }
        let data = variable.data();

        let reshaped = if name == PLATFORM_NUMBER || name == CYCLE_NUMBER {
            let decoded: Vec<i64> = grouping
                .uids
                .iter()
                .map(|uid| {
                    let (platform, cycle) = uid.decode();
                    if name == PLATFORM_NUMBER { platform } else { cycle }
                })
                .collect();
            let decoded = Series::new(name.into(), decoded).cast(data.dtype())?;
            Variable::with_role(&[DIM_N_PROF], decoded, variable.role())
        } else if variable.role() == VariableRole::Coordinate {
            check_single_valued(name, data, &grouping, &first_rows, policy)?;
            let taken = data.take(&to_idx(&first_rows)?)?;
            Variable::coordinate(&[DIM_N_PROF], taken)
        } else {
            Variable::new(&[DIM_N_PROF, DIM_N_LEVELS], scatter(data, &cell_rows)?)
        };

        profiles.insert(name, reshaped)?;
    }

    let mut attrs = points.attrs().clone();
    attrs.insert(SPARSINESS_ATTR.to_string(), grouping.sparsiness().into());
    profiles.set_attrs(attrs);

    info!(
        "Reshaped {} points into {} profiles x {} levels (sparsiness {}%)",
        n_rows,
        n_prof,
        n_levels,
        grouping.sparsiness()
    );
    Ok(profiles)
}

/// Identity column as integers; missing values cannot be grouped
fn identity_values(points: &Dataset, name: &str) -> Result<Vec<i64>> {
    let series = points.get(name)?.data().cast(&DataType::Int64)?;
    series
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                ArgoError::structural(format!("row {row}: {name} is missing or not an integer"))
            })
        })
        .collect()
}

/// Source row of every grid cell, row-major, `None` for padding
fn cell_rows(grouping: &ProfileGrouping) -> Vec<Option<usize>> {
    let mut cells = vec![None; grouping.n_prof() * grouping.n_levels];
    for (row, (&p, &l)) in grouping.profile.iter().zip(&grouping.level).enumerate() {
        cells[p * grouping.n_levels + l] = Some(row);
    }
    cells
}

/// Place every row in its cell; padding and null cells get the fill sentinel
fn scatter(data: &Series, cell_rows: &[Option<usize>]) -> Result<Series> {
    let padding_row = data.len();
    let fill = ElementKind::of(data.dtype())
        .fill_value()
        .series(data.name().clone(), data.dtype())?;

    let nulls: Vec<bool> = if data.null_count() > 0 {
        data.is_null().into_iter().map(|v| v.unwrap_or(true)).collect()
    } else {
        vec![false; data.len()]
    };

    let mut padded = data.clone();
    padded.append(&fill)?;

    let rows: Vec<usize> = cell_rows
        .iter()
        .map(|cell| match cell {
            Some(row) if !nulls[*row] => *row,
            _ => padding_row,
        })
        .collect();

    Ok(padded.take(&to_idx(&rows)?)?)
}

fn check_single_valued(
    name: &str,
    data: &Series,
    grouping: &ProfileGrouping,
    first_rows: &[usize],
    policy: CoordinatePolicy,
) -> Result<()> {
    for (row, &p) in grouping.profile.iter().enumerate() {
        let first = first_rows[p];
        if row == first {
            continue;
        }
        let (a, b) = (data.get(first)?, data.get(row)?);
        if same_value(&a, &b) {
            continue;
        }
        match policy {
            CoordinatePolicy::Strict => {
                return Err(ArgoError::structural(format!(
                    "coordinate '{name}' takes more than one value in profile {} ({a} and {b})",
                    grouping.uids[p]
                )));
            }
            CoordinatePolicy::FirstSeen => {
                warn!(
                    "Coordinate '{}' varies within profile {}, keeping {}",
                    name, grouping.uids[p], a
                );
            }
        }
    }
    Ok(())
}

fn same_value(a: &AnyValue, b: &AnyValue) -> bool {
    match (a, b) {
        (AnyValue::Null, AnyValue::Null) => true,
        (AnyValue::Float64(x), AnyValue::Float64(y)) if x.is_nan() && y.is_nan() => true,
        (AnyValue::Float32(x), AnyValue::Float32(y)) if x.is_nan() && y.is_nan() => true,
        _ => a == b,
    }
}

fn to_idx(rows: &[usize]) -> Result<IdxCa> {
    let rows = rows
        .iter()
        .map(|&row| IdxSize::try_from(row))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| ArgoError::structural("row position exceeds the index range"))?;
    Ok(IdxCa::from_vec(PlSmallStr::EMPTY, rows))
}

pub(crate) fn profile_to_point(profiles: &Dataset) -> Result<(Dataset, Vec<String>)> {
    let n_prof = profiles.dim_len(DIM_N_PROF).unwrap_or(0);
    let n_levels = profiles.dim_len(DIM_N_LEVELS).ok_or_else(|| {
        ArgoError::structural("collection of profiles has no N_LEVELS dimension")
    })?;

    let level_vars: Vec<(&str, &Variable)> = profiles
        .variables()
        .filter(|(_, v)| v.has_dims(&[DIM_N_PROF, DIM_N_LEVELS]))
        .collect();
    if level_vars.is_empty() {
        return Err(ArgoError::structural(
            "collection of profiles has no (N_PROF, N_LEVELS) variable",
        ));
    }

    let masks = level_vars
        .iter()
        .map(|(_, v)| sentinel_mask(v.data()).map_err(ArgoError::from))
        .collect::<Result<Vec<Vec<bool>>>>()?;

    let cells: Vec<usize> = (0..n_prof * n_levels)
        .filter(|&cell| masks.iter().any(|mask| !mask[cell]))
        .collect();
    debug!(
        "Keeping {} of {} cells with at least one measurement",
        cells.len(),
        n_prof * n_levels
    );

    let mut points = Dataset::new();
    points.set_dim(DIM_INDEX, cells.len())?;

    for ((name, variable), mask) in level_vars.iter().zip(&masks) {
        let idx: IdxCa = cells
            .iter()
            .map(|&cell| (!mask[cell]).then(|| cell as IdxSize))
            .collect();
        // Per-level variables are data once flattened, whatever their role
        let values = variable.data().take(&idx)?;
        points.insert(*name, Variable::new(&[DIM_INDEX], values))?;
    }

    let profile_of_cell: Vec<usize> = cells.iter().map(|&cell| cell / n_levels).collect();
    let broadcast = to_idx(&profile_of_cell)?;
    for (name, variable) in profiles.variables() {
        if variable.has_dims(&[DIM_N_PROF]) {
            let values = variable.data().take(&broadcast)?;
            let role = variable.role();
            points.insert(name, Variable::with_role(&[DIM_INDEX], values, role))?;
        } else if !variable.has_dims(&[DIM_N_PROF, DIM_N_LEVELS]) {
            debug!("Dropping '{}' (dims {:?})", name, variable.dims());
        }
    }

    let origin_prof: Vec<i64> = profile_of_cell.iter().map(|&p| p as i64).collect();
    let origin_level: Vec<i64> = cells.iter().map(|&c| (c % n_levels) as i64).collect();
    points.insert(
        DIM_N_PROF,
        Variable::new(&[DIM_INDEX], Series::new(DIM_N_PROF.into(), origin_prof)),
    )?;
    points.insert(
        DIM_N_LEVELS,
        Variable::new(&[DIM_INDEX], Series::new(DIM_N_LEVELS.into(), origin_level)),
    )?;

    let mut attrs = profiles.attrs().clone();
    attrs.remove(SPARSINESS_ATTR);
    points.set_attrs(attrs);

    info!(
        "Flattened {} profiles into {} points",
        n_prof,
        points.dim_len(DIM_INDEX).unwrap_or(0)
    );
    Ok((
        points,
        vec![DIM_N_LEVELS.to_string(), DIM_N_PROF.to_string()],
    ))
}
