//! Application constants for the Argo wrangler
//!
//! Dimension and variable names from the Argo vocabulary, fill sentinels,
//! and the institute (DAC) directory table.

// =============================================================================
// Dimensions
// =============================================================================

/// Shared dimension of a collection of points
pub const DIM_INDEX: &str = "index";

/// Profile identity dimension of a collection of profiles
pub const DIM_N_PROF: &str = "N_PROF";

/// Depth ordinal dimension of a collection of profiles
pub const DIM_N_LEVELS: &str = "N_LEVELS";

// =============================================================================
// Variables
// =============================================================================

/// WMO identifier of the float
pub const PLATFORM_NUMBER: &str = "PLATFORM_NUMBER";

/// Cycle index of the float, one profile per cycle
pub const CYCLE_NUMBER: &str = "CYCLE_NUMBER";

pub const DATA_MODE: &str = "DATA_MODE";
pub const DIRECTION: &str = "DIRECTION";

/// Substring marking a quality control variable
pub const QC_MARKER: &str = "QC";

/// Coordinates carried once per profile
pub const PROFILE_COORDINATES: &[&str] = &["latitude", "longitude", "time"];

/// Attribute attached by the point to profile reshape
pub const SPARSINESS_ATTR: &str = "sparsiness";

// =============================================================================
// Profile identity
// =============================================================================

/// Multiplier applied to the platform number when encoding a profile UID.
/// Cycle numbers must stay strictly below this value.
pub const UID_FACTOR: i64 = 10_000;

// =============================================================================
// Fill sentinels
// =============================================================================

pub mod fill {
    /// Padding for text cells
    pub const TEXT: &str = " ";

    /// Padding for integer cells, matches the Argo integer `_FillValue`
    pub const INTEGER: i64 = 99_999;
}

/// Cap on the distinct values reported for a failed cast
pub const MAX_REPORTED_VALUES: usize = 20;

// =============================================================================
// Local snapshot layout
// =============================================================================

/// Suffix of the multi-profile file of a float
pub const PROFILE_FILE_SUFFIX: &str = "_prof.nc";

/// Directory used under the user data dir when no root is given
pub const DEFAULT_ROOT_DIR_NAME: &str = "argo";

/// Two-letter data assembly centre codes and their snapshot directory names
pub const INSTITUTES: &[(&str, &str)] = &[
    ("KM", "kma"),
    ("IF", "coriolis"),
    ("AO", "aoml"),
    ("CS", "csiro"),
    ("KO", "kordi"),
    ("JA", "jma"),
    ("HZ", "csio"),
    ("IN", "incois"),
    ("NM", "nmdis"),
    ("ME", "meds"),
    ("BO", "bodc"),
];

/// Default logging level for the binary
pub const DEFAULT_LOG_LEVEL: &str = "info";
