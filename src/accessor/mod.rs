//! Argo accessor over a [`Dataset`].
//!
//! ```text
//! let mut argo = ArgoAccessor::new(points)?;
//! argo.cast_types()?;                  // canonical storage for QC and metadata
//! let profiles = argo.point2profile()?; // points -> padded profiles
//! let points = argo.profile2point()?;   // and back
//! ```
//!
//! The layout is detected when the dataset is wrapped and each method checks
//! it before touching the data.

pub mod normalize;
pub mod reshape;

#[cfg(test)]
pub mod tests;

pub use reshape::ProfileGrouping;

use crate::config::AccessorConfig;
use crate::constants::{DIM_INDEX, DIM_N_PROF};
use crate::dataset::Dataset;
use crate::error::{ArgoError, Result};
use crate::models::{CastReport, Layout};
use tracing::debug;

/// Wraps one dataset and tracks its layout
#[derive(Debug, Clone)]
pub struct ArgoAccessor {
    /// The wrapped collection, replaced by each reshape
    dataset: Dataset,
    /// Points or profiles, detected on wrap and updated by each reshape
    layout: Layout,
    /// Dimension names of the wrapped collection
    dims: Vec<String>,
    /// Variables the accessor attached itself (origin cells after `profile2point`)
    added: Vec<String>,
    /// Reshaping settings
    config: AccessorConfig,
}

impl ArgoAccessor {
    pub fn new(dataset: Dataset) -> Result<Self> {
        Self::with_config(dataset, AccessorConfig::default())
    }

    pub fn with_config(dataset: Dataset, config: AccessorConfig) -> Result<Self> {
        let layout = detect_layout(&dataset)?;
        debug!("Wrapped a collection of {}s", layout);
        Ok(Self {
            dims: dataset.dims().keys().cloned().collect(),
            dataset,
            layout,
            added: Vec::new(),
            config,
        })
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_inner(self) -> Dataset {
        self.dataset
    }

    /// Dimension names of the wrapped dataset
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Variables this accessor attached to the wrapped dataset
    pub fn added(&self) -> &[String] {
        &self.added
    }

    /// Rewrite QC and metadata variables to their canonical storage.
    ///
    /// Only available to a collection of points. Cast failures do not abort
    /// the pass; they are logged and listed in the report.
    pub fn cast_types(&mut self) -> Result<CastReport> {
        self.require(Layout::Point)?;
        normalize::cast_types(&mut self.dataset)
    }

    /// Reshape the collection of points into a collection of profiles.
    ///
    /// The accessor wraps the profiles afterwards.
    pub fn point2profile(&mut self) -> Result<Dataset> {
        self.require(Layout::Point)?;
        let profiles = reshape::point_to_profile(
            &self.dataset,
            &self.added,
            self.config.coordinate_policy,
        )?;
        self.replace(profiles.clone(), Layout::Profile, Vec::new());
        Ok(profiles)
    }

    /// Flatten the collection of profiles into a collection of points,
    /// dropping padded cells.
    ///
    /// `N_PROF` and `N_LEVELS` variables record where each point came from.
    pub fn profile2point(&mut self) -> Result<Dataset> {
        self.require(Layout::Profile)?;
        let (points, added) = reshape::profile_to_point(&self.dataset)?;
        self.replace(points.clone(), Layout::Point, added);
        Ok(points)
    }

    fn require(&self, layout: Layout) -> Result<()> {
        if self.layout == layout {
            Ok(())
        } else {
            Err(ArgoError::structural(format!(
                "Method only available to a collection of {layout}s"
            )))
        }
    }

    fn replace(&mut self, dataset: Dataset, layout: Layout, added: Vec<String>) {
        self.dims = dataset.dims().keys().cloned().collect();
        self.dataset = dataset;
        self.layout = layout;
        self.added = added;
    }
}

fn detect_layout(dataset: &Dataset) -> Result<Layout> {
    if dataset.has_dim(DIM_N_PROF) {
        Ok(Layout::Profile)
    } else if dataset.has_dim(DIM_INDEX) {
        Ok(Layout::Point)
    } else {
        Err(ArgoError::structural("Argo dataset structure not recognised"))
    }
}
