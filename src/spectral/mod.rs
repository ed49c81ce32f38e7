//! Spectral solver over the cached matrices.
//!
//! Small graphs get a full dense decomposition. Large graphs get a fixed-size
//! partial spectrum (largest magnitude) from Lanczos, tagged `partial`, and the
//! Fiedler value from shifted inverse iteration. The two retrieval modes are
//! independent: a failure in one never blocks the other.

mod lanczos;
mod measures;
mod shift_invert;

pub use measures::{
    distinct_eigenvalue_count, eigenvalue_ratio, kirchhoff_index, log_spanning_trees,
    natural_connectivity, spectral_gap, symmetry_ratio,
};

use crate::config::ExtractionConfig;
use crate::error::{FeatureError, FeatureResult};
use crate::graph::ScaleClass;
use crate::matrix::{to_dense, MatrixCache};
use nalgebra::SymmetricEigen;
use serde::Serialize;
use sprs::CsMat;

/// Laplacian eigenvalues below this are treated as zero.
pub const ZERO_EIGENVALUE_TOL: f64 = 1e-9;

/// Eigenvalues sorted in descending order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    pub values: Vec<f64>,
    /// Only a largest-magnitude subset was retrieved
    pub partial: bool,
}

impl Spectrum {
    fn from_unsorted(mut values: Vec<f64>, partial: bool) -> Self {
        values.sort_by(|a, b| b.total_cmp(a));
        Self { values, partial }
    }

    pub fn largest(&self) -> Option<f64> {
        self.values.first().copied()
    }

    /// Largest absolute eigenvalue.
    pub fn radius(&self) -> Option<f64> {
        self.values.iter().map(|v| v.abs()).max_by(f64::total_cmp)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub struct SpectralSolver<'a> {
    matrices: &'a MatrixCache,
    scale: ScaleClass,
    partial_size: usize,
    max_iter: usize,
    tolerance: f64,
    extra_steps: usize,
    sigma: f64,
    seed: u64,
}

impl<'a> SpectralSolver<'a> {
    pub fn new(matrices: &'a MatrixCache, scale: ScaleClass, config: &ExtractionConfig) -> Self {
        Self {
            matrices,
            scale,
            partial_size: config.partial_spectrum_size.max(2),
            max_iter: config.eigen_max_iter,
            tolerance: config.eigen_tolerance,
            extra_steps: config.lanczos_extra_steps,
            sigma: config.shift_invert_sigma,
            seed: config.seed,
        }
    }

    pub fn scale(&self) -> ScaleClass {
        self.scale
    }

    /// Full spectrum of `A` for small graphs, top-`partial_size` by magnitude otherwise.
    pub fn adjacency_spectrum(&self) -> FeatureResult<Spectrum> {
        match self.scale {
            ScaleClass::Small => {
                self.full_spectrum(self.matrices.adjacency(), "adjacency eigendecomposition")
            }
            ScaleClass::Large => {
                let values = lanczos::largest_magnitude(
                    self.matrices.adjacency(),
                    self.partial_size,
                    self.partial_size + self.extra_steps,
                    self.tolerance,
                    self.seed,
                )?;
                Ok(Spectrum::from_unsorted(values, true))
            }
        }
    }

    /// Full Laplacian spectrum; only available for small graphs.
    pub fn laplacian_spectrum(&self) -> FeatureResult<Spectrum> {
        match self.scale {
            ScaleClass::Small => {
                self.full_spectrum(self.matrices.laplacian(), "laplacian eigendecomposition")
            }
            ScaleClass::Large => Err(FeatureError::ScaleExcluded(
                "full Laplacian spectrum unavailable for large graphs",
            )),
        }
    }

    /// Second-smallest Laplacian eigenvalue by shifted inverse iteration,
    /// which stays clear of the singular zero mode.
    pub fn fiedler_value(&self) -> FeatureResult<f64> {
        shift_invert::fiedler_value(
            self.matrices.laplacian(),
            self.sigma,
            self.max_iter,
            self.tolerance,
            self.seed,
        )
    }

    fn full_spectrum(&self, m: &CsMat<f64>, what: &'static str) -> FeatureResult<Spectrum> {
        let n = m.rows();
        let budget = self.max_iter.max(30 * n);
        let eigen = SymmetricEigen::try_new(to_dense(m), f64::EPSILON, budget).ok_or(
            FeatureError::NonConvergence {
                what,
                iterations: budget,
            },
        )?;
        Ok(Spectrum::from_unsorted(eigen.eigenvalues.iter().copied().collect(), false))
    }
}
