//! Scalar measures derived from a spectrum.

use super::{Spectrum, ZERO_EIGENVALUE_TOL};
use crate::error::{FeatureError, FeatureResult};

/// Eigenvalues equal within `1e-6` (relative above magnitude 1) count once.
pub fn distinct_eigenvalue_count(spectrum: &Spectrum) -> usize {
    let mut count = 0;
    let mut last: Option<f64> = None;
    for &v in &spectrum.values {
        match last {
            Some(prev) if (prev - v).abs() <= 1e-6 * prev.abs().max(1.0) => {}
            _ => {
                count += 1;
                last = Some(v);
            }
        }
    }
    count
}

/// Distinct adjacency eigenvalues over `diameter + 1`.
pub fn symmetry_ratio(spectrum: &Spectrum, diameter: u32) -> FeatureResult<f64> {
    if spectrum.is_empty() {
        return Err(FeatureError::Degenerate("empty spectrum".into()));
    }
    Ok(distinct_eigenvalue_count(spectrum) as f64 / (diameter as f64 + 1.0))
}

/// `ln((1/n) sum exp(lambda_i))`, with the largest eigenvalue factored out
/// before exponentiating. `n` is the true node count even when the spectrum
/// is partial.
pub fn natural_connectivity(spectrum: &Spectrum, node_count: usize) -> FeatureResult<f64> {
    let lambda_max = spectrum
        .largest()
        .ok_or_else(|| FeatureError::Degenerate("empty spectrum".into()))?;
    if node_count == 0 {
        return Err(FeatureError::Degenerate("no nodes".into()));
    }
    let tail: f64 = spectrum.values.iter().map(|l| (l - lambda_max).exp()).sum();
    Ok(lambda_max + tail.ln() - (node_count as f64).ln())
}

fn nonzero_laplacian(spectrum: &Spectrum, what: &'static str) -> FeatureResult<Vec<f64>> {
    if spectrum.partial {
        return Err(FeatureError::ScaleExcluded(what));
    }
    let zeros = spectrum
        .values
        .iter()
        .filter(|v| v.abs() <= ZERO_EIGENVALUE_TOL)
        .count();
    if zeros != 1 {
        return Err(FeatureError::Degenerate(format!(
            "expected one zero Laplacian eigenvalue, found {zeros}"
        )));
    }
    Ok(spectrum
        .values
        .iter()
        .copied()
        .filter(|v| v.abs() > ZERO_EIGENVALUE_TOL)
        .collect())
}

/// `n * sum(1 / mu_i)` over nonzero Laplacian eigenvalues. Full spectrum only.
pub fn kirchhoff_index(laplacian: &Spectrum, node_count: usize) -> FeatureResult<f64> {
    let mu = nonzero_laplacian(laplacian, "kirchhoff index needs the full Laplacian spectrum")?;
    Ok(node_count as f64 * mu.iter().map(|m| 1.0 / m).sum::<f64>())
}

/// Log of the spanning tree count via the matrix-tree theorem. Full spectrum only.
pub fn log_spanning_trees(laplacian: &Spectrum, node_count: usize) -> FeatureResult<f64> {
    let mu = nonzero_laplacian(laplacian, "spanning tree count needs the full Laplacian spectrum")?;
    Ok(mu.iter().map(|m| m.ln()).sum::<f64>() - (node_count as f64).ln())
}

fn top_two(spectrum: &Spectrum) -> FeatureResult<(f64, f64)> {
    match spectrum.values.as_slice() {
        [l1, l2, ..] => Ok((*l1, *l2)),
        _ => Err(FeatureError::Degenerate("fewer than two eigenvalues".into())),
    }
}

/// `lambda_1 - lambda_2` of the adjacency spectrum.
pub fn spectral_gap(adjacency: &Spectrum) -> FeatureResult<f64> {
    let (l1, l2) = top_two(adjacency)?;
    Ok(l1 - l2)
}

/// `lambda_1 / lambda_2` of the adjacency spectrum.
pub fn eigenvalue_ratio(adjacency: &Spectrum) -> FeatureResult<f64> {
    let (l1, l2) = top_two(adjacency)?;
    if l2.abs() <= ZERO_EIGENVALUE_TOL {
        return Err(FeatureError::Degenerate("second eigenvalue is zero".into()));
    }
    Ok(l1 / l2)
}
