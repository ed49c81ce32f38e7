//! Degree-based structural measures.

use crate::error::{FeatureError, FeatureResult};
use crate::graph::TopologyGraph;

pub fn density(g: &TopologyGraph) -> f64 {
    let n = g.node_count();
    if n <= 1 {
        return 0.0;
    }
    2.0 * g.edge_count() as f64 / (n * (n - 1)) as f64
}

/// Pearson correlation of degrees across edge endpoints, each edge counted
/// in both directions.
pub fn degree_assortativity(g: &TopologyGraph) -> FeatureResult<f64> {
    let (mut sx, mut sxx, mut sxy, mut count) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for (u, v) in g.edges() {
        let (du, dv) = (g.degree(u) as f64, g.degree(v) as f64);
        sx += du + dv;
        sxx += du * du + dv * dv;
        sxy += 2.0 * du * dv;
        count += 2.0;
    }
    if count == 0.0 {
        return Err(FeatureError::Degenerate("no edges".into()));
    }
    let mean = sx / count;
    let var = sxx / count - mean * mean;
    if var.abs() < 1e-12 {
        return Err(FeatureError::Degenerate(
            "all edge endpoints share one degree".into(),
        ));
    }
    Ok((sxy / count - mean * mean) / var)
}

/// Degree at the nearest-rank `pct` percentile.
pub fn percentile_degree(sorted_degrees: &[usize], pct: u32) -> usize {
    if sorted_degrees.is_empty() {
        return 0;
    }
    let n = sorted_degrees.len();
    let rank = ((pct.min(100) as f64 / 100.0) * n as f64).ceil() as usize;
    sorted_degrees[rank.clamp(1, n) - 1]
}

/// Unnormalized rich-club coefficient at degree threshold `k`: density of the
/// subgraph on nodes with degree above `k`. Thresholds leaving fewer than two
/// such nodes are unavailable, so `k` snaps down to the nearest one that is.
///
/// `degrees` is indexed by node and `sorted_degrees` is the same sequence in
/// ascending order. Returns the threshold actually used with the coefficient.
pub fn rich_club_coefficient(
    g: &TopologyGraph,
    degrees: &[usize],
    sorted_degrees: &[usize],
    k: usize,
) -> FeatureResult<(usize, f64)> {
    // Largest threshold with at least two nodes strictly above it
    let available = match sorted_degrees.len() {
        0 | 1 => None,
        n => sorted_degrees[n - 2].checked_sub(1),
    };
    let Some(max_k) = available else {
        return Err(FeatureError::Degenerate(
            "no degree threshold leaves two nodes".into(),
        ));
    };
    let k = k.min(max_k);
    let members = sorted_degrees.len() - sorted_degrees.partition_point(|&d| d <= k);
    let inner = g
        .edges()
        .filter(|&(u, v)| degrees[u] > k && degrees[v] > k)
        .count();
    let possible = (members * (members - 1)) as f64;
    Ok((k, 2.0 * inner as f64 / possible))
}

/// Population moments of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub mean: f64,
    pub std: f64,
    pub max: f64,
    /// `None` when the sample has no spread
    pub skewness: Option<f64>,
}

pub fn moments(values: &[f64]) -> Option<Moments> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let skewness = if std > 1e-15 {
        Some(values.iter().map(|v| ((v - mean) / std).powi(3)).sum::<f64>() / n)
    } else {
        None
    };
    Some(Moments {
        mean,
        std,
        max,
        skewness,
    })
}
