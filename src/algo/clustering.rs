//! Triangle counting and clustering coefficients.

use crate::graph::TopologyGraph;

/// Size of the intersection of two sorted slices.
fn common_count(a: &[usize], b: &[usize]) -> u64 {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}

/// Triangles through `u`.
pub fn triangles_at(g: &TopologyGraph, u: usize) -> u64 {
    let ns = g.neighbors(u);
    let twice: u64 = ns.iter().map(|&v| common_count(ns, g.neighbors(v))).sum();
    twice / 2
}

/// Local clustering from a degree and a triangle count.
pub fn local_clustering(degree: usize, triangles: u64) -> f64 {
    if degree < 2 {
        return 0.0;
    }
    2.0 * triangles as f64 / (degree * (degree - 1)) as f64
}

/// Global clustering (transitivity): closed triads over all connected triads.
pub fn transitivity(g: &TopologyGraph, triangles: &[u64]) -> f64 {
    let triads: u64 = (0..g.node_count())
        .map(|u| {
            let d = g.degree(u) as u64;
            d * d.saturating_sub(1) / 2
        })
        .sum();
    if triads == 0 {
        return 0.0;
    }
    triangles.iter().sum::<u64>() as f64 / triads as f64
}
