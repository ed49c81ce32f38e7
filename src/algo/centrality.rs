//! Centrality kernels: Brandes accumulation, power-iteration centralities and
//! the cheap per-node measures.

use super::traversal::BfsStats;
use crate::error::{FeatureError, FeatureResult};
use crate::graph::TopologyGraph;
use std::collections::VecDeque;

/// Buffers for one Brandes single-source pass.
pub struct BrandesWorkspace {
    sigma: Vec<f64>,
    dist: Vec<i64>,
    delta: Vec<f64>,
    order: Vec<usize>,
    queue: VecDeque<usize>,
}

impl BrandesWorkspace {
    pub fn new(n: usize) -> Self {
        Self {
            sigma: vec![0.0; n],
            dist: vec![-1; n],
            delta: vec![0.0; n],
            order: Vec::with_capacity(n),
            queue: VecDeque::with_capacity(n),
        }
    }

    /// Add the dependencies of `source` on every other node into `out`.
    pub fn accumulate(&mut self, g: &TopologyGraph, source: usize, out: &mut [f64]) {
        for &u in &self.order {
            self.sigma[u] = 0.0;
            self.dist[u] = -1;
            self.delta[u] = 0.0;
        }
        self.order.clear();
        self.queue.clear();

        self.sigma[source] = 1.0;
        self.dist[source] = 0;
        self.queue.push_back(source);
        while let Some(u) = self.queue.pop_front() {
            self.order.push(u);
            let du = self.dist[u];
            for &w in g.neighbors(u) {
                if self.dist[w] < 0 {
                    self.dist[w] = du + 1;
                    self.queue.push_back(w);
                }
                if self.dist[w] == du + 1 {
                    self.sigma[w] += self.sigma[u];
                }
            }
        }

        for &w in self.order.iter().rev() {
            let coeff = (1.0 + self.delta[w]) / self.sigma[w];
            for &v in g.neighbors(w) {
                if self.dist[v] == self.dist[w] - 1 {
                    self.delta[v] += self.sigma[v] * coeff;
                }
            }
            if w != source {
                out[w] += self.delta[w];
            }
        }
    }
}

/// Normalization for undirected betweenness from `sources` of `n` pivots,
/// so a node on every shortest path scores 1.
pub fn betweenness_scale(n: usize, sources: usize) -> f64 {
    if n <= 2 || sources == 0 {
        return 0.0;
    }
    let pairs = ((n - 1) * (n - 2)) as f64;
    (n as f64 / sources as f64) / pairs
}

/// Closeness scaled by the fraction of nodes reached.
pub fn closeness(stats: &BfsStats, n: usize) -> f64 {
    if stats.distance_sum == 0 || n <= 1 {
        return 0.0;
    }
    let r = (stats.reached - 1) as f64;
    (r / stats.distance_sum as f64) * (r / (n - 1) as f64)
}

pub fn degree_centrality(g: &TopologyGraph) -> Vec<f64> {
    let n = g.node_count();
    if n <= 1 {
        return vec![1.0; n];
    }
    let denom = (n - 1) as f64;
    (0..n).map(|u| g.degree(u) as f64 / denom).collect()
}

pub fn average_neighbor_degree(g: &TopologyGraph) -> Vec<f64> {
    (0..g.node_count())
        .map(|u| {
            let ns = g.neighbors(u);
            if ns.is_empty() {
                0.0
            } else {
                ns.iter().map(|&v| g.degree(v) as f64).sum::<f64>() / ns.len() as f64
            }
        })
        .collect()
}

/// Power iteration on `A + I`, L2-normalized; converged when the L1 change
/// drops below `n * tol`.
pub fn eigenvector_centrality(
    g: &TopologyGraph,
    max_iter: usize,
    tol: f64,
) -> FeatureResult<Vec<f64>> {
    let n = g.node_count();
    if n == 0 {
        return Ok(Vec::new());
    }
    let mut x = vec![1.0 / n as f64; n];
    for _ in 0..max_iter {
        let mut next = x.clone();
        for u in 0..n {
            for &v in g.neighbors(u) {
                next[v] += x[u];
            }
        }
        let norm = next.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Err(FeatureError::Degenerate("zero eigenvector iterate".into()));
        }
        next.iter_mut().for_each(|v| *v /= norm);
        let change: f64 = next.iter().zip(&x).map(|(a, b)| (a - b).abs()).sum();
        x = next;
        if change < n as f64 * tol {
            return Ok(x);
        }
    }
    Err(FeatureError::NonConvergence {
        what: "eigenvector centrality",
        iterations: max_iter,
    })
}

/// Unweighted PageRank with uniform teleport; dangling mass is spread uniformly.
pub fn pagerank(
    g: &TopologyGraph,
    alpha: f64,
    max_iter: usize,
    tol: f64,
) -> FeatureResult<Vec<f64>> {
    let n = g.node_count();
    if n == 0 {
        return Ok(Vec::new());
    }
    let uniform = 1.0 / n as f64;
    let mut x = vec![uniform; n];
    for _ in 0..max_iter {
        let dangling: f64 = (0..n).filter(|&u| g.degree(u) == 0).map(|u| x[u]).sum();
        let base = (1.0 - alpha) * uniform + alpha * dangling * uniform;
        let mut next = vec![base; n];
        for u in 0..n {
            let d = g.degree(u);
            if d == 0 {
                continue;
            }
            let share = alpha * x[u] / d as f64;
            for &v in g.neighbors(u) {
                next[v] += share;
            }
        }
        let change: f64 = next.iter().zip(&x).map(|(a, b)| (a - b).abs()).sum();
        x = next;
        if change < n as f64 * tol {
            return Ok(x);
        }
    }
    Err(FeatureError::NonConvergence {
        what: "pagerank",
        iterations: max_iter,
    })
}
