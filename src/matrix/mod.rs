//! Sparse adjacency and Laplacian matrices, built once per snapshot and shared
//! read-only by every spectral computation.

use crate::graph::TopologyGraph;
use nalgebra::DMatrix;
use sprs::{CsMat, TriMat};

/// `A` and `L = D - A` over the unweighted structure of the graph.
pub struct MatrixCache {
    adjacency: CsMat<f64>,
    laplacian: CsMat<f64>,
}

impl MatrixCache {
    /// `None` for an empty graph; callers short-circuit to unavailable values.
    pub fn build(graph: &TopologyGraph) -> Option<Self> {
        let n = graph.node_count();
        if n == 0 {
            return None;
        }
        let nnz = 2 * graph.edge_count();
        let mut a = TriMat::with_capacity((n, n), nnz);
        let mut l = TriMat::with_capacity((n, n), nnz + n);
        for u in 0..n {
            l.add_triplet(u, u, graph.degree(u) as f64);
            for &v in graph.neighbors(u) {
                a.add_triplet(u, v, 1.0);
                l.add_triplet(u, v, -1.0);
            }
        }
        tracing::debug!(n, nnz, "matrix cache built");
        Some(Self {
            adjacency: a.to_csr(),
            laplacian: l.to_csr(),
        })
    }

    pub fn adjacency(&self) -> &CsMat<f64> {
        &self.adjacency
    }

    pub fn laplacian(&self) -> &CsMat<f64> {
        &self.laplacian
    }

    pub fn dim(&self) -> usize {
        self.adjacency.rows()
    }
}

/// Dense copy for full decomposition of small graphs.
pub fn to_dense(m: &CsMat<f64>) -> DMatrix<f64> {
    let mut d = DMatrix::zeros(m.rows(), m.cols());
    for (i, row) in m.outer_iterator().enumerate() {
        for (j, &v) in row.iter() {
            d[(i, j)] = v;
        }
    }
    d
}
