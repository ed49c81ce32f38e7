//! Traversal backends. One is chosen when the engine starts and used for every
//! snapshot: the rayon backend when compiled in and more than one worker thread
//! is available, otherwise the sequential one.
//!
//! Both produce bit-identical results: the parallel backend splits sources into
//! fixed-size chunks and sums partial vectors in chunk order.

use crate::algo::clustering::triangles_at;
use crate::algo::{BfsStats, BfsWorkspace, BrandesWorkspace};
use crate::graph::TopologyGraph;

pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether whole-graph traversals are cheap enough to skip sampling.
    fn is_accelerated(&self) -> bool;

    /// Unnormalized Brandes dependency sums over `sources`.
    fn betweenness(&self, g: &TopologyGraph, sources: &[usize]) -> Vec<f64>;

    /// One BFS summary per source, in source order.
    fn bfs_stats(&self, g: &TopologyGraph, sources: &[usize]) -> Vec<BfsStats>;

    /// Triangles through every node.
    fn triangles(&self, g: &TopologyGraph) -> Vec<u64>;
}

#[derive(Debug, Default)]
pub struct StandardBackend;

impl Backend for StandardBackend {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn is_accelerated(&self) -> bool {
        false
    }

    fn betweenness(&self, g: &TopologyGraph, sources: &[usize]) -> Vec<f64> {
        brandes_chunk(g, sources)
    }

    fn bfs_stats(&self, g: &TopologyGraph, sources: &[usize]) -> Vec<BfsStats> {
        let mut ws = BfsWorkspace::new(g.node_count());
        sources.iter().map(|&s| ws.run(g, s)).collect()
    }

    fn triangles(&self, g: &TopologyGraph) -> Vec<u64> {
        (0..g.node_count()).map(|u| triangles_at(g, u)).collect()
    }
}

/// Sources per work unit; fixed so summation order never depends on scheduling.
const CHUNK: usize = 64;

fn brandes_chunk(g: &TopologyGraph, sources: &[usize]) -> Vec<f64> {
    let n = g.node_count();
    let mut out = vec![0.0; n];
    let mut ws = BrandesWorkspace::new(n);
    for chunk in sources.chunks(CHUNK) {
        let mut partial = vec![0.0; n];
        for &s in chunk {
            ws.accumulate(g, s, &mut partial);
        }
        out.iter_mut().zip(&partial).for_each(|(o, p)| *o += p);
    }
    out
}

#[cfg(feature = "parallel")]
mod parallel {
    use super::{Backend, CHUNK};
    use crate::algo::clustering::triangles_at;
    use crate::algo::{BfsStats, BfsWorkspace, BrandesWorkspace};
    use crate::graph::TopologyGraph;
    use rayon::prelude::*;

    #[derive(Debug, Default)]
    pub struct ParallelBackend;

    impl Backend for ParallelBackend {
        fn name(&self) -> &'static str {
            "rayon"
        }

        fn is_accelerated(&self) -> bool {
            true
        }

        fn betweenness(&self, g: &TopologyGraph, sources: &[usize]) -> Vec<f64> {
            let n = g.node_count();
            let partials: Vec<Vec<f64>> = sources
                .par_chunks(CHUNK)
                .map_init(
                    || BrandesWorkspace::new(n),
                    |ws, chunk| {
                        let mut partial = vec![0.0; n];
                        for &s in chunk {
                            ws.accumulate(g, s, &mut partial);
                        }
                        partial
                    },
                )
                .collect();
            let mut out = vec![0.0; n];
            for partial in partials {
                out.iter_mut().zip(&partial).for_each(|(o, p)| *o += p);
            }
            out
        }

        fn bfs_stats(&self, g: &TopologyGraph, sources: &[usize]) -> Vec<BfsStats> {
            let n = g.node_count();
            sources
                .par_iter()
                .map_init(|| BfsWorkspace::new(n), |ws, &s| ws.run(g, s))
                .collect()
        }

        fn triangles(&self, g: &TopologyGraph) -> Vec<u64> {
            (0..g.node_count())
                .into_par_iter()
                .map(|u| triangles_at(g, u))
                .collect()
        }
    }
}

#[cfg(feature = "parallel")]
pub use parallel::ParallelBackend;

/// Pick the backend once; `prefer_accelerated = false` forces the sequential one.
pub fn select(prefer_accelerated: bool) -> Box<dyn Backend> {
    #[cfg(feature = "parallel")]
    {
        if prefer_accelerated && rayon::current_num_threads() > 1 {
            return Box::new(ParallelBackend);
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = prefer_accelerated;
    Box::new(StandardBackend)
}
