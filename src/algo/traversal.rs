//! Breadth-first traversal kernels and diameter bounds.

use crate::graph::TopologyGraph;
use std::collections::VecDeque;

pub const UNREACHED: u32 = u32::MAX;

/// Summary of one BFS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BfsStats {
    pub source: usize,
    /// Sum of distances to reached nodes
    pub distance_sum: u64,
    /// Reached nodes, source included
    pub reached: usize,
    pub eccentricity: u32,
}

/// Reusable buffers so repeated traversals do not reallocate.
pub struct BfsWorkspace {
    pub dist: Vec<u32>,
    queue: VecDeque<usize>,
}

impl BfsWorkspace {
    pub fn new(n: usize) -> Self {
        Self {
            dist: vec![UNREACHED; n],
            queue: VecDeque::with_capacity(n),
        }
    }

    /// Fill `dist` from `source` and summarize.
    pub fn run(&mut self, g: &TopologyGraph, source: usize) -> BfsStats {
        self.dist.iter_mut().for_each(|d| *d = UNREACHED);
        self.queue.clear();
        self.dist[source] = 0;
        self.queue.push_back(source);
        let mut stats = BfsStats {
            source,
            ..BfsStats::default()
        };
        while let Some(u) = self.queue.pop_front() {
            let du = self.dist[u];
            stats.reached += 1;
            stats.distance_sum += du as u64;
            stats.eccentricity = stats.eccentricity.max(du);
            for &v in g.neighbors(u) {
                if self.dist[v] == UNREACHED {
                    self.dist[v] = du + 1;
                    self.queue.push_back(v);
                }
            }
        }
        stats
    }
}

/// Outcome of the eccentricity-bounding diameter search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiameterBounds {
    pub lower: u32,
    pub upper: u32,
    pub traversals: usize,
}

impl DiameterBounds {
    pub fn is_exact(&self) -> bool {
        self.lower == self.upper
    }
}

/// Diameter by eccentricity bounding (Takes & Kosters), at most `budget` BFS runs.
///
/// Each traversal from `v` tightens every node's bounds:
/// `max(ecc(v) - d(v,w), d(v,w)) <= ecc(w) <= ecc(v) + d(v,w)`.
/// When the budget runs out the bounds are returned with `lower < upper`.
pub fn bounded_diameter(g: &TopologyGraph, budget: usize) -> DiameterBounds {
    let n = g.node_count();
    if n <= 1 {
        return DiameterBounds {
            lower: 0,
            upper: 0,
            traversals: 0,
        };
    }
    let mut ecc_lo = vec![0u32; n];
    let mut ecc_hi = vec![u32::MAX; n];
    let mut active: Vec<usize> = (0..n).collect();
    let mut lower = 0u32;
    let mut upper = u32::MAX;
    let mut ws = BfsWorkspace::new(n);
    let mut traversals = 0;
    let mut pick_high = true;

    while !active.is_empty() && lower < upper && traversals < budget {
        // Alternate between the largest upper bound and the smallest lower bound,
        // degree breaking ties
        let v = if pick_high {
            *active
                .iter()
                .max_by_key(|&&u| (ecc_hi[u], g.degree(u)))
                .unwrap_or(&active[0])
        } else {
            *active
                .iter()
                .min_by_key(|&&u| (ecc_lo[u], std::cmp::Reverse(g.degree(u))))
                .unwrap_or(&active[0])
        };
        pick_high = !pick_high;

        let stats = ws.run(g, v);
        traversals += 1;
        let ecc_v = stats.eccentricity;
        lower = lower.max(ecc_v);

        for &w in &active {
            let d = ws.dist[w];
            ecc_lo[w] = ecc_lo[w].max(ecc_v.saturating_sub(d).max(d));
            ecc_hi[w] = ecc_hi[w].min(ecc_v.saturating_add(d));
            lower = lower.max(ecc_lo[w]);
        }
        // Settled nodes, and nodes that cannot exceed the lower bound, are done
        active.retain(|&w| ecc_lo[w] < ecc_hi[w] && ecc_hi[w] > lower);
        upper = active.iter().map(|&w| ecc_hi[w]).max().unwrap_or(lower).max(lower);
    }

    DiameterBounds {
        lower,
        upper: upper.max(lower),
        traversals,
    }
}
