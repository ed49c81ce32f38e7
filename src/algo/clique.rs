//! Node clique numbers: size of the largest clique containing each node.
//!
//! The exact search is branch and bound with a greedy-coloring bound (MCQ)
//! run inside each node's neighborhood.

use crate::graph::TopologyGraph;

struct MaxCliqueSearch<'g> {
    g: &'g TopologyGraph,
    best: usize,
}

impl<'g> MaxCliqueSearch<'g> {
    /// Greedy coloring of `candidates`; returns them ordered by color with
    /// the color number (1-based) of each, which bounds the clique size.
    fn color_sort(&self, candidates: &[usize]) -> (Vec<usize>, Vec<usize>) {
        let mut classes: Vec<Vec<usize>> = Vec::new();
        for &v in candidates {
            let slot = classes
                .iter()
                .position(|class| class.iter().all(|&u| !self.g.has_edge(u, v)));
            match slot {
                Some(i) => classes[i].push(v),
                None => classes.push(vec![v]),
            }
        }
        let mut order = Vec::with_capacity(candidates.len());
        let mut colors = Vec::with_capacity(candidates.len());
        for (c, class) in classes.into_iter().enumerate() {
            for v in class {
                order.push(v);
                colors.push(c + 1);
            }
        }
        (order, colors)
    }

    fn expand(&mut self, size: usize, candidates: Vec<usize>) {
        let (order, colors) = self.color_sort(&candidates);
        for i in (0..order.len()).rev() {
            if size + colors[i] <= self.best {
                return;
            }
            let v = order[i];
            let next: Vec<usize> = order[..i]
                .iter()
                .copied()
                .filter(|&w| self.g.has_edge(v, w))
                .collect();
            if next.is_empty() {
                self.best = self.best.max(size + 1);
            } else {
                self.expand(size + 1, next);
            }
        }
    }
}

/// Largest clique containing `v`, searching only nodes where `allowed` is true.
pub fn exact_clique_number(
    g: &TopologyGraph,
    v: usize,
    allowed: &[bool],
    lower_bound: usize,
) -> usize {
    let candidates: Vec<usize> = g
        .neighbors(v)
        .iter()
        .copied()
        .filter(|&u| allowed[u])
        .collect();
    let mut search = MaxCliqueSearch {
        g,
        best: lower_bound.saturating_sub(1),
    };
    if !candidates.is_empty() {
        search.expand(0, candidates);
    }
    search.best + 1
}

/// Grow a clique from `v` by taking neighbors in decreasing degree order.
pub fn greedy_clique_number(g: &TopologyGraph, v: usize) -> usize {
    let mut neighbors: Vec<usize> = g.neighbors(v).to_vec();
    neighbors.sort_by_key(|&u| std::cmp::Reverse(g.degree(u)));
    let mut clique = vec![v];
    for u in neighbors {
        if clique.iter().all(|&w| w == v || g.has_edge(u, w)) {
            clique.push(u);
        }
    }
    clique.len()
}
