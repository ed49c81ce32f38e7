//! AS-level topology graph: undirected, simple, optionally weighted by observation count.
//!
//! Nodes are stored densely as indices `0..n` in ascending ASN order, so every
//! per-node output is deterministic for a given edge set.

mod generators;
mod loader;
mod snapshot;

pub use generators::{barabasi_albert, complete, cycle, path, star};
pub use loader::{discover_snapshot_files, load_edge_list, parse_snapshot_timestamp};
pub use snapshot::{ScaleClass, Snapshot};

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// Autonomous system number.
pub type Asn = u32;

#[derive(Debug, Clone, Default)]
pub struct TopologyGraph {
    asns: Vec<Asn>,
    index: HashMap<Asn, usize>,
    /// Sorted neighbor indices per node
    adj: Vec<Vec<usize>>,
    /// Observation counts, parallel to `adj`
    weights: Vec<Vec<u32>>,
    edge_count: usize,
}

impl TopologyGraph {
    /// Build from unweighted adjacencies; repeated pairs add to the edge weight.
    pub fn from_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (Asn, Asn)>,
    {
        Self::from_weighted_edges(edges.into_iter().map(|(a, b)| (a, b, 1)))
    }

    /// Build from `(a, b, count)` triples. Self-loops are dropped and
    /// multi-edges collapse into one edge carrying the summed count.
    pub fn from_weighted_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (Asn, Asn, u32)>,
    {
        let mut collapsed: BTreeMap<(Asn, Asn), u32> = BTreeMap::new();
        let mut isolated: Vec<Asn> = Vec::new();
        for (a, b, w) in edges {
            if a == b {
                isolated.push(a);
                continue;
            }
            let key = if a < b { (a, b) } else { (b, a) };
            *collapsed.entry(key).or_insert(0) += w;
        }

        let mut asns: Vec<Asn> = collapsed
            .keys()
            .flat_map(|&(a, b)| [a, b])
            .chain(isolated)
            .collect();
        asns.sort_unstable();
        asns.dedup();

        let index: HashMap<Asn, usize> = asns.iter().enumerate().map(|(i, &a)| (a, i)).collect();
        let mut adj = vec![Vec::new(); asns.len()];
        let mut weights = vec![Vec::new(); asns.len()];
        let mut pairs: Vec<(usize, usize, u32)> = Vec::with_capacity(collapsed.len() * 2);
        for (&(a, b), &w) in &collapsed {
            let (u, v) = (index[&a], index[&b]);
            pairs.push((u, v, w));
            pairs.push((v, u, w));
        }
        pairs.sort_unstable_by_key(|&(u, v, _)| (u, v));
        for (u, v, w) in pairs {
            adj[u].push(v);
            weights[u].push(w);
        }

        Self {
            asns,
            index,
            adj,
            weights,
            edge_count: collapsed.len(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.asns.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.asns.is_empty()
    }

    pub fn asn(&self, node: usize) -> Asn {
        self.asns[node]
    }

    pub fn asns(&self) -> &[Asn] {
        &self.asns
    }

    pub fn index_of(&self, asn: Asn) -> Option<usize> {
        self.index.get(&asn).copied()
    }

    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adj[node]
    }

    pub fn weights(&self, node: usize) -> &[u32] {
        &self.weights[node]
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adj[node].len()
    }

    pub fn degrees(&self) -> Vec<usize> {
        self.adj.iter().map(Vec::len).collect()
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adj[u].binary_search(&v).is_ok()
    }

    /// Each undirected edge once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(u, ns)| ns.iter().filter(move |&&v| u < v).map(move |&v| (u, v)))
    }

    /// Node with the smallest degree (lowest index on ties).
    pub fn min_degree_node(&self) -> Option<usize> {
        (0..self.node_count()).min_by_key(|&u| self.degree(u))
    }

    pub fn min_degree(&self) -> usize {
        self.adj.iter().map(Vec::len).min().unwrap_or(0)
    }

    pub fn max_degree(&self) -> usize {
        self.adj.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Connected components as node index lists, each sorted, largest first.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        let n = self.node_count();
        let mut seen = vec![false; n];
        let mut components = Vec::new();
        let mut queue = VecDeque::new();
        for start in 0..n {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            queue.push_back(start);
            let mut members = Vec::new();
            while let Some(u) = queue.pop_front() {
                members.push(u);
                for &v in &self.adj[u] {
                    if !seen[v] {
                        seen[v] = true;
                        queue.push_back(v);
                    }
                }
            }
            members.sort_unstable();
            components.push(members);
        }
        // Stable sort: equal-size components keep smallest-ASN-first order
        components.sort_by(|a, b| b.len().cmp(&a.len()));
        components
    }

    pub fn is_connected(&self) -> bool {
        self.connected_components().len() <= 1
    }

    /// Subgraph induced by `nodes` (indices into this graph), weights preserved.
    pub fn induced_subgraph(&self, nodes: &[usize]) -> TopologyGraph {
        let keep: HashSet<usize> = nodes.iter().copied().collect();
        let edges = nodes.iter().flat_map(|&u| {
            self.adj[u]
                .iter()
                .zip(&self.weights[u])
                .filter(|(v, _)| u < **v && keep.contains(*v))
                .map(move |(&v, &w)| (self.asns[u], self.asns[v], w))
                .collect::<Vec<_>>()
        });
        let mut sub = TopologyGraph::from_weighted_edges(edges);
        // Keep isolated members so node sets match exactly
        for &u in nodes {
            if sub.index_of(self.asns[u]).is_none() {
                sub.insert_isolated(self.asns[u]);
            }
        }
        sub
    }

    /// Largest connected component; empty graph stays empty.
    pub fn largest_component(&self) -> TopologyGraph {
        match self.connected_components().into_iter().next() {
            Some(nodes) if nodes.len() == self.node_count() => self.clone(),
            Some(nodes) => self.induced_subgraph(&nodes),
            None => TopologyGraph::default(),
        }
    }

    fn insert_isolated(&mut self, asn: Asn) {
        let pos = self.asns.partition_point(|&a| a < asn);
        self.asns.insert(pos, asn);
        self.adj.insert(pos, Vec::new());
        self.weights.insert(pos, Vec::new());
        for ns in &mut self.adj {
            for v in ns.iter_mut() {
                if *v >= pos {
                    *v += 1;
                }
            }
        }
        self.index = self.asns.iter().enumerate().map(|(i, &a)| (a, i)).collect();
    }
}
