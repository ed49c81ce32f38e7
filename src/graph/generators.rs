//! Synthetic topologies for tests and benchmarks. ASNs start at 1.

use super::{Asn, TopologyGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn cycle(n: usize) -> TopologyGraph {
    let n = n as Asn;
    TopologyGraph::from_edges((1..=n).map(|i| (i, i % n + 1)))
}

pub fn path(n: usize) -> TopologyGraph {
    let n = n as Asn;
    TopologyGraph::from_edges((1..n).map(|i| (i, i + 1)))
}

pub fn complete(n: usize) -> TopologyGraph {
    let n = n as Asn;
    TopologyGraph::from_edges((1..=n).flat_map(|i| ((i + 1)..=n).map(move |j| (i, j))))
}

/// Center is ASN 1, leaves are 2..=leaves+1.
pub fn star(leaves: usize) -> TopologyGraph {
    TopologyGraph::from_edges((2..=(leaves as Asn + 1)).map(|leaf| (1, leaf)))
}

/// Preferential attachment with `m` edges per new node, seeded. Always connected.
pub fn barabasi_albert(n: usize, m: usize, seed: u64) -> TopologyGraph {
    let m = m.max(1);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges: Vec<(Asn, Asn)> = Vec::new();
    // Each endpoint appears once per incident edge
    let mut targets_pool: Vec<Asn> = Vec::new();
    let core = (m + 1).min(n);
    for i in 1..=core as Asn {
        for j in (i + 1)..=core as Asn {
            edges.push((i, j));
            targets_pool.push(i);
            targets_pool.push(j);
        }
    }
    for new in (core as Asn + 1)..=n as Asn {
        let mut chosen: Vec<Asn> = Vec::with_capacity(m);
        while chosen.len() < m {
            let t = targets_pool[rng.gen_range(0..targets_pool.len())];
            if !chosen.contains(&t) {
                chosen.push(t);
            }
        }
        for t in chosen {
            edges.push((new, t));
            targets_pool.push(new);
            targets_pool.push(t);
        }
    }
    TopologyGraph::from_edges(edges)
}
