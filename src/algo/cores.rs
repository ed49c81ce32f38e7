//! Core decomposition by bucket peeling (Batagelj & Zaversnik), O(m).

use crate::graph::TopologyGraph;

pub fn core_numbers(g: &TopologyGraph) -> Vec<u32> {
    let n = g.node_count();
    if n == 0 {
        return Vec::new();
    }
    let mut degree: Vec<usize> = g.degrees();
    let max_deg = degree.iter().copied().max().unwrap_or(0);

    // bin[d] = start offset of degree-d nodes in `order`
    let mut bin = vec![0usize; max_deg + 1];
    for &d in &degree {
        bin[d] += 1;
    }
    let mut start = 0;
    for b in bin.iter_mut() {
        let count = *b;
        *b = start;
        start += count;
    }
    let mut pos = vec![0usize; n];
    let mut order = vec![0usize; n];
    for u in 0..n {
        pos[u] = bin[degree[u]];
        order[pos[u]] = u;
        bin[degree[u]] += 1;
    }
    for d in (1..=max_deg).rev() {
        bin[d] = bin[d - 1];
    }
    bin[0] = 0;

    for i in 0..n {
        let u = order[i];
        for &v in g.neighbors(u) {
            if degree[v] > degree[u] {
                let dv = degree[v];
                let pv = pos[v];
                let pw = bin[dv];
                let w = order[pw];
                if v != w {
                    order.swap(pv, pw);
                    pos[v] = pw;
                    pos[w] = pv;
                }
                bin[dv] += 1;
                degree[v] -= 1;
            }
        }
    }
    degree.into_iter().map(|d| d as u32).collect()
}
