//! Edge and node connectivity.
//!
//! Structural shortcuts come first (minimum degree one, bridges, articulation
//! points, complete graphs). Otherwise unit-capacity max-flow runs from the
//! minimum-degree node, each flow cut off at the best value found so far.

use crate::graph::TopologyGraph;
use std::collections::VecDeque;

/// Residual network with paired forward/backward arcs.
struct FlowNetwork {
    head: Vec<Vec<usize>>,
    to: Vec<usize>,
    cap: Vec<u32>,
    initial: Vec<u32>,
}

impl FlowNetwork {
    fn new(nodes: usize) -> Self {
        Self {
            head: vec![Vec::new(); nodes],
            to: Vec::new(),
            cap: Vec::new(),
            initial: Vec::new(),
        }
    }

    /// Arc `u -> v` with capacity `c` and its reverse with capacity `rc`.
    fn add_arc(&mut self, u: usize, v: usize, c: u32, rc: u32) {
        self.head[u].push(self.to.len());
        self.to.push(v);
        self.initial.push(c);
        self.head[v].push(self.to.len());
        self.to.push(u);
        self.initial.push(rc);
    }

    /// Augment along shortest paths until `cutoff` units flow or none remain.
    fn max_flow(&mut self, s: usize, t: usize, cutoff: usize) -> usize {
        self.cap.clone_from(&self.initial);
        let n = self.head.len();
        let mut flow = 0;
        let mut parent_arc = vec![usize::MAX; n];
        let mut queue = VecDeque::new();
        while flow < cutoff {
            parent_arc.iter_mut().for_each(|p| *p = usize::MAX);
            queue.clear();
            queue.push_back(s);
            let mut found = false;
            'bfs: while let Some(u) = queue.pop_front() {
                for &arc in &self.head[u] {
                    let v = self.to[arc];
                    if self.cap[arc] > 0 && v != s && parent_arc[v] == usize::MAX {
                        parent_arc[v] = arc;
                        if v == t {
                            found = true;
                            break 'bfs;
                        }
                        queue.push_back(v);
                    }
                }
            }
            if !found {
                break;
            }
            let mut v = t;
            while v != s {
                let arc = parent_arc[v];
                self.cap[arc] -= 1;
                self.cap[arc ^ 1] += 1;
                v = self.to[arc ^ 1];
            }
            flow += 1;
        }
        flow
    }
}

/// Bridge and articulation-point presence from one iterative lowlink DFS.
fn cut_structure(g: &TopologyGraph) -> (bool, bool) {
    let n = g.node_count();
    let mut disc = vec![usize::MAX; n];
    let mut low = vec![0usize; n];
    let mut has_bridge = false;
    let mut has_articulation = false;
    let mut timer = 0;

    for root in 0..n {
        if disc[root] != usize::MAX {
            continue;
        }
        disc[root] = timer;
        low[root] = timer;
        timer += 1;
        let mut root_children = 0;
        // (node, parent, next neighbor position)
        let mut stack: Vec<(usize, usize, usize)> = vec![(root, usize::MAX, 0)];
        while let Some(top) = stack.len().checked_sub(1) {
            let (u, parent, next) = stack[top];
            if let Some(&v) = g.neighbors(u).get(next) {
                stack[top].2 += 1;
                if v == parent {
                    continue;
                }
                if disc[v] == usize::MAX {
                    disc[v] = timer;
                    low[v] = timer;
                    timer += 1;
                    if u == root {
                        root_children += 1;
                    }
                    stack.push((v, u, 0));
                } else {
                    low[u] = low[u].min(disc[v]);
                }
            } else {
                stack.pop();
                if parent != usize::MAX {
                    low[parent] = low[parent].min(low[u]);
                    if low[u] > disc[parent] {
                        has_bridge = true;
                    }
                    if parent != root && low[u] >= disc[parent] {
                        has_articulation = true;
                    }
                }
            }
        }
        if root_children > 1 {
            has_articulation = true;
        }
    }
    (has_bridge, has_articulation)
}

fn is_complete(g: &TopologyGraph) -> bool {
    let n = g.node_count();
    n > 0 && g.edge_count() == n * (n - 1) / 2
}

/// Minimum number of edges whose removal disconnects the graph.
pub fn edge_connectivity(g: &TopologyGraph) -> usize {
    let n = g.node_count();
    if n <= 1 || !g.is_connected() {
        return 0;
    }
    let min_degree = g.min_degree();
    if min_degree == 1 || is_complete(g) {
        return min_degree;
    }
    let (has_bridge, _) = cut_structure(g);
    if has_bridge {
        return 1;
    }

    let mut net = FlowNetwork::new(n);
    for (u, v) in g.edges() {
        net.add_arc(u, v, 1, 1);
    }
    let Some(s) = g.min_degree_node() else {
        return 0;
    };
    let mut best = min_degree;
    for t in (0..n).filter(|&t| t != s) {
        best = best.min(net.max_flow(s, t, best));
        if best <= 1 {
            break;
        }
    }
    best
}

/// Local vertex connectivity between non-adjacent `x` and `y` on the split graph.
fn local_node_connectivity(net: &mut FlowNetwork, x: usize, y: usize, cutoff: usize) -> usize {
    // node u becomes u_in = 2u, u_out = 2u + 1
    net.max_flow(2 * x + 1, 2 * y, cutoff)
}

fn split_network(g: &TopologyGraph) -> FlowNetwork {
    let n = g.node_count();
    let big = n as u32;
    let mut net = FlowNetwork::new(2 * n);
    for u in 0..n {
        net.add_arc(2 * u, 2 * u + 1, 1, 0);
    }
    for (u, v) in g.edges() {
        net.add_arc(2 * u + 1, 2 * v, big, 0);
        net.add_arc(2 * v + 1, 2 * u, big, 0);
    }
    net
}

/// Minimum number of nodes whose removal disconnects the graph
/// (`n - 1` for complete graphs).
pub fn node_connectivity(g: &TopologyGraph) -> usize {
    let n = g.node_count();
    if n <= 1 || !g.is_connected() {
        return 0;
    }
    if is_complete(g) {
        return n - 1;
    }
    let min_degree = g.min_degree();
    if min_degree == 1 {
        return 1;
    }
    let (_, has_articulation) = cut_structure(g);
    if has_articulation {
        return 1;
    }

    let Some(s) = g.min_degree_node() else {
        return 0;
    };
    let mut net = split_network(g);
    let mut best = min_degree;
    for t in (0..n).filter(|&t| t != s && !g.has_edge(s, t)) {
        best = best.min(local_node_connectivity(&mut net, s, t, best));
        if best <= 1 {
            return best;
        }
    }
    let ns = g.neighbors(s);
    for (i, &x) in ns.iter().enumerate() {
        for &y in &ns[i + 1..] {
            if !g.has_edge(x, y) {
                best = best.min(local_node_connectivity(&mut net, x, y, best));
                if best <= 1 {
                    return best;
                }
            }
        }
    }
    best
}
