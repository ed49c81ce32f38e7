//! One time-ordered unit of work: the LCC plus bookkeeping about the full graph.

use super::TopologyGraph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Governs exact vs. approximate algorithm choice for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleClass {
    Small,
    Large,
}

impl ScaleClass {
    /// A graph with exactly `threshold` nodes is still small.
    pub fn classify(node_count: usize, threshold: usize) -> Self {
        if node_count <= threshold {
            ScaleClass::Small
        } else {
            ScaleClass::Large
        }
    }

    pub fn is_large(self) -> bool {
        self == ScaleClass::Large
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScaleClass::Small => "small",
            ScaleClass::Large => "large",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub label: String,
    pub timestamp: Option<DateTime<Utc>>,
    /// Largest connected component
    pub graph: TopologyGraph,
    pub full_nodes: usize,
    pub full_edges: usize,
}

impl Snapshot {
    /// Reduce `full` to its largest connected component, keeping the full sizes.
    pub fn from_full_graph(
        label: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
        full: TopologyGraph,
    ) -> Self {
        let full_nodes = full.node_count();
        let full_edges = full.edge_count();
        let graph = full.largest_component();
        Self {
            label: label.into(),
            timestamp,
            graph,
            full_nodes,
            full_edges,
        }
    }

    /// Wrap a graph that is already the LCC.
    pub fn from_lcc(label: impl Into<String>, graph: TopologyGraph) -> Self {
        Self {
            label: label.into(),
            timestamp: None,
            full_nodes: graph.node_count(),
            full_edges: graph.edge_count(),
            graph,
        }
    }
}
