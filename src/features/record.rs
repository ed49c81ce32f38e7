//! Output records with a fixed schema: every key is present for every snapshot.

use super::value::{FeatureValue, UnavailableReason};
use crate::graph::{Asn, ScaleClass};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub const GRAPH_FEATURE_KEYS: &[&str] = &[
    "num_nodes",
    "num_edges",
    "full_num_nodes",
    "full_num_edges",
    "assortativity",
    "density",
    "clustering_global",
    "clustering_avg",
    "diameter",
    "avg_path_length",
    "algebraic_connectivity",
    "spectral_radius",
    "percolation_limit",
    "symmetry_ratio",
    "natural_connectivity",
    "kirchhoff_index",
    "log_spanning_trees",
    "edge_connectivity",
    "node_connectivity",
    "rich_club_p50",
    "rich_club_p75",
    "rich_club_p90",
    "rich_club_p95",
    "rich_club_p99",
    "betweenness_mean",
    "betweenness_std",
    "betweenness_max",
    "betweenness_skewness",
    "degeneracy",
    "kcore_innermost_size",
    "core_number_mean",
    "spectral_gap",
    "eigenvalue_ratio",
    "radius",
    "clique_number",
];

pub const GRAPH_FLAG_KEYS: &[&str] = &[
    "diameter_approximate",
    "avg_path_length_sampled",
    "symmetry_ratio_partial",
    "natural_connectivity_partial",
    "betweenness_sampled",
    "clique_number_approximate",
    "radius_approximate",
];

/// Graph-level record for one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct GraphFeatureRecord {
    pub snapshot: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub scale_class: ScaleClass,
    pub backend: &'static str,
    #[serde(flatten)]
    pub features: BTreeMap<String, FeatureValue>,
    #[serde(flatten)]
    pub flags: BTreeMap<String, bool>,
    /// Reason for every unavailable feature
    pub unavailable: BTreeMap<String, UnavailableReason>,
}

impl GraphFeatureRecord {
    pub fn new(
        snapshot: impl Into<String>,
        timestamp: Option<DateTime<Utc>>,
        scale_class: ScaleClass,
        backend: &'static str,
    ) -> Self {
        Self {
            snapshot: snapshot.into(),
            timestamp,
            scale_class,
            backend,
            features: BTreeMap::new(),
            flags: BTreeMap::new(),
            unavailable: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: impl Into<FeatureValue>) {
        self.features.insert(key.to_string(), value.into());
    }

    pub fn set_flag(&mut self, key: &str, value: bool) {
        self.flags.insert(key.to_string(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.features.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.features.get(key)
    }

    /// Numeric value of `key`, `None` when missing or unavailable.
    pub fn value(&self, key: &str) -> Option<f64> {
        self.features.get(key).and_then(FeatureValue::as_f64)
    }

    pub fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    /// Mark every key not yet written as unavailable with `reason`.
    pub fn fill_missing(&mut self, keys: &[&str], reason: &UnavailableReason) {
        for key in keys {
            if !self.contains(key) {
                self.set(key, FeatureValue::Unavailable(reason.clone()));
            }
        }
    }

    /// Complete the schema and collect unavailable reasons.
    pub fn finalize(&mut self) {
        self.fill_missing(GRAPH_FEATURE_KEYS, &UnavailableReason::NotComputed);
        for key in GRAPH_FLAG_KEYS {
            self.flags.entry(key.to_string()).or_insert(false);
        }
        self.unavailable = self
            .features
            .iter()
            .filter_map(|(k, v)| v.reason().map(|r| (k.clone(), r.clone())))
            .collect();
    }
}

/// The ten per-node features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeFeatures {
    pub degree_centrality: FeatureValue,
    pub betweenness_centrality: FeatureValue,
    pub closeness_centrality: FeatureValue,
    pub eigenvector_centrality: FeatureValue,
    pub pagerank: FeatureValue,
    pub clustering: FeatureValue,
    pub avg_neighbor_degree: FeatureValue,
    pub core_number: FeatureValue,
    pub clique_number: FeatureValue,
    pub eccentricity: FeatureValue,
}

pub const NODE_FEATURE_KEYS: &[&str] = &[
    "degree_centrality",
    "betweenness_centrality",
    "closeness_centrality",
    "eigenvector_centrality",
    "pagerank",
    "clustering",
    "avg_neighbor_degree",
    "core_number",
    "clique_number",
    "eccentricity",
];

/// Node-level table keyed by ASN, covering exactly the snapshot's node set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeFeatureTable {
    pub snapshot: String,
    pub nodes: BTreeMap<Asn, NodeFeatures>,
}

impl NodeFeatureTable {
    pub fn get(&self, asn: Asn) -> Option<&NodeFeatures> {
        self.nodes.get(&asn)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Graph-level values that fall out of the node-level pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraGraphFeatures {
    pub radius: FeatureValue,
    pub radius_approximate: bool,
    pub clique_number: FeatureValue,
    pub clique_number_approximate: bool,
}

impl ExtraGraphFeatures {
    pub fn unavailable(reason: UnavailableReason) -> Self {
        Self {
            radius: FeatureValue::Unavailable(reason.clone()),
            radius_approximate: false,
            clique_number: FeatureValue::Unavailable(reason),
            clique_number_approximate: false,
        }
    }

    pub fn merge_into(self, record: &mut GraphFeatureRecord) {
        record.set("radius", self.radius);
        record.set_flag("radius_approximate", self.radius_approximate);
        record.set("clique_number", self.clique_number);
        record.set_flag("clique_number_approximate", self.clique_number_approximate);
    }
}
