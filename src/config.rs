//! Engine configuration. Every field has a default so a partial JSON file is enough.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Algorithm selection and sampling parameters
    pub extraction: ExtractionConfig,
    /// Snapshot file parsing
    pub input: InputConfig,
    /// Where records are written
    pub output: OutputConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Graphs with at most this many nodes take the exact code paths
    pub scale_threshold_nodes: usize,
    /// Pivot count for sampled betweenness on large graphs
    pub betweenness_sample_size: usize,
    /// Compute the spectral feature groups at all
    pub compute_spectral: bool,
    /// Above this node count clique numbers use the k-core restricted search
    pub max_nodes_for_exact_clique: usize,
    /// Sources for sampled eccentricity; `None` picks 500 or 200 by graph size
    pub eccentricity_sample_size: Option<usize>,
    /// Node count at which eccentricity is sampled without an accelerated backend
    pub eccentricity_sample_threshold: usize,
    /// Eigenvalues retained for large graphs
    pub partial_spectrum_size: usize,
    /// Node count above which average path length is sampled
    pub path_length_sample_threshold: usize,
    pub path_length_sample_size: usize,
    /// Degree percentiles for rich-club coefficients
    pub rich_club_percentiles: Vec<u32>,
    /// Iteration budget for iterative eigensolvers
    pub eigen_max_iter: usize,
    pub eigen_tolerance: f64,
    /// Krylov steps beyond the requested eigenvalue count
    pub lanczos_extra_steps: usize,
    /// Shift for inverse iteration on the Laplacian
    pub shift_invert_sigma: f64,
    pub pagerank_alpha: f64,
    /// Power-iteration budget for PageRank and eigenvector centrality
    pub centrality_max_iter: usize,
    pub centrality_tolerance: f64,
    /// Seed for every sampled computation
    pub seed: u64,
    /// Use the rayon backend when compiled in
    pub accelerated_backend: bool,
    /// Run the node-level pass
    pub node_features: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// File extensions picked up when walking a directory
    pub extensions: Vec<String>,
    /// Lines referencing an ASN below this are dropped (0 and reserved values)
    pub min_asn: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Write one node table per snapshot
    pub node_tables: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            scale_threshold_nodes: 5_000,
            betweenness_sample_size: 500,
            compute_spectral: true,
            max_nodes_for_exact_clique: 5_000,
            eccentricity_sample_size: None,
            eccentricity_sample_threshold: 30_000,
            partial_spectrum_size: 50,
            path_length_sample_threshold: 20_000,
            path_length_sample_size: 500,
            rich_club_percentiles: vec![50, 75, 90, 95, 99],
            eigen_max_iter: 1_000,
            eigen_tolerance: 1e-8,
            lanczos_extra_steps: 60,
            shift_invert_sigma: 1e-3,
            pagerank_alpha: 0.85,
            centrality_max_iter: 100,
            centrality_tolerance: 1e-6,
            seed: 42,
            accelerated_backend: true,
            node_features: true,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["edges".to_string(), "txt".to_string()],
            min_asn: 1,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("features"),
            node_tables: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ExtractionConfig {
    /// Eccentricity sample size for a graph of `n` nodes.
    pub fn eccentricity_sample_for(&self, n: usize) -> usize {
        self.eccentricity_sample_size
            .unwrap_or(if n < 100_000 { 500 } else { 200 })
            .min(n)
    }
}

impl EngineConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<EngineConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }
}
