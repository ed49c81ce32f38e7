//! AS-graph features: structural feature vectors for inter-domain routing
//! topology snapshots.
//!
//! Modular structure:
//! - [`graph`]: Topology graph, snapshots, edge-list loading, generators
//! - [`matrix`]: Sparse adjacency and Laplacian cache
//! - [`spectral`]: Dense, Lanczos and shifted-inverse eigensolvers
//! - [`algo`]: Traversal, centrality, core, clique and connectivity kernels
//! - [`backend`]: Standard and rayon kernel backends
//! - [`features`]: Metric store, graph-level and node-level extraction
//! - [`logging`]: Structured logging and ndjson output

pub mod algo;
pub mod backend;
pub mod config;
pub mod error;
pub mod features;
pub mod graph;
pub mod logging;
pub mod matrix;
pub mod spectral;

pub use config::EngineConfig;
pub use error::{ExtractError, FeatureError, GraphError};
pub use features::{FeatureExtractor, FeatureValue, SnapshotFeatures};
pub use graph::{Snapshot, TopologyGraph};
pub use logging::StructuredLogger;
