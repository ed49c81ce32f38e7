//! Feature extraction: typed values, fixed-schema records, the shared metric
//! store and the two feature passes.

mod context;
mod graph_level;
mod node_level;
mod pipeline;
mod record;
mod store;
mod value;

pub use context::ExtractionContext;
pub use graph_level::extract_graph_features;
pub use node_level::extract_node_features;
pub use pipeline::{FeatureExtractor, SnapshotFeatures};
pub use record::{
    ExtraGraphFeatures, GraphFeatureRecord, NodeFeatureTable, NodeFeatures, GRAPH_FEATURE_KEYS,
    GRAPH_FLAG_KEYS, NODE_FEATURE_KEYS,
};
pub use store::{BetweennessScores, Metric, MetricKey, SharedMetricStore};
pub use value::{FeatureValue, UnavailableReason};
