//! Extraction orchestrator: snapshot → graph-level pass → node-level pass → records.

use super::context::ExtractionContext;
use super::graph_level::extract_graph_features;
use super::node_level::extract_node_features;
use super::record::{
    ExtraGraphFeatures, GraphFeatureRecord, NodeFeatureTable, GRAPH_FEATURE_KEYS,
};
use super::store::SharedMetricStore;
use super::value::UnavailableReason;
use crate::backend::{self, Backend};
use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::graph::{ScaleClass, Snapshot};
use crate::matrix::MatrixCache;
use crate::spectral::SpectralSolver;
use std::time::Instant;
use tracing::info;

/// Both output records for one snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotFeatures {
    pub graph: GraphFeatureRecord,
    pub nodes: NodeFeatureTable,
}

/// Holds configuration and the backend chosen at construction. Carries no
/// per-snapshot state, so one extractor serves a whole series.
pub struct FeatureExtractor {
    config: ExtractionConfig,
    backend: Box<dyn Backend>,
}

impl FeatureExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        let backend = backend::select(config.accelerated_backend);
        info!(backend = backend.name(), "feature backend selected");
        Self { config, backend }
    }

    pub fn with_backend(config: ExtractionConfig, backend: Box<dyn Backend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Extract both records with a fresh metric store.
    pub fn extract(&self, snapshot: &Snapshot) -> Result<SnapshotFeatures, ExtractError> {
        let mut store = SharedMetricStore::new();
        self.extract_with_store(snapshot, &mut store)
    }

    /// Extract both records, caching intermediates in `store`. The graph-level
    /// pass always finishes before the node-level pass reads the store.
    pub fn extract_with_store(
        &self,
        snapshot: &Snapshot,
        store: &mut SharedMetricStore,
    ) -> Result<SnapshotFeatures, ExtractError> {
        let started = Instant::now();
        let g = &snapshot.graph;
        let n = g.node_count();
        let scale = ScaleClass::classify(n, self.config.scale_threshold_nodes);

        let mut record = GraphFeatureRecord::new(
            snapshot.label.clone(),
            snapshot.timestamp,
            scale,
            self.backend.name(),
        );
        record.set("num_nodes", n);
        record.set("num_edges", g.edge_count());
        record.set("full_num_nodes", snapshot.full_nodes);
        record.set("full_num_edges", snapshot.full_edges);

        let components = g.connected_components().len();
        if components > 1 {
            return Err(ExtractError::Disconnected { components });
        }

        let Some(matrices) = MatrixCache::build(g) else {
            info!(snapshot = %snapshot.label, "empty graph, every feature unavailable");
            record.fill_missing(GRAPH_FEATURE_KEYS, &UnavailableReason::EmptyGraph);
            record.finalize();
            return Ok(SnapshotFeatures {
                graph: record,
                nodes: NodeFeatureTable {
                    snapshot: snapshot.label.clone(),
                    ..NodeFeatureTable::default()
                },
            });
        };

        info!(
            snapshot = %snapshot.label,
            nodes = n,
            edges = g.edge_count(),
            scale = scale.as_str(),
            "extracting snapshot"
        );

        let ctx = ExtractionContext {
            graph: g,
            scale,
            config: &self.config,
            backend: self.backend.as_ref(),
            spectral: self
                .config
                .compute_spectral
                .then(|| SpectralSolver::new(&matrices, scale, &self.config)),
        };

        extract_graph_features(&ctx, store, &mut record);
        let graph_ms = started.elapsed().as_millis() as u64;

        let nodes = if self.config.node_features {
            let (table, extras) = extract_node_features(&ctx, store, &snapshot.label);
            extras.merge_into(&mut record);
            table
        } else {
            ExtraGraphFeatures::unavailable(UnavailableReason::Disabled(
                "node features switched off".into(),
            ))
            .merge_into(&mut record);
            NodeFeatureTable {
                snapshot: snapshot.label.clone(),
                ..NodeFeatureTable::default()
            }
        };
        record.finalize();

        info!(
            snapshot = %snapshot.label,
            graph_ms,
            total_ms = started.elapsed().as_millis() as u64,
            unavailable = record.unavailable.len(),
            "snapshot extracted"
        );
        Ok(SnapshotFeatures {
            graph: record,
            nodes,
        })
    }
}
