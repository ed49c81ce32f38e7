//! Shared Metric Store: per-snapshot, write-once cache of expensive
//! intermediates read by both extraction passes.
//!
//! The outcome of a computation is cached whether it succeeded or failed, so
//! a second consumer never re-runs a solver that already gave up.

use crate::algo::BfsStats;
use crate::error::{FeatureError, FeatureResult};
use crate::spectral::Spectrum;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKey {
    Betweenness,
    CoreNumber,
    DegreeSequence,
    /// One BFS summary per node, shared by distances, closeness and eccentricity
    AllSourcesBfs,
    AdjacencyEigs,
    LaplacianEigs,
    SpectrumIsPartial,
}

impl MetricKey {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::Betweenness => "betweenness",
            MetricKey::CoreNumber => "core_number",
            MetricKey::DegreeSequence => "degree_sequence",
            MetricKey::AllSourcesBfs => "all_sources_bfs",
            MetricKey::AdjacencyEigs => "adjacency_eigs",
            MetricKey::LaplacianEigs => "laplacian_eigs",
            MetricKey::SpectrumIsPartial => "spectrum_is_partial",
        }
    }
}

/// Normalized betweenness for every node, indexed like the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct BetweennessScores {
    pub values: Vec<f64>,
    /// Estimated from a pivot sample rather than all sources
    pub sampled: bool,
    pub sources: usize,
}

#[derive(Debug, Clone)]
pub enum Metric {
    Betweenness(Arc<BetweennessScores>),
    CoreNumbers(Arc<Vec<u32>>),
    Degrees(Arc<Vec<usize>>),
    Traversals(Arc<Vec<BfsStats>>),
    Spectrum(Arc<Spectrum>),
    Flag(bool),
}

#[derive(Debug, Default)]
pub struct SharedMetricStore {
    entries: HashMap<MetricKey, FeatureResult<Metric>>,
    computations: HashMap<MetricKey, usize>,
}

impl SharedMetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached outcome for `key`, running `compute` only on the first request.
    pub fn get_or_compute<F>(&mut self, key: MetricKey, compute: F) -> FeatureResult<Metric>
    where
        F: FnOnce() -> FeatureResult<Metric>,
    {
        if let Some(cached) = self.entries.get(&key) {
            debug!(metric = key.as_str(), "metric store hit");
            return cached.clone();
        }
        *self.computations.entry(key).or_insert(0) += 1;
        let outcome = compute();
        self.entries.insert(key, outcome.clone());
        outcome
    }

    pub fn contains(&self, key: MetricKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// How many times `key` was computed for this snapshot (0 or 1).
    pub fn computations(&self, key: MetricKey) -> usize {
        self.computations.get(&key).copied().unwrap_or(0)
    }

    pub fn betweenness_or_compute<F>(
        &mut self,
        compute: F,
    ) -> FeatureResult<Arc<BetweennessScores>>
    where
        F: FnOnce() -> FeatureResult<BetweennessScores>,
    {
        let metric = self.get_or_compute(MetricKey::Betweenness, || {
            compute().map(|b| Metric::Betweenness(Arc::new(b)))
        })?;
        match metric {
            Metric::Betweenness(b) => Ok(b),
            _ => Err(FeatureError::Missing("betweenness")),
        }
    }

    pub fn core_numbers_or_compute<F>(&mut self, compute: F) -> FeatureResult<Arc<Vec<u32>>>
    where
        F: FnOnce() -> FeatureResult<Vec<u32>>,
    {
        let metric = self.get_or_compute(MetricKey::CoreNumber, || {
            compute().map(|c| Metric::CoreNumbers(Arc::new(c)))
        })?;
        match metric {
            Metric::CoreNumbers(c) => Ok(c),
            _ => Err(FeatureError::Missing("core_number")),
        }
    }

    pub fn degrees_or_compute<F>(&mut self, compute: F) -> FeatureResult<Arc<Vec<usize>>>
    where
        F: FnOnce() -> FeatureResult<Vec<usize>>,
    {
        let metric = self.get_or_compute(MetricKey::DegreeSequence, || {
            compute().map(|d| Metric::Degrees(Arc::new(d)))
        })?;
        match metric {
            Metric::Degrees(d) => Ok(d),
            _ => Err(FeatureError::Missing("degree_sequence")),
        }
    }

    pub fn bfs_stats_or_compute<F>(&mut self, compute: F) -> FeatureResult<Arc<Vec<BfsStats>>>
    where
        F: FnOnce() -> FeatureResult<Vec<BfsStats>>,
    {
        let metric = self.get_or_compute(MetricKey::AllSourcesBfs, || {
            compute().map(|t| Metric::Traversals(Arc::new(t)))
        })?;
        match metric {
            Metric::Traversals(t) => Ok(t),
            _ => Err(FeatureError::Missing("all_sources_bfs")),
        }
    }

    /// `key` must be one of the two spectrum keys.
    pub fn spectrum_or_compute<F>(
        &mut self,
        key: MetricKey,
        compute: F,
    ) -> FeatureResult<Arc<Spectrum>>
    where
        F: FnOnce() -> FeatureResult<Spectrum>,
    {
        let metric =
            self.get_or_compute(key, || compute().map(|s| Metric::Spectrum(Arc::new(s))))?;
        match metric {
            Metric::Spectrum(s) => Ok(s),
            _ => Err(FeatureError::Missing("spectrum")),
        }
    }

    pub fn flag_or_compute<F>(&mut self, key: MetricKey, compute: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        matches!(
            self.get_or_compute(key, || Ok(Metric::Flag(compute()))),
            Ok(Metric::Flag(true))
        )
    }

    /// Stored betweenness, if a successful computation already ran.
    pub fn betweenness(&self) -> Option<Arc<BetweennessScores>> {
        match self.entries.get(&MetricKey::Betweenness) {
            Some(Ok(Metric::Betweenness(b))) => Some(Arc::clone(b)),
            _ => None,
        }
    }

    pub fn core_numbers(&self) -> Option<Arc<Vec<u32>>> {
        match self.entries.get(&MetricKey::CoreNumber) {
            Some(Ok(Metric::CoreNumbers(c))) => Some(Arc::clone(c)),
            _ => None,
        }
    }
}
