//! Everything one snapshot's extraction reads, plus the store-backed
//! accessors both passes share.

use super::store::{BetweennessScores, MetricKey, SharedMetricStore};
use crate::algo::centrality::betweenness_scale;
use crate::algo::cores::core_numbers;
use crate::algo::BfsStats;
use crate::backend::Backend;
use crate::config::ExtractionConfig;
use crate::error::{FeatureError, FeatureResult};
use crate::graph::{ScaleClass, TopologyGraph};
use crate::spectral::{SpectralSolver, Spectrum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::debug;

pub struct ExtractionContext<'a> {
    pub graph: &'a TopologyGraph,
    pub scale: ScaleClass,
    pub config: &'a ExtractionConfig,
    pub backend: &'a dyn Backend,
    /// `None` when spectral features are switched off
    pub spectral: Option<SpectralSolver<'a>>,
}

impl<'a> ExtractionContext<'a> {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Seeded sample of `k` distinct node indices in ascending order,
    /// or every node when `k >= n`. The flag reports whether it sampled.
    pub fn sample_nodes(&self, k: usize, stream: u64) -> (Vec<usize>, bool) {
        let n = self.node_count();
        if k >= n {
            return ((0..n).collect(), false);
        }
        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(stream));
        let mut picked = rand::seq::index::sample(&mut rng, n, k).into_vec();
        picked.sort_unstable();
        (picked, true)
    }

    pub fn betweenness(
        &self,
        store: &mut SharedMetricStore,
    ) -> FeatureResult<Arc<BetweennessScores>> {
        store.betweenness_or_compute(|| self.compute_betweenness())
    }

    /// BFS from every node, run once per snapshot on the selected backend.
    pub fn all_sources_bfs(
        &self,
        store: &mut SharedMetricStore,
    ) -> FeatureResult<Arc<Vec<BfsStats>>> {
        store.bfs_stats_or_compute(|| {
            let sources: Vec<usize> = (0..self.node_count()).collect();
            Ok(self.backend.bfs_stats(self.graph, &sources))
        })
    }

    pub fn core_numbers(&self, store: &mut SharedMetricStore) -> FeatureResult<Arc<Vec<u32>>> {
        store.core_numbers_or_compute(|| Ok(core_numbers(self.graph)))
    }

    pub fn degrees(&self, store: &mut SharedMetricStore) -> FeatureResult<Arc<Vec<usize>>> {
        store.degrees_or_compute(|| Ok(self.graph.degrees()))
    }

    pub fn adjacency_spectrum(
        &self,
        store: &mut SharedMetricStore,
    ) -> FeatureResult<Arc<Spectrum>> {
        let solver = self.solver()?;
        store.spectrum_or_compute(MetricKey::AdjacencyEigs, || solver.adjacency_spectrum())
    }

    pub fn laplacian_spectrum(
        &self,
        store: &mut SharedMetricStore,
    ) -> FeatureResult<Arc<Spectrum>> {
        let solver = self.solver()?;
        store.spectrum_or_compute(MetricKey::LaplacianEigs, || solver.laplacian_spectrum())
    }

    /// Whether spectrum-derived features were computed from a partial spectrum.
    /// Follows the retrieval mode for the scale class even when the solver failed.
    pub fn spectrum_is_partial(&self, store: &mut SharedMetricStore) -> bool {
        let from_spectrum = self.adjacency_spectrum(store).map(|s| s.partial).ok();
        let scale = self.scale;
        store.flag_or_compute(MetricKey::SpectrumIsPartial, || {
            from_spectrum.unwrap_or(scale.is_large())
        })
    }

    pub fn solver(&self) -> FeatureResult<&SpectralSolver<'a>> {
        self.spectral
            .as_ref()
            .ok_or(FeatureError::Disabled("spectral features switched off"))
    }

    /// Exact Brandes for small graphs; pivot sampling scaled by `n / k` for large ones.
    fn compute_betweenness(&self) -> FeatureResult<BetweennessScores> {
        let n = self.node_count();
        let (sources, sampled) = match self.scale {
            ScaleClass::Small => ((0..n).collect(), false),
            ScaleClass::Large => {
                if self.config.betweenness_sample_size == 0 {
                    return Err(FeatureError::Disabled("betweenness sample size is zero"));
                }
                self.sample_nodes(self.config.betweenness_sample_size, 0)
            }
        };
        let scale = betweenness_scale(n, sources.len());
        let mut values = self.backend.betweenness(self.graph, &sources);
        values.iter_mut().for_each(|v| *v *= scale);
        debug!(
            n,
            sources = sources.len(),
            sampled,
            backend = self.backend.name(),
            "betweenness computed"
        );
        Ok(BetweennessScores {
            values,
            sampled,
            sources: sources.len(),
        })
    }
}
