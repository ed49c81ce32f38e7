//! Node-level feature set: ten values for every node of the snapshot.
//!
//! Betweenness and core numbers come from the store the graph-level pass
//! filled; they are only computed here when that pass did not run.

use super::context::ExtractionContext;
use super::record::{ExtraGraphFeatures, NodeFeatureTable, NodeFeatures};
use super::store::SharedMetricStore;
use super::value::{FeatureValue, UnavailableReason};
use crate::algo::centrality::{
    average_neighbor_degree, closeness, degree_centrality, eigenvector_centrality, pagerank,
};
use crate::algo::clique::{exact_clique_number, greedy_clique_number};
use crate::algo::clustering::local_clustering;
use crate::algo::BfsStats;
use crate::error::FeatureResult;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A whole column: one value per node, or one reason for all of them.
type Column = Result<Vec<FeatureValue>, UnavailableReason>;

fn column<T: Into<FeatureValue>>(name: &str, result: FeatureResult<Vec<T>>) -> Column {
    match result {
        Ok(values) => Ok(values.into_iter().map(Into::into).collect()),
        Err(err) => {
            warn!(feature = name, error = %err, "node feature unavailable");
            Err(err.into())
        }
    }
}

fn cell(col: &Column, node: usize) -> FeatureValue {
    match col {
        Ok(values) => values[node].clone(),
        Err(reason) => FeatureValue::Unavailable(reason.clone()),
    }
}

struct Eccentricities {
    values: Vec<FeatureValue>,
    sampled: bool,
}

pub fn extract_node_features(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    snapshot: &str,
) -> (NodeFeatureTable, ExtraGraphFeatures) {
    let g = ctx.graph;
    let n = g.node_count();
    let cfg = ctx.config;

    let degree = column("degree_centrality", Ok(degree_centrality(g)));
    let betweenness = column(
        "betweenness_centrality",
        ctx.betweenness(store).map(|b| b.values.clone()),
    );

    let bfs = ctx.all_sources_bfs(store);
    let closeness_col = column(
        "closeness_centrality",
        bfs.as_ref()
            .map(|stats| stats.iter().map(|s| closeness(s, n)).collect::<Vec<f64>>())
            .map_err(Clone::clone),
    );
    let ecc = match &bfs {
        Ok(stats) => eccentricities(ctx, stats),
        Err(err) => Eccentricities {
            values: vec![FeatureValue::Unavailable(err.clone().into()); n],
            sampled: false,
        },
    };

    let eigenvector = column(
        "eigenvector_centrality",
        eigenvector_centrality(g, cfg.centrality_max_iter, cfg.centrality_tolerance),
    );
    let pr = column(
        "pagerank",
        pagerank(g, cfg.pagerank_alpha, cfg.centrality_max_iter, cfg.centrality_tolerance),
    );
    let triangles = ctx.backend.triangles(g);
    let clustering = column(
        "clustering",
        Ok((0..n)
            .map(|u| local_clustering(g.degree(u), triangles[u]))
            .collect::<Vec<f64>>()),
    );
    let neighbor_degree = column("avg_neighbor_degree", Ok(average_neighbor_degree(g)));
    let cores = ctx.core_numbers(store);
    let (cliques, cliques_approximate) = match &cores {
        Ok(c) => {
            let (values, approximate) = clique_numbers(ctx, c);
            (Ok(values), approximate)
        }
        Err(err) => (Err(err.clone()), false),
    };
    let core_col = column("core_number", cores.map(|c| c.to_vec()));
    let clique_col = column("clique_number", cliques);

    let mut nodes = BTreeMap::new();
    for u in 0..n {
        nodes.insert(
            g.asn(u),
            NodeFeatures {
                degree_centrality: cell(&degree, u),
                betweenness_centrality: cell(&betweenness, u),
                closeness_centrality: cell(&closeness_col, u),
                eigenvector_centrality: cell(&eigenvector, u),
                pagerank: cell(&pr, u),
                clustering: cell(&clustering, u),
                avg_neighbor_degree: cell(&neighbor_degree, u),
                core_number: cell(&core_col, u),
                clique_number: cell(&clique_col, u),
                eccentricity: ecc.values[u].clone(),
            },
        );
    }

    let radius = ecc
        .values
        .iter()
        .filter_map(FeatureValue::as_f64)
        .min_by(f64::total_cmp)
        .map(|r| FeatureValue::Int(r as i64))
        .unwrap_or(FeatureValue::Unavailable(UnavailableReason::NotSampled));
    let clique_number = match &clique_col {
        Ok(values) => values
            .iter()
            .filter_map(FeatureValue::as_f64)
            .max_by(f64::total_cmp)
            .map(|c| FeatureValue::Int(c as i64))
            .unwrap_or(FeatureValue::Unavailable(UnavailableReason::EmptyGraph)),
        Err(reason) => FeatureValue::Unavailable(reason.clone()),
    };

    let table = NodeFeatureTable {
        snapshot: snapshot.to_string(),
        nodes,
    };
    let extras = ExtraGraphFeatures {
        radius,
        radius_approximate: ecc.sampled,
        clique_number,
        clique_number_approximate: cliques_approximate,
    };
    (table, extras)
}

/// Read from the shared all-sources traversals. Every node is reported when
/// the backend is accelerated or the graph is below the sampling threshold;
/// otherwise only a seeded sample of nodes gets a value and the rest are
/// marked not sampled.
fn eccentricities(ctx: &ExtractionContext<'_>, bfs: &[BfsStats]) -> Eccentricities {
    let n = ctx.node_count();
    let exact = ctx.backend.is_accelerated() || n < ctx.config.eccentricity_sample_threshold;
    if exact {
        return Eccentricities {
            values: bfs.iter().map(|s| FeatureValue::from(s.eccentricity)).collect(),
            sampled: false,
        };
    }
    let (sample, sampled) = ctx.sample_nodes(ctx.config.eccentricity_sample_for(n), 2);
    debug!(n, sample = sample.len(), "eccentricity sampled");
    let mut values = vec![FeatureValue::Unavailable(UnavailableReason::NotSampled); n];
    for u in sample {
        values[u] = FeatureValue::from(bfs[u].eccentricity);
    }
    Eccentricities { values, sampled }
}

/// Exact search over the whole graph up to the configured size. Above it the
/// exact search is confined to the innermost k-core and every other node gets
/// the greedy degree-ordered estimate.
fn clique_numbers(ctx: &ExtractionContext<'_>, cores: &[u32]) -> (Vec<usize>, bool) {
    let g = ctx.graph;
    let n = g.node_count();
    if n <= ctx.config.max_nodes_for_exact_clique {
        let allowed = vec![true; n];
        let values = (0..n)
            .map(|v| exact_clique_number(g, v, &allowed, greedy_clique_number(g, v)))
            .collect();
        return (values, false);
    }
    let degeneracy = cores.iter().copied().max().unwrap_or(0);
    let innermost: Vec<bool> = cores.iter().map(|&c| c == degeneracy).collect();
    debug!(
        n,
        innermost = innermost.iter().filter(|&&b| b).count(),
        "clique search restricted to innermost core"
    );
    let values = (0..n)
        .map(|v| {
            let greedy = greedy_clique_number(g, v);
            if innermost[v] {
                exact_clique_number(g, v, &innermost, greedy)
            } else {
                greedy
            }
        })
        .collect();
    (values, true)
}
