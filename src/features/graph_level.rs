//! Graph-level feature set: sixteen independently isolated groups.
//!
//! Each group writes its own keys. A group that fails marks every key it did
//! not write as unavailable with the failure reason and the next group runs.

use super::context::ExtractionContext;
use super::record::GraphFeatureRecord;
use super::store::SharedMetricStore;
use super::value::{FeatureValue, UnavailableReason};
use crate::algo::bounded_diameter;
use crate::algo::clustering::{local_clustering, transitivity};
use crate::algo::connectivity::{edge_connectivity, node_connectivity};
use crate::algo::structure::{
    degree_assortativity, density, moments, percentile_degree, rich_club_coefficient,
};
use crate::error::{FeatureError, FeatureResult};
use crate::spectral::{self, ZERO_EIGENVALUE_TOL};
use tracing::{debug, warn};

type GroupFn = fn(
    &ExtractionContext<'_>,
    &mut SharedMetricStore,
    &mut GraphFeatureRecord,
) -> FeatureResult<()>;

struct FeatureGroup {
    name: &'static str,
    keys: &'static [&'static str],
    run: GroupFn,
}

const GROUPS: &[FeatureGroup] = &[
    FeatureGroup {
        name: "assortativity",
        keys: &["assortativity"],
        run: assortativity,
    },
    FeatureGroup {
        name: "density",
        keys: &["density"],
        run: density_group,
    },
    FeatureGroup {
        name: "clustering",
        keys: &["clustering_global", "clustering_avg"],
        run: clustering,
    },
    FeatureGroup {
        name: "distances",
        keys: &["diameter", "avg_path_length"],
        run: distances,
    },
    FeatureGroup {
        name: "algebraic_connectivity",
        keys: &["algebraic_connectivity"],
        run: algebraic_connectivity,
    },
    FeatureGroup {
        name: "spectral_radius",
        keys: &["spectral_radius"],
        run: spectral_radius,
    },
    FeatureGroup {
        name: "percolation_limit",
        keys: &["percolation_limit"],
        run: percolation_limit,
    },
    FeatureGroup {
        name: "symmetry_ratio",
        keys: &["symmetry_ratio"],
        run: symmetry_ratio,
    },
    FeatureGroup {
        name: "natural_connectivity",
        keys: &["natural_connectivity"],
        run: natural_connectivity,
    },
    FeatureGroup {
        name: "kirchhoff_index",
        keys: &["kirchhoff_index"],
        run: kirchhoff_index,
    },
    FeatureGroup {
        name: "log_spanning_trees",
        keys: &["log_spanning_trees"],
        run: log_spanning_trees,
    },
    FeatureGroup {
        name: "connectivity",
        keys: &["edge_connectivity", "node_connectivity"],
        run: connectivity,
    },
    FeatureGroup {
        name: "rich_club",
        keys: &[
            "rich_club_p50",
            "rich_club_p75",
            "rich_club_p90",
            "rich_club_p95",
            "rich_club_p99",
        ],
        run: rich_club,
    },
    FeatureGroup {
        name: "betweenness_stats",
        keys: &[
            "betweenness_mean",
            "betweenness_std",
            "betweenness_max",
            "betweenness_skewness",
        ],
        run: betweenness_stats,
    },
    FeatureGroup {
        name: "kcore",
        keys: &["degeneracy", "kcore_innermost_size", "core_number_mean"],
        run: kcore,
    },
    FeatureGroup {
        name: "spectral_gap",
        keys: &["spectral_gap", "eigenvalue_ratio"],
        run: spectral_gap,
    },
];

/// Run every group in a fixed order, writing into `record` and `store`.
pub fn extract_graph_features(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    record: &mut GraphFeatureRecord,
) {
    for group in GROUPS {
        if let Err(err) = (group.run)(ctx, store, record) {
            warn!(group = group.name, error = %err, "feature group unavailable");
            let reason = UnavailableReason::from(err);
            record.fill_missing(group.keys, &reason);
        }
    }
}

fn assortativity(
    ctx: &ExtractionContext<'_>,
    _: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    r.set("assortativity", degree_assortativity(ctx.graph)?);
    Ok(())
}

fn density_group(
    ctx: &ExtractionContext<'_>,
    _: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    r.set("density", density(ctx.graph));
    Ok(())
}

fn clustering(
    ctx: &ExtractionContext<'_>,
    _: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let g = ctx.graph;
    let triangles = ctx.backend.triangles(g);
    r.set("clustering_global", transitivity(g, &triangles));
    let local_sum: f64 = triangles
        .iter()
        .enumerate()
        .map(|(u, &t)| local_clustering(g.degree(u), t))
        .sum();
    r.set("clustering_avg", local_sum / g.node_count() as f64);
    Ok(())
}

/// Exact all-pairs BFS up to the sampling threshold. Above it the average
/// comes from a source sample and the diameter from eccentricity bounding
/// with the same traversal budget.
fn distances(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let g = ctx.graph;
    let n = g.node_count();
    if n < 2 {
        return Err(FeatureError::Degenerate("fewer than two nodes".into()));
    }
    let cfg = ctx.config;
    if n <= cfg.path_length_sample_threshold {
        let stats = ctx.all_sources_bfs(store)?;
        let total: u64 = stats.iter().map(|s| s.distance_sum).sum();
        let diameter = stats.iter().map(|s| s.eccentricity).max().unwrap_or(0);
        r.set("diameter", diameter);
        r.set("avg_path_length", total as f64 / (n * (n - 1)) as f64);
        r.set_flag("diameter_approximate", false);
        r.set_flag("avg_path_length_sampled", false);
        return Ok(());
    }

    let (sources, sampled) = ctx.sample_nodes(cfg.path_length_sample_size.max(1), 1);
    let stats = ctx.backend.bfs_stats(g, &sources);
    let total: u64 = stats.iter().map(|s| s.distance_sum).sum();
    r.set("avg_path_length", total as f64 / (sources.len() * (n - 1)) as f64);
    r.set_flag("avg_path_length_sampled", sampled);

    let bounds = bounded_diameter(g, cfg.path_length_sample_size.max(1));
    debug!(
        lower = bounds.lower,
        upper = bounds.upper,
        traversals = bounds.traversals,
        "diameter bounds"
    );
    r.set("diameter", bounds.lower);
    r.set_flag("diameter_approximate", !bounds.is_exact());
    Ok(())
}

/// From the full Laplacian spectrum when there is one, shifted inverse
/// iteration otherwise.
fn algebraic_connectivity(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let solver = ctx.solver()?;
    if ctx.node_count() < 2 {
        return Err(FeatureError::Degenerate("fewer than two nodes".into()));
    }
    let from_spectrum = ctx
        .laplacian_spectrum(store)
        .ok()
        .and_then(|s| s.values.iter().rev().nth(1).copied());
    let value = match from_spectrum {
        Some(v) => v,
        None => solver.fiedler_value()?,
    };
    if value <= ZERO_EIGENVALUE_TOL {
        return Err(FeatureError::Degenerate(format!(
            "algebraic connectivity {value:e} is not positive on a connected graph"
        )));
    }
    r.set("algebraic_connectivity", value);
    Ok(())
}

fn spectral_radius(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let spectrum = ctx.adjacency_spectrum(store)?;
    let radius = spectrum
        .radius()
        .ok_or_else(|| FeatureError::Degenerate("empty spectrum".into()))?;
    r.set("spectral_radius", radius);
    Ok(())
}

/// Reads the recorded spectral radius so the two always agree exactly.
fn percolation_limit(
    _: &ExtractionContext<'_>,
    _: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let radius = r
        .value("spectral_radius")
        .ok_or(FeatureError::Missing("spectral_radius"))?;
    if radius <= ZERO_EIGENVALUE_TOL {
        return Err(FeatureError::Degenerate("spectral radius is zero".into()));
    }
    r.set("percolation_limit", 1.0 / radius);
    Ok(())
}

fn symmetry_ratio(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let spectrum = ctx.adjacency_spectrum(store)?;
    r.set_flag("symmetry_ratio_partial", ctx.spectrum_is_partial(store));
    let diameter = r.value("diameter").ok_or(FeatureError::Missing("diameter"))?;
    r.set("symmetry_ratio", spectral::symmetry_ratio(&spectrum, diameter as u32)?);
    Ok(())
}

fn natural_connectivity(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let spectrum = ctx.adjacency_spectrum(store)?;
    r.set_flag("natural_connectivity_partial", ctx.spectrum_is_partial(store));
    r.set(
        "natural_connectivity",
        spectral::natural_connectivity(&spectrum, ctx.node_count())?,
    );
    Ok(())
}

fn kirchhoff_index(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let spectrum = ctx.laplacian_spectrum(store)?;
    r.set("kirchhoff_index", spectral::kirchhoff_index(&spectrum, ctx.node_count())?);
    Ok(())
}

fn log_spanning_trees(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let spectrum = ctx.laplacian_spectrum(store)?;
    r.set(
        "log_spanning_trees",
        spectral::log_spanning_trees(&spectrum, ctx.node_count())?,
    );
    Ok(())
}

fn connectivity(
    ctx: &ExtractionContext<'_>,
    _: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    r.set("edge_connectivity", edge_connectivity(ctx.graph));
    r.set("node_connectivity", node_connectivity(ctx.graph));
    Ok(())
}

/// One coefficient per configured degree percentile, each at the nearest
/// threshold that leaves at least two rich nodes.
fn rich_club(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let degrees = ctx.degrees(store)?;
    let mut sorted = degrees.to_vec();
    sorted.sort_unstable();
    for &pct in &ctx.config.rich_club_percentiles {
        let key = format!("rich_club_p{pct}");
        let requested = percentile_degree(&sorted, pct);
        let value = match rich_club_coefficient(ctx.graph, &degrees, &sorted, requested) {
            Ok((used, phi)) => {
                if used != requested {
                    debug!(pct, requested, used, "rich-club threshold snapped down");
                }
                FeatureValue::from(phi)
            }
            Err(err) => FeatureValue::Unavailable(err.into()),
        };
        r.set(&key, value);
    }
    Ok(())
}

fn betweenness_stats(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let scores = ctx.betweenness(store)?;
    r.set_flag("betweenness_sampled", scores.sampled);
    let m = moments(&scores.values).ok_or_else(|| FeatureError::Degenerate("no nodes".into()))?;
    r.set("betweenness_mean", m.mean);
    r.set("betweenness_std", m.std);
    r.set("betweenness_max", m.max);
    r.set(
        "betweenness_skewness",
        FeatureValue::from_result(
            m.skewness
                .ok_or_else(|| FeatureError::Degenerate("betweenness has no spread".into())),
        ),
    );
    Ok(())
}

fn kcore(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let cores = ctx.core_numbers(store)?;
    let degeneracy = cores.iter().copied().max().unwrap_or(0);
    let innermost = cores.iter().filter(|&&c| c == degeneracy).count();
    let mean = cores.iter().map(|&c| c as f64).sum::<f64>() / cores.len().max(1) as f64;
    r.set("degeneracy", degeneracy);
    r.set("kcore_innermost_size", innermost);
    r.set("core_number_mean", mean);
    Ok(())
}

fn spectral_gap(
    ctx: &ExtractionContext<'_>,
    store: &mut SharedMetricStore,
    r: &mut GraphFeatureRecord,
) -> FeatureResult<()> {
    let spectrum = ctx.adjacency_spectrum(store)?;
    r.set("spectral_gap", FeatureValue::from_result(spectral::spectral_gap(&spectrum)));
    r.set(
        "eigenvalue_ratio",
        FeatureValue::from_result(spectral::eigenvalue_ratio(&spectrum)),
    );
    Ok(())
}
