//! End-to-end extraction: known topologies, metric store reuse, scale boundary,
//! degraded inputs.

use approx::assert_relative_eq;
use asgraph_features::{
    backend::StandardBackend,
    config::ExtractionConfig,
    error::ExtractError,
    features::{
        extract_node_features, ExtractionContext, FeatureExtractor, FeatureValue, MetricKey,
        SharedMetricStore, UnavailableReason, GRAPH_FEATURE_KEYS, GRAPH_FLAG_KEYS,
    },
    graph::{barabasi_albert, complete, cycle, star, ScaleClass, Snapshot, TopologyGraph},
};

fn extractor(config: ExtractionConfig) -> FeatureExtractor {
    FeatureExtractor::new(config)
}

fn value(v: &FeatureValue) -> f64 {
    v.as_f64().expect("feature should be available")
}

#[test]
fn square_cycle() {
    let out = extractor(ExtractionConfig::default())
        .extract(&Snapshot::from_lcc("c4", cycle(4)))
        .unwrap();
    let r = &out.graph;
    assert_relative_eq!(r.value("density").unwrap(), 2.0 / 3.0, epsilon = 1e-12);
    assert_eq!(r.value("clustering_global"), Some(0.0));
    assert_relative_eq!(r.value("algebraic_connectivity").unwrap(), 2.0, epsilon = 1e-8);
    assert_eq!(r.value("diameter"), Some(2.0));
    assert_relative_eq!(r.value("avg_path_length").unwrap(), 4.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(r.value("spectral_radius").unwrap(), 2.0, epsilon = 1e-8);
    // Laplacian spectrum 0, 2, 2, 4: four spanning trees, Kirchhoff 4 * (1/2 + 1/2 + 1/4)
    assert_relative_eq!(r.value("kirchhoff_index").unwrap(), 5.0, epsilon = 1e-8);
    assert_relative_eq!(r.value("log_spanning_trees").unwrap(), 4f64.ln(), epsilon = 1e-8);
    // Adjacency spectrum 2, 0, 0, -2
    assert_relative_eq!(r.value("symmetry_ratio").unwrap(), 1.0, epsilon = 1e-12);
    let e = std::f64::consts::E;
    assert_relative_eq!(
        r.value("natural_connectivity").unwrap(),
        ((e * e + 2.0 + 1.0 / (e * e)) / 4.0).ln(),
        epsilon = 1e-8
    );
    assert_eq!(r.value("edge_connectivity"), Some(2.0));
    assert_eq!(r.value("node_connectivity"), Some(2.0));
    assert_eq!(r.value("degeneracy"), Some(2.0));
    assert_eq!(r.value("radius"), Some(2.0));
    assert_eq!(r.value("clique_number"), Some(2.0));
    assert!(!r.flag("symmetry_ratio_partial"));
    assert!(!r.flag("natural_connectivity_partial"));

    // Every node lies on half the paths between its two neighbors
    for node in out.nodes.nodes.values() {
        assert_relative_eq!(value(&node.betweenness_centrality), 1.0 / 6.0, epsilon = 1e-12);
        assert_eq!(node.eccentricity, FeatureValue::Int(2));
    }
    // Uniform betweenness has no skewness; its siblings are unaffected
    assert!(matches!(
        r.get("betweenness_skewness").and_then(|v| v.reason()),
        Some(UnavailableReason::Degenerate(_))
    ));
    assert_relative_eq!(r.value("betweenness_std").unwrap(), 0.0, epsilon = 1e-15);
}

#[test]
fn complete_graph_k5() {
    let out = extractor(ExtractionConfig::default())
        .extract(&Snapshot::from_lcc("k5", complete(5)))
        .unwrap();
    let r = &out.graph;
    assert_eq!(r.value("density"), Some(1.0));
    assert_relative_eq!(r.value("clustering_global").unwrap(), 1.0, epsilon = 1e-12);
    assert_eq!(r.value("edge_connectivity"), Some(4.0));
    assert_eq!(r.value("node_connectivity"), Some(4.0));
    assert_eq!(r.value("clique_number"), Some(5.0));
    assert_relative_eq!(r.value("rich_club_p99").unwrap(), 1.0, epsilon = 1e-12);
    assert_relative_eq!(r.value("spectral_radius").unwrap(), 4.0, epsilon = 1e-8);
    assert_eq!(out.nodes.len(), 5);
    for node in out.nodes.nodes.values() {
        assert_eq!(node.degree_centrality, FeatureValue::Float(1.0));
        assert_relative_eq!(value(&node.clustering), 1.0, epsilon = 1e-12);
        assert_eq!(node.clique_number, FeatureValue::Int(5));
        assert_relative_eq!(value(&node.pagerank), 0.2, epsilon = 1e-6);
        assert_relative_eq!(value(&node.eigenvector_centrality), 1.0 / 5f64.sqrt(), epsilon = 1e-5);
    }
}

#[test]
fn star_graph_betweenness() {
    let out = extractor(ExtractionConfig::default())
        .extract(&Snapshot::from_lcc("star", star(20)))
        .unwrap();
    let center = out.nodes.get(1).unwrap();
    assert_relative_eq!(value(&center.betweenness_centrality), 1.0, epsilon = 1e-12);
    for asn in 2..=21 {
        let leaf = out.nodes.get(asn).unwrap();
        assert_eq!(value(&leaf.betweenness_centrality), 0.0);
    }
    assert_eq!(out.graph.value("degeneracy"), Some(1.0));
    assert_eq!(out.graph.value("kcore_innermost_size"), Some(21.0));
    assert_relative_eq!(out.graph.value("betweenness_max").unwrap(), 1.0, epsilon = 1e-12);
    assert_eq!(out.graph.value("radius"), Some(1.0));
    assert_eq!(out.graph.value("diameter"), Some(2.0));
}

#[test]
fn percolation_limit_is_inverse_spectral_radius() {
    let extractor = extractor(ExtractionConfig::default());
    for seed in 0..3 {
        let out = extractor
            .extract(&Snapshot::from_lcc("ba", barabasi_albert(120, 2, seed)))
            .unwrap();
        let radius = out.graph.value("spectral_radius").unwrap();
        assert_eq!(out.graph.value("percolation_limit"), Some(1.0 / radius));
    }
}

#[test]
fn whitney_inequality_on_records() {
    let extractor = extractor(ExtractionConfig::default());
    for seed in 0..4 {
        let g = barabasi_albert(150, 3, seed);
        let min_degree = g.min_degree() as f64;
        let out = extractor.extract(&Snapshot::from_lcc("ba", g)).unwrap();
        let kappa = out.graph.value("node_connectivity").unwrap();
        let lambda = out.graph.value("edge_connectivity").unwrap();
        assert!(kappa <= lambda && lambda <= min_degree, "{kappa} {lambda} {min_degree}");
        assert!(out.graph.value("algebraic_connectivity").unwrap() > 0.0);
        let density = out.graph.value("density").unwrap();
        assert!(density > 0.0 && density < 1.0);
    }
}

#[test]
fn betweenness_and_cores_computed_once_and_shared() {
    let extractor = extractor(ExtractionConfig::default());
    let snapshot = Snapshot::from_lcc("ba", barabasi_albert(200, 2, 7));

    let mut store = SharedMetricStore::new();
    let first = extractor.extract_with_store(&snapshot, &mut store).unwrap();
    assert_eq!(store.computations(MetricKey::Betweenness), 1);
    assert_eq!(store.computations(MetricKey::CoreNumber), 1);
    assert_eq!(store.computations(MetricKey::AdjacencyEigs), 1);

    let stored = store.betweenness().unwrap();
    let cores = store.core_numbers().unwrap();
    for (u, &asn) in snapshot.graph.asns().iter().enumerate() {
        let node = first.nodes.get(asn).unwrap();
        assert_eq!(node.betweenness_centrality, FeatureValue::Float(stored.values[u]));
        assert_eq!(node.core_number, FeatureValue::Int(cores[u] as i64));
    }
    let max = stored.values.iter().copied().fold(f64::MIN, f64::max);
    assert_eq!(first.graph.value("betweenness_max"), Some(max));

    // A second run agrees bit for bit
    let second = extractor.extract(&snapshot).unwrap();
    assert_eq!(first.nodes.nodes, second.nodes.nodes);
    assert_eq!(first.graph.features, second.graph.features);
}

#[test]
fn sampled_betweenness_is_shared_on_large_graphs() {
    let config = ExtractionConfig {
        scale_threshold_nodes: 50,
        betweenness_sample_size: 25,
        ..ExtractionConfig::default()
    };
    let snapshot = Snapshot::from_lcc("ba", barabasi_albert(120, 2, 3));
    let mut store = SharedMetricStore::new();
    let out = extractor(config).extract_with_store(&snapshot, &mut store).unwrap();
    assert!(out.graph.flag("betweenness_sampled"));
    assert_eq!(store.computations(MetricKey::Betweenness), 1);
    let stored = store.betweenness().unwrap();
    assert!(stored.sampled);
    assert_eq!(stored.sources, 25);
    for (u, &asn) in snapshot.graph.asns().iter().enumerate() {
        assert_eq!(
            out.nodes.get(asn).unwrap().betweenness_centrality,
            FeatureValue::Float(stored.values[u])
        );
    }
}

#[test]
fn scale_boundary_switches_code_paths() {
    let config = ExtractionConfig {
        scale_threshold_nodes: 60,
        betweenness_sample_size: 20,
        ..ExtractionConfig::default()
    };
    let extractor = extractor(config);

    let at = extractor
        .extract(&Snapshot::from_lcc("at", barabasi_albert(60, 2, 11)))
        .unwrap();
    assert_eq!(at.graph.scale_class.as_str(), "small");
    assert!(!at.graph.flag("symmetry_ratio_partial"));
    assert!(!at.graph.flag("natural_connectivity_partial"));
    assert!(!at.graph.flag("betweenness_sampled"));
    assert!(at.graph.value("kirchhoff_index").is_some());
    assert!(at.graph.value("log_spanning_trees").is_some());

    let above = extractor
        .extract(&Snapshot::from_lcc("above", barabasi_albert(61, 2, 11)))
        .unwrap();
    assert_eq!(above.graph.scale_class.as_str(), "large");
    assert!(above.graph.flag("symmetry_ratio_partial"));
    assert!(above.graph.flag("natural_connectivity_partial"));
    assert!(above.graph.flag("betweenness_sampled"));
    assert!(above.graph.value("natural_connectivity").is_some());
    assert!(above.graph.value("algebraic_connectivity").unwrap() > 0.0);
    for key in ["kirchhoff_index", "log_spanning_trees"] {
        assert!(matches!(
            above.graph.get(key).and_then(|v| v.reason()),
            Some(UnavailableReason::ScaleExcluded(_))
        ));
        assert!(above.graph.unavailable.contains_key(key));
    }
}

#[test]
fn empty_graph_yields_nulls() {
    let out = extractor(ExtractionConfig::default())
        .extract(&Snapshot::from_lcc("empty", TopologyGraph::default()))
        .unwrap();
    assert!(out.nodes.is_empty());
    assert_eq!(out.graph.value("num_nodes"), Some(0.0));
    for key in GRAPH_FEATURE_KEYS {
        assert!(out.graph.contains(key));
    }
    for key in GRAPH_FLAG_KEYS {
        assert!(!out.graph.flag(key));
    }
    assert_eq!(
        out.graph.get("density").and_then(|v| v.reason()),
        Some(&UnavailableReason::EmptyGraph)
    );
    let json = serde_json::to_value(&out.graph).unwrap();
    assert!(json["algebraic_connectivity"].is_null());
}

#[test]
fn disconnected_graph_is_rejected() {
    let g = TopologyGraph::from_edges([(1, 2), (3, 4), (5, 6)]);
    let err = extractor(ExtractionConfig::default())
        .extract(&Snapshot::from_lcc("split", g))
        .unwrap_err();
    assert!(matches!(err, ExtractError::Disconnected { components: 3 }));
}

#[test]
fn spectral_switch_leaves_other_groups_intact() {
    let config = ExtractionConfig {
        compute_spectral: false,
        ..ExtractionConfig::default()
    };
    let out = extractor(config)
        .extract(&Snapshot::from_lcc("c8", cycle(8)))
        .unwrap();
    for key in ["spectral_radius", "algebraic_connectivity", "kirchhoff_index", "spectral_gap"] {
        assert!(matches!(
            out.graph.get(key).and_then(|v| v.reason()),
            Some(UnavailableReason::Disabled(_))
        ));
    }
    assert!(matches!(
        out.graph.get("percolation_limit").and_then(|v| v.reason()),
        Some(UnavailableReason::Missing(_))
    ));
    assert_eq!(out.graph.value("diameter"), Some(4.0));
    assert_eq!(out.graph.value("edge_connectivity"), Some(2.0));
    assert_eq!(out.nodes.len(), 8);
}

#[test]
fn fiedler_non_convergence_keeps_partial_spectrum_features() {
    // Large class: the Fiedler value comes from shifted inverse iteration,
    // which one iteration cannot settle; Lanczos has its own step budget.
    let config = ExtractionConfig {
        scale_threshold_nodes: 50,
        eigen_max_iter: 1,
        ..ExtractionConfig::default()
    };
    let out = extractor(config)
        .extract(&Snapshot::from_lcc("ba", barabasi_albert(300, 2, 4)))
        .unwrap();
    let r = &out.graph;
    assert_eq!(r.scale_class, ScaleClass::Large);
    assert!(matches!(
        r.get("algebraic_connectivity").and_then(|v| v.reason()),
        Some(UnavailableReason::NonConvergence(_))
    ));
    assert!(r.unavailable.contains_key("algebraic_connectivity"));

    let radius = r.value("spectral_radius").unwrap();
    assert!(radius > 0.0);
    assert_eq!(r.value("percolation_limit"), Some(1.0 / radius));
    assert!(r.value("natural_connectivity").is_some());
    assert!(r.value("spectral_gap").is_some());
    assert!(r.flag("natural_connectivity_partial"));
    assert_eq!(r.value("edge_connectivity"), Some(2.0));
}

#[test]
fn node_pass_computes_missing_store_entries_itself() {
    let g = barabasi_albert(100, 2, 6);
    let config = ExtractionConfig::default();
    let ctx = ExtractionContext {
        graph: &g,
        scale: ScaleClass::classify(g.node_count(), config.scale_threshold_nodes),
        config: &config,
        backend: &StandardBackend,
        spectral: None,
    };
    let mut store = SharedMetricStore::new();
    assert!(!store.contains(MetricKey::Betweenness));

    let (table, extras) = extract_node_features(&ctx, &mut store, "ba");
    assert_eq!(store.computations(MetricKey::Betweenness), 1);
    assert_eq!(store.computations(MetricKey::CoreNumber), 1);
    assert_eq!(table.len(), 100);

    let stored = store.betweenness().unwrap();
    let cores = store.core_numbers().unwrap();
    for (u, &asn) in g.asns().iter().enumerate() {
        let node = table.get(asn).unwrap();
        assert_eq!(node.betweenness_centrality, FeatureValue::Float(stored.values[u]));
        assert_eq!(node.core_number, FeatureValue::Int(cores[u] as i64));
        for v in [
            &node.degree_centrality,
            &node.closeness_centrality,
            &node.clustering,
            &node.avg_neighbor_degree,
            &node.clique_number,
            &node.eccentricity,
        ] {
            assert!(v.is_available());
        }
    }
    assert!(extras.radius.is_available());
    assert!(!extras.radius_approximate);
}

#[test]
fn all_source_traversals_are_shared_between_passes() {
    let snapshot = Snapshot::from_lcc("ba", barabasi_albert(150, 2, 8));
    let mut store = SharedMetricStore::new();
    let out = extractor(ExtractionConfig::default())
        .extract_with_store(&snapshot, &mut store)
        .unwrap();
    assert_eq!(store.computations(MetricKey::AllSourcesBfs), 1);

    // Diameter and radius come from the same traversals
    let max_ecc = out
        .nodes
        .nodes
        .values()
        .filter_map(|n| n.eccentricity.as_f64())
        .fold(0.0, f64::max);
    assert_eq!(out.graph.value("diameter"), Some(max_ecc));
    assert!(out.graph.value("radius").unwrap() <= max_ecc);
}

#[test]
fn node_pass_can_be_switched_off() {
    let config = ExtractionConfig {
        node_features: false,
        ..ExtractionConfig::default()
    };
    let out = extractor(config)
        .extract(&Snapshot::from_lcc("c5", cycle(5)))
        .unwrap();
    assert!(out.nodes.is_empty());
    assert!(matches!(
        out.graph.get("radius").and_then(|v| v.reason()),
        Some(UnavailableReason::Disabled(_))
    ));
    assert_eq!(out.graph.value("degeneracy"), Some(2.0));
}

#[test]
fn eccentricity_sampling_marks_unsampled_nodes() {
    let config = ExtractionConfig {
        eccentricity_sample_threshold: 10,
        eccentricity_sample_size: Some(5),
        ..ExtractionConfig::default()
    };
    let extractor = FeatureExtractor::with_backend(config, Box::new(StandardBackend));
    let out = extractor.extract(&Snapshot::from_lcc("c20", cycle(20))).unwrap();
    let sampled: Vec<_> = out
        .nodes
        .nodes
        .values()
        .filter(|n| n.eccentricity.is_available())
        .collect();
    assert_eq!(sampled.len(), 5);
    for node in &sampled {
        assert_eq!(node.eccentricity, FeatureValue::Int(10));
    }
    let unsampled = out.nodes.nodes.values().find(|n| !n.eccentricity.is_available()).unwrap();
    assert_eq!(unsampled.eccentricity.reason(), Some(&UnavailableReason::NotSampled));
    // Closeness is never sampled
    assert!(out.nodes.nodes.values().all(|n| n.closeness_centrality.is_available()));
    assert_eq!(out.graph.value("radius"), Some(10.0));
    assert!(out.graph.flag("radius_approximate"));
}

#[test]
fn large_clique_search_is_flagged() {
    // K4 on 1..=4 with a pendant path 4-5-6
    let g = TopologyGraph::from_edges([
        (1, 2),
        (1, 3),
        (1, 4),
        (2, 3),
        (2, 4),
        (3, 4),
        (4, 5),
        (5, 6),
    ]);
    let exact = extractor(ExtractionConfig::default())
        .extract(&Snapshot::from_lcc("exact", g.clone()))
        .unwrap();
    let config = ExtractionConfig {
        max_nodes_for_exact_clique: 3,
        ..ExtractionConfig::default()
    };
    let restricted = extractor(config).extract(&Snapshot::from_lcc("restricted", g)).unwrap();

    assert!(!exact.graph.flag("clique_number_approximate"));
    assert!(restricted.graph.flag("clique_number_approximate"));
    for out in [&exact, &restricted] {
        assert_eq!(out.graph.value("clique_number"), Some(4.0));
        assert_eq!(out.nodes.get(1).unwrap().clique_number, FeatureValue::Int(4));
        assert_eq!(out.nodes.get(6).unwrap().clique_number, FeatureValue::Int(2));
    }
}

#[test]
fn sampled_path_lengths_on_large_graphs() {
    let config = ExtractionConfig {
        path_length_sample_threshold: 10,
        path_length_sample_size: 5,
        ..ExtractionConfig::default()
    };
    let out = extractor(config)
        .extract(&Snapshot::from_lcc("p30", asgraph_features::graph::path(30)))
        .unwrap();
    assert!(out.graph.flag("avg_path_length_sampled"));
    let diameter = out.graph.value("diameter").unwrap();
    if out.graph.flag("diameter_approximate") {
        assert!(diameter <= 29.0);
    } else {
        assert_eq!(diameter, 29.0);
    }
    let avg = out.graph.value("avg_path_length").unwrap();
    assert!(avg > 1.0 && avg < 29.0);
}

#[cfg(feature = "parallel")]
#[test]
fn backends_agree_bit_for_bit() {
    use asgraph_features::backend::ParallelBackend;

    let snapshot = Snapshot::from_lcc("ba", barabasi_albert(300, 2, 5));
    let config = ExtractionConfig::default();
    let standard = FeatureExtractor::with_backend(config.clone(), Box::new(StandardBackend))
        .extract(&snapshot)
        .unwrap();
    let parallel = FeatureExtractor::with_backend(config, Box::new(ParallelBackend))
        .extract(&snapshot)
        .unwrap();
    assert_eq!(standard.graph.features, parallel.graph.features);
    assert_eq!(standard.nodes.nodes, parallel.nodes.nodes);
    assert_eq!(parallel.graph.backend, "rayon");
}
