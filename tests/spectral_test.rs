//! Eigensolvers and spectrum-derived measures.

use approx::assert_relative_eq;
use asgraph_features::config::ExtractionConfig;
use asgraph_features::graph::{barabasi_albert, cycle, path, ScaleClass};
use asgraph_features::matrix::MatrixCache;
use asgraph_features::spectral::{
    distinct_eigenvalue_count, eigenvalue_ratio, kirchhoff_index, natural_connectivity,
    spectral_gap, symmetry_ratio, SpectralSolver, Spectrum,
};

#[test]
fn matrix_cache_shapes() {
    let m = MatrixCache::build(&cycle(5)).unwrap();
    assert_eq!(m.dim(), 5);
    assert_eq!(m.adjacency().nnz(), 10);
    // Laplacian adds the diagonal
    assert_eq!(m.laplacian().nnz(), 15);
    assert!(MatrixCache::build(&Default::default()).is_none());
}

#[test]
fn fiedler_value_of_path_by_shifted_inverse_iteration() {
    let m = MatrixCache::build(&path(10)).unwrap();
    let solver = SpectralSolver::new(&m, ScaleClass::Large, &ExtractionConfig::default());
    let expected = 2.0 - 2.0 * (std::f64::consts::PI / 10.0).cos();
    assert_relative_eq!(solver.fiedler_value().unwrap(), expected, epsilon = 1e-6);
}

#[test]
fn fiedler_value_matches_dense_laplacian() {
    let g = barabasi_albert(150, 2, 4);
    let m = MatrixCache::build(&g).unwrap();
    let config = ExtractionConfig::default();
    let dense = SpectralSolver::new(&m, ScaleClass::Small, &config)
        .laplacian_spectrum()
        .unwrap();
    let lambda2 = dense.values[dense.len() - 2];
    let iterative = SpectralSolver::new(&m, ScaleClass::Large, &config)
        .fiedler_value()
        .unwrap();
    assert_relative_eq!(iterative, lambda2, epsilon = 1e-5, max_relative = 1e-5);
}

fn top_by_magnitude(values: &[f64], k: usize) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| b.abs().total_cmp(&a.abs()));
    v.truncate(k);
    v.sort_by(|a, b| b.total_cmp(a));
    v
}

#[test]
fn lanczos_agrees_with_dense_decomposition() {
    let g = barabasi_albert(80, 2, 2);
    let m = MatrixCache::build(&g).unwrap();
    let config = ExtractionConfig {
        partial_spectrum_size: 10,
        lanczos_extra_steps: 100,
        ..ExtractionConfig::default()
    };
    let dense = SpectralSolver::new(&m, ScaleClass::Small, &config)
        .adjacency_spectrum()
        .unwrap();
    assert!(!dense.partial);
    assert_eq!(dense.len(), 80);

    let partial = SpectralSolver::new(&m, ScaleClass::Large, &config)
        .adjacency_spectrum()
        .unwrap();
    assert!(partial.partial);
    assert_eq!(partial.len(), 10);
    for (a, b) in partial.values.iter().zip(top_by_magnitude(&dense.values, 10)) {
        assert_relative_eq!(*a, b, epsilon = 1e-6);
    }

    // Fewer steps than nodes still pins down the spectral radius
    let short = ExtractionConfig {
        partial_spectrum_size: 10,
        lanczos_extra_steps: 40,
        ..ExtractionConfig::default()
    };
    let partial = SpectralSolver::new(&m, ScaleClass::Large, &short)
        .adjacency_spectrum()
        .unwrap();
    assert_relative_eq!(partial.radius().unwrap(), dense.radius().unwrap(), epsilon = 1e-6);
}

#[test]
fn laplacian_spectrum_is_excluded_for_large_graphs() {
    let m = MatrixCache::build(&cycle(12)).unwrap();
    let solver = SpectralSolver::new(&m, ScaleClass::Large, &ExtractionConfig::default());
    assert!(solver.laplacian_spectrum().is_err());
}

#[test]
fn natural_connectivity_divides_by_true_node_count() {
    let n = 10_000;
    let g = barabasi_albert(n, 2, 1);
    let m = MatrixCache::build(&g).unwrap();
    let config = ExtractionConfig {
        partial_spectrum_size: 50,
        lanczos_extra_steps: 40,
        ..ExtractionConfig::default()
    };
    let spectrum = SpectralSolver::new(&m, ScaleClass::Large, &config)
        .adjacency_spectrum()
        .unwrap();
    assert!(spectrum.partial);
    assert_eq!(spectrum.len(), 50);

    let nc = natural_connectivity(&spectrum, n).unwrap();
    let lambda_max = spectrum.largest().unwrap();
    let tail: f64 = spectrum.values.iter().map(|l| (l - lambda_max).exp()).sum();
    assert_relative_eq!(nc, lambda_max + tail.ln() - (n as f64).ln(), epsilon = 1e-12);

    let per_eigenvalue = natural_connectivity(&spectrum, spectrum.len()).unwrap();
    assert_relative_eq!(per_eigenvalue - nc, (n as f64 / 50.0).ln(), epsilon = 1e-9);
    assert!(per_eigenvalue - nc > 5.0);
}

#[test]
fn natural_connectivity_is_stable_for_large_eigenvalues() {
    let spectrum = Spectrum {
        values: vec![800.0, 799.0, -3.0],
        partial: true,
    };
    let nc = natural_connectivity(&spectrum, 1_000).unwrap();
    assert!(nc.is_finite());
    let expected = 800.0 + (1.0 + (-1.0f64).exp() + (-803.0f64).exp()).ln() - 1_000f64.ln();
    assert_relative_eq!(nc, expected, epsilon = 1e-9);
}

#[test]
fn spectrum_measures() {
    let spectrum = Spectrum {
        values: vec![3.0, 1.0 + 1e-9, 1.0, -1.0, -3.0],
        partial: false,
    };
    assert_eq!(distinct_eigenvalue_count(&spectrum), 4);
    assert_relative_eq!(symmetry_ratio(&spectrum, 3).unwrap(), 1.0);
    assert_relative_eq!(spectral_gap(&spectrum).unwrap(), 2.0, epsilon = 1e-6);
    assert_relative_eq!(eigenvalue_ratio(&spectrum).unwrap(), 3.0, epsilon = 1e-6);

    let zero_second = Spectrum {
        values: vec![2.0, 0.0, -2.0],
        partial: false,
    };
    assert!(eigenvalue_ratio(&zero_second).is_err());

    let laplacian = Spectrum {
        values: vec![4.0, 2.0, 2.0, 0.0],
        partial: false,
    };
    assert_relative_eq!(kirchhoff_index(&laplacian, 4).unwrap(), 5.0);
    let partial = Spectrum {
        partial: true,
        ..laplacian
    };
    assert!(kirchhoff_index(&partial, 4).is_err());
}
