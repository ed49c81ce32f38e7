//! Lanczos iteration with full reorthogonalization for the largest-magnitude
//! eigenvalues of a sparse symmetric matrix.

use crate::error::{FeatureError, FeatureResult};
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sprs::CsMat;

fn norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}

/// Up to `k` Ritz values of largest magnitude after at most `steps` Krylov steps.
///
/// Fails only when the dominant Ritz value has not converged, since every
/// dependent feature anchors on it.
pub(crate) fn largest_magnitude(
    m: &CsMat<f64>,
    k: usize,
    steps: usize,
    tol: f64,
    seed: u64,
) -> FeatureResult<Vec<f64>> {
    let n = m.rows();
    if n == 0 {
        return Ok(Vec::new());
    }
    let steps = steps.max(k).min(n);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut q = Array1::from_shape_fn(n, |_| rng.gen::<f64>() - 0.5);
    let q_norm = norm(&q);
    q /= q_norm;

    let mut basis: Vec<Array1<f64>> = vec![q];
    let mut alpha: Vec<f64> = Vec::with_capacity(steps);
    let mut beta: Vec<f64> = Vec::with_capacity(steps);
    let mut last_beta = 0.0;

    for j in 0..steps {
        let mut w = m * &basis[j];
        if j > 0 {
            w.scaled_add(-beta[j - 1], &basis[j - 1]);
        }
        let a = w.dot(&basis[j]);
        alpha.push(a);
        w.scaled_add(-a, &basis[j]);
        // Two passes of Gram-Schmidt keep the basis orthogonal in floating point
        for _ in 0..2 {
            for v in &basis {
                let p = w.dot(v);
                w.scaled_add(-p, v);
            }
        }
        let b = norm(&w);
        last_beta = b;
        if j + 1 == steps || b < 1e-12 {
            break;
        }
        beta.push(b);
        basis.push(w / b);
    }

    let dim = alpha.len();
    let mut t = DMatrix::zeros(dim, dim);
    for i in 0..dim {
        t[(i, i)] = alpha[i];
        if i + 1 < dim {
            t[(i, i + 1)] = beta[i];
            t[(i + 1, i)] = beta[i];
        }
    }
    let eigen = SymmetricEigen::new(t);

    // (ritz value, residual estimate)
    let mut ritz: Vec<(f64, f64)> = (0..dim)
        .map(|i| {
            let theta = eigen.eigenvalues[i];
            let residual = last_beta * eigen.eigenvectors[(dim - 1, i)].abs();
            (theta, residual)
        })
        .collect();
    ritz.sort_by(|a, b| b.0.abs().total_cmp(&a.0.abs()));
    ritz.truncate(k);

    let converged = ritz
        .iter()
        .filter(|(theta, r)| *r <= tol.sqrt() * theta.abs().max(1.0))
        .count();
    if let Some((theta, r)) = ritz.first() {
        if *r > tol.sqrt() * theta.abs().max(1.0) {
            return Err(FeatureError::NonConvergence {
                what: "lanczos",
                iterations: dim,
            });
        }
    }
    tracing::debug!(n, steps = dim, requested = k, converged, "lanczos partial spectrum");
    Ok(ritz.into_iter().map(|(theta, _)| theta).collect())
}
