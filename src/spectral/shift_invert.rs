//! Shifted inverse iteration for the Fiedler value.
//!
//! Iterates `x <- (L + sigma I)^-1 x` with `x` kept orthogonal to the constant
//! vector, so the zero mode never enters and the solve is always well posed.

use crate::error::{FeatureError, FeatureResult};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sprs::CsMat;

fn norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}

fn remove_mean(v: &mut Array1<f64>) {
    let mean = v.mean().unwrap_or(0.0);
    v.mapv_inplace(|x| x - mean);
}

/// Solve `(L + sigma I) y = b` by conjugate gradients.
fn conjugate_gradient(
    l: &CsMat<f64>,
    sigma: f64,
    b: &Array1<f64>,
    max_iter: usize,
    tol: f64,
) -> FeatureResult<Array1<f64>> {
    let apply = |p: &Array1<f64>| {
        let mut out = l * p;
        out.scaled_add(sigma, p);
        out
    };
    let b_norm = norm(b).max(f64::MIN_POSITIVE);
    let mut y = Array1::zeros(b.len());
    let mut r = b.clone();
    let mut p = r.clone();
    let mut rs = r.dot(&r);
    for _ in 0..max_iter {
        if rs.sqrt() <= tol * b_norm {
            return Ok(y);
        }
        let ap = apply(&p);
        let step = rs / p.dot(&ap);
        y.scaled_add(step, &p);
        r.scaled_add(-step, &ap);
        let rs_next = r.dot(&r);
        p = &r + &(&p * (rs_next / rs));
        rs = rs_next;
    }
    if rs.sqrt() <= tol * b_norm {
        Ok(y)
    } else {
        Err(FeatureError::NonConvergence {
            what: "conjugate gradient",
            iterations: max_iter,
        })
    }
}

pub(crate) fn fiedler_value(
    l: &CsMat<f64>,
    sigma: f64,
    max_iter: usize,
    tol: f64,
    seed: u64,
) -> FeatureResult<f64> {
    let n = l.rows();
    if n < 2 {
        return Err(FeatureError::Degenerate("fewer than two nodes".into()));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = Array1::from_shape_fn(n, |_| rng.gen::<f64>() - 0.5);
    remove_mean(&mut x);
    let x_norm = norm(&x);
    x /= x_norm;

    let cg_budget = (10 * n).max(1_000);
    let cg_tol = (tol * 1e-2).max(1e-14);
    for _ in 0..max_iter {
        let mut y = conjugate_gradient(l, sigma, &x, cg_budget, cg_tol)?;
        remove_mean(&mut y);
        let y_norm = norm(&y);
        if y_norm < f64::MIN_POSITIVE {
            return Err(FeatureError::Degenerate("inverse iterate vanished".into()));
        }
        x = y / y_norm;

        let lx = l * &x;
        let lambda = x.dot(&lx);
        let mut residual = lx;
        residual.scaled_add(-lambda, &x);
        if norm(&residual) <= tol.sqrt() * lambda.abs().max(1.0) {
            return Ok(lambda);
        }
    }
    Err(FeatureError::NonConvergence {
        what: "shifted inverse iteration",
        iterations: max_iter,
    })
}
