//! Random helpers layered on [`fastrand::Rng`].
//!
//! [`gaussian`] is handy for building noisy test evaluators.

/// Create an RNG from an optional seed.
pub(crate) fn rng_from_seed(seed: Option<u64>) -> fastrand::Rng {
    seed.map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)
}

/// Sample from a zero-mean normal distribution with the given standard
/// deviation (Box-Muller).
pub fn gaussian(rng: &mut fastrand::Rng, sigma: f64) -> f64 {
    // 1 - u keeps the argument of ln strictly positive.
    let u1 = 1.0 - rng.f64();
    let u2 = rng.f64();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * core::f64::consts::PI * u2).cos();
    z * sigma
}

/// Draw `k` distinct values from `0..n` uniformly without replacement.
///
/// Uses a partial Fisher-Yates shuffle. The result is in draw order.
///
/// # Panics
///
/// Panics if `k > n`.
pub fn sample_k_of_n(rng: &mut fastrand::Rng, k: usize, n: usize) -> Vec<usize> {
    assert!(k <= n, "cannot sample {k} distinct values from {n}");
    let mut pool: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.usize(i..n);
        pool.swap(i, j);
    }
    pool.truncate(k);
    pool
}
