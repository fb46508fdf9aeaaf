//! Sampling primitives shared by every generation stage.
//!
//! All of them take the run's random generator explicitly, so a seeded
//! [`rand::rngs::StdRng`] threaded through the stages in a fixed order makes the
//! whole run reproducible.

use crate::utils::error::{Result, SynthError};
use rand::Rng;
use rand_distr::{Dirichlet, Distribution, Normal, Poisson};

/// Upper bound for every resample-until-accepted loop.
pub const MAX_REJECTION_ATTEMPTS: usize = 100_000;

/// Standard deviation used when cohesion probabilities are drawn around their mean.
pub const COHESION_SD: f64 = 0.01;

/// Draws with `draw` until `accept` holds, giving up after `max_attempts`.
pub fn draw_until<R, T, D, A>(
    rng: &mut R,
    subject: &str,
    max_attempts: usize,
    mut draw: D,
    accept: A,
) -> Result<T>
where
    R: Rng + ?Sized,
    D: FnMut(&mut R) -> Result<T>,
    A: Fn(&T) -> bool,
{
    for _ in 0..max_attempts {
        let candidate = draw(rng)?;
        if accept(&candidate) {
            return Ok(candidate);
        }
    }
    Err(SynthError::SamplingExhausted {
        subject: subject.to_string(),
        attempts: max_attempts,
    })
}

/// Poisson(`lambda`) resampled until it is nonzero.
pub fn poisson_nonzero<R: Rng + ?Sized>(rng: &mut R, lambda: f64, subject: &str) -> Result<usize> {
    let poisson = Poisson::new(lambda)
        .map_err(|e| SynthError::distribution(format!("{} (lambda = {}): {}", subject, lambda, e)))?;
    draw_until(
        rng,
        subject,
        MAX_REJECTION_ATTEMPTS,
        |rng| {
            let n: f64 = poisson.sample(rng);
            Ok(n as usize)
        },
        |n| *n > 0,
    )
}

/// One draw of a symmetric Dirichlet(1, …, 1) over `n` categories.
pub fn symmetric_dirichlet<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Result<Vec<f64>> {
    match n {
        0 => Ok(Vec::new()),
        1 => Ok(vec![1.0]),
        _ => {
            let dirichlet = Dirichlet::new_with_size(1.0, n).map_err(SynthError::distribution)?;
            Ok(dirichlet.sample(rng))
        }
    }
}

pub fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, sd: f64) -> Result<f64> {
    let normal = Normal::new(mean, sd).map_err(SynthError::distribution)?;
    Ok(normal.sample(rng))
}

/// Removes up to `k` uniformly chosen items from `pool`, in the order they were picked.
pub fn take_random<R: Rng + ?Sized, T>(rng: &mut R, pool: &mut Vec<T>, k: usize) -> Vec<T> {
    let mut taken = Vec::with_capacity(k.min(pool.len()));
    while taken.len() < k && !pool.is_empty() {
        let idx = rng.gen_range(0..pool.len());
        taken.push(pool.remove(idx));
    }
    taken
}
