//! Newton-Raphson iteration with randomized-restart divergence recovery.

use log::{debug, warn};

use crate::circuit::{StepContext, Topology};
use crate::components::Device;
use crate::error::{Result, SimError};

use super::matrix::MnaMatrix;
use super::stamp::stamp_all;
use super::{CONVERGENCE_TOLERANCE, MAX_ITERATIONS, MAX_RESTARTS, RESTART_AT_ITERATION};

/// A tiny xorshift PRNG, local to the solver so restart behavior needs no
/// external `rand` dependency and stays reproducible given a seed.
struct Xorshift(u64);

impl Xorshift {
    fn new(seed: u64) -> Self {
        Self(if seed == 0 { 0x9E3779B97F4A7C15 } else { seed })
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform sample in `[-5.0, 5.0]`.
    fn next_restart_value(&mut self) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        -5.0 + 10.0 * unit
    }
}

/// Drives the per-step Newton-Raphson loop for nonlinear circuits, with
/// randomized restarts when iteration stalls.
pub struct NewtonRaphson {
    rng: Xorshift,
    last_iterate: Vec<f64>,
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self::new()
    }
}

impl NewtonRaphson {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Construct with an explicit PRNG seed, for deterministic tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xorshift::new(seed),
            last_iterate: Vec::new(),
        }
    }

    /// Solve one time step. Returns the iteration count on success.
    pub fn solve(
        &mut self,
        topology: &Topology,
        devices: &mut [Device],
        ctx: &mut StepContext,
        matrix: &mut MnaMatrix,
    ) -> Result<usize> {
        let has_nonlinear = devices.iter().any(Device::is_nonlinear);
        if !has_nonlinear {
            matrix.clear();
            ctx.first_iter = true;
            stamp_all(topology, devices, ctx, matrix);
            matrix.solve(ctx.t)?;
            return Ok(1);
        }

        if self.last_iterate.len() != matrix.x.len() {
            self.last_iterate = matrix.x.clone();
        }

        let mut iter = 0usize;
        let mut restarts = 0usize;
        ctx.first_iter = true;

        loop {
            matrix.clear();
            stamp_all(topology, devices, ctx, matrix);
            matrix.solve(ctx.t)?;
            ctx.first_iter = false;
            iter += 1;

            let err_max = matrix
                .x
                .iter()
                .zip(self.last_iterate.iter())
                .fold(0.0f64, |acc, (a, b)| acc.max((a - b).abs()));
            self.last_iterate.copy_from_slice(&matrix.x);

            if err_max <= CONVERGENCE_TOLERANCE {
                if restarts > 0 {
                    warn!(
                        "t={:.6e}: converged in {} iterations after {} randomized restart(s)",
                        ctx.t, iter, restarts
                    );
                }
                return Ok(iter);
            }

            if iter > MAX_ITERATIONS {
                warn!(
                    "t={:.6e}: no convergence after {} iterations ({} restarts)",
                    ctx.t, iter, restarts
                );
                return Err(SimError::NoConvergence { t: ctx.t, restarts });
            }

            if iter > RESTART_AT_ITERATION && restarts < MAX_RESTARTS {
                restarts += 1;
                for x in matrix.x.iter_mut().skip(1) {
                    *x = self.rng.next_restart_value();
                }
                self.last_iterate.copy_from_slice(&matrix.x);
                debug!(
                    "t={:.6e}: randomizing iterate after {} iterations (restart {}/{})",
                    ctx.t, iter, restarts, MAX_RESTARTS
                );
                iter = 0;
                ctx.first_iter = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xorshift_samples_stay_within_range() {
        let mut rng = Xorshift::new(42);
        for _ in 0..100 {
            let v = rng.next_restart_value();
            assert!((-5.0..=5.0).contains(&v));
        }
    }
}
