//! Fairness-constrained Thompson-sampling allocator.
//!
//! Each round: draw one theta per arm from its Beta posterior, convert the
//! draws into a probability-simplex allocation, clamp every entry to the
//! fairness floor, renormalize, and fund one arm drawn categorically from
//! the final weights. The floor keeps unlucky strategies alive long enough
//! to prove themselves instead of starving on an early losing streak.
//!
//! ## Known subtlety
//!
//! The floor projection is single-pass: clamp, then renormalize once. When
//! any arm needed clamping, the renormalizing sum exceeds 1 and shrinks
//! every entry — including ones sitting exactly at the floor — so the final
//! vector can dip below `min_allocation` by the redistribution excess. An
//! exact guarantee would need an iterative water-filling projection; this
//! module deliberately keeps the single-pass behavior (see DESIGN.md), and
//! tests pin the approximate outcome rather than an idealized one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Distribution};
use tracing::trace;

use crate::error::AllocError;
use crate::posterior::{PosteriorSnapshot, PosteriorStore};

/// One round's decision: the funded arm and the full allocation vector.
///
/// The allocation is ephemeral — recomputed from posterior state plus fresh
/// randomness every round, never a source of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub arm: usize,
    pub allocation: Vec<f64>,
}

/// Thompson-sampling allocator with a per-arm minimum allocation share.
///
/// Owns its posterior and its RNG, so independent instances never interfere.
/// Pure synchronous computation with no I/O; callers sharing one instance
/// across threads must wrap it in their own lock (a `select` overlapping an
/// `update` on the same arm could read a half-applied statistic pair).
#[derive(Debug)]
pub struct Allocator<R: Rng = StdRng> {
    n_arms: usize,
    min_allocation: f64,
    posterior: PosteriorStore,
    rng: R,
}

impl Allocator<StdRng> {
    /// Build an allocator with an entropy-seeded RNG.
    pub fn new(n_arms: usize, min_allocation: f64) -> Result<Self, AllocError> {
        Self::with_rng(n_arms, min_allocation, StdRng::from_entropy())
    }
}

impl<R: Rng> Allocator<R> {
    /// Build an allocator around an injected RNG.
    ///
    /// Two instances given identically seeded RNGs and an identical call
    /// sequence produce identical `(arm, allocation)` sequences.
    pub fn with_rng(n_arms: usize, min_allocation: f64, rng: R) -> Result<Self, AllocError> {
        if n_arms < 1 {
            return Err(AllocError::InvalidArmCount(n_arms));
        }
        if !(0.0..1.0).contains(&min_allocation) {
            return Err(AllocError::InvalidFloor(min_allocation));
        }
        if min_allocation * n_arms as f64 > 1.0 {
            return Err(AllocError::InfeasibleFloor {
                min_allocation,
                n_arms,
            });
        }
        Ok(Self {
            n_arms,
            min_allocation,
            posterior: PosteriorStore::new(n_arms),
            rng,
        })
    }

    pub fn n_arms(&self) -> usize {
        self.n_arms
    }

    pub fn min_allocation(&self) -> f64 {
        self.min_allocation
    }

    pub fn posterior(&self) -> &PosteriorStore {
        &self.posterior
    }

    /// Decide this round's allocation and fund one arm.
    ///
    /// Never fails under a valid configuration: a numerically degenerate
    /// theta sum (all draws zero) falls back to a uniform allocation instead
    /// of dividing by zero.
    pub fn select(&mut self) -> Selection {
        let theta = self.sample_thetas();

        let total: f64 = theta.iter().sum();
        let raw: Vec<f64> = if total > 0.0 && total.is_finite() {
            theta.iter().map(|t| t / total).collect()
        } else {
            vec![1.0 / self.n_arms as f64; self.n_arms]
        };

        let allocation = floor_and_renormalize(raw, self.min_allocation);
        let arm = self.draw_categorical(&allocation);
        trace!(arm, weight = allocation[arm], "funded arm");
        Selection { arm, allocation }
    }

    /// Fold one observed outcome into the chosen arm's posterior.
    ///
    /// The reward is binarized at zero: any strictly positive value counts
    /// as a full success, zero or negative as a full failure; magnitude is
    /// discarded. Not idempotent — call exactly once per observed round.
    pub fn update(&mut self, arm: usize, reward: f64) -> Result<(), AllocError> {
        if arm >= self.n_arms {
            return Err(AllocError::ArmOutOfRange {
                arm,
                n_arms: self.n_arms,
            });
        }
        if reward > 0.0 {
            self.posterior.record_success(arm);
        } else {
            self.posterior.record_failure(arm);
        }
        trace!(arm, reward, mean = self.posterior.mean(arm), "posterior updated");
        Ok(())
    }

    /// Checkpoint the posterior statistics.
    pub fn snapshot(&self) -> PosteriorSnapshot {
        self.posterior.snapshot()
    }

    /// Resume from a checkpoint taken by an allocator with the same arm count.
    pub fn restore(&mut self, snapshot: &PosteriorSnapshot) -> Result<(), AllocError> {
        self.posterior.restore(snapshot)
    }

    fn sample_thetas(&mut self) -> Vec<f64> {
        let mut theta = Vec::with_capacity(self.n_arms);
        for arm in 0..self.n_arms {
            let a = self.posterior.successes()[arm];
            let b = self.posterior.failures()[arm];
            let draw = match Beta::new(a, b) {
                Ok(dist) => dist.sample(&mut self.rng),
                // Counts are kept >= 1, so this is unreachable in practice;
                // fall back to the posterior mean rather than panic.
                Err(_) => a / (a + b),
            };
            theta.push(draw);
        }
        theta
    }

    /// Inverse-CDF draw over a vector that sums to 1 within tolerance.
    fn draw_categorical(&mut self, weights: &[f64]) -> usize {
        let u: f64 = self.rng.gen();
        let mut acc = 0.0;
        for (arm, w) in weights.iter().enumerate() {
            acc += w;
            if u < acc {
                return arm;
            }
        }
        // Floating slack can leave acc a hair under 1; the tail mass
        // belongs to the last arm.
        weights.len() - 1
    }
}

/// Single-pass fairness projection: clamp every entry up to `floor`, then
/// renormalize back onto the simplex.
///
/// With `floor = 0` this is a no-op on an already-normalized input (pure
/// Thompson sampling). See the module docs for why the result can sit
/// slightly below the floor after renormalization.
fn floor_and_renormalize(raw: Vec<f64>, floor: f64) -> Vec<f64> {
    let mut weights: Vec<f64> = raw.into_iter().map(|w| w.max(floor)).collect();
    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    weights
}
