//! Simulated-market harness for exercising the allocator.
//!
//! Mirrors the production loop: each round the allocator funds one strategy,
//! the market returns a Bernoulli win/loss against that strategy's true win
//! probability, and the outcome is folded back into the posterior. Two RNG
//! streams are used — one inside the allocator, one for the market — both
//! derived from the configured seed so a run is fully reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::allocator::Allocator;
use crate::error::AllocError;

/// Rounds at the end of a run over which tail statistics are averaged.
pub const TAIL_WINDOW: usize = 200;

/// How often a full allocation vector is recorded for reporting.
const CHECKPOINT_EVERY: usize = 50;

#[derive(Debug, Clone)]
pub struct SimConfig {
    /// True (hidden) win probability per strategy.
    pub true_probs: Vec<f64>,
    pub min_allocation: f64,
    pub rounds: usize,
    pub seed: u64,
}

/// Allocation vector captured at a fixed round, for plotting/inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checkpoint {
    pub round: usize,
    pub allocation: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    pub rounds: usize,
    /// Total winning rounds across the whole run.
    pub wins: u64,
    /// Times each arm was funded.
    pub times_funded: Vec<u64>,
    /// Mean allocation per arm over every round.
    pub mean_allocation: Vec<f64>,
    /// Mean allocation per arm over the final `TAIL_WINDOW` rounds.
    pub tail_mean_allocation: Vec<f64>,
    /// Lowest allocation each arm ever received. Under the single-pass floor
    /// projection this can dip slightly below the configured floor.
    pub min_allocation_seen: Vec<f64>,
    /// Posterior mean win rate per arm at the end of the run.
    pub posterior_mean: Vec<f64>,
    pub checkpoints: Vec<Checkpoint>,
}

/// Run one seeded simulation to completion.
pub fn run(cfg: &SimConfig) -> Result<SimReport, AllocError> {
    let n_arms = cfg.true_probs.len();
    let mut allocator = Allocator::with_rng(
        n_arms,
        cfg.min_allocation,
        StdRng::seed_from_u64(cfg.seed),
    )?;
    // Separate stream so market noise never perturbs the allocator's draws.
    let mut market = StdRng::seed_from_u64(cfg.seed.wrapping_add(0x9e37_79b9_7f4a_7c15));

    let mut wins = 0u64;
    let mut times_funded = vec![0u64; n_arms];
    let mut alloc_sum = vec![0.0f64; n_arms];
    let mut tail_sum = vec![0.0f64; n_arms];
    let mut min_seen = vec![f64::INFINITY; n_arms];
    let mut checkpoints = Vec::new();

    let tail_start = cfg.rounds.saturating_sub(TAIL_WINDOW);
    for round in 0..cfg.rounds {
        let sel = allocator.select();

        for (arm, &w) in sel.allocation.iter().enumerate() {
            alloc_sum[arm] += w;
            if round >= tail_start {
                tail_sum[arm] += w;
            }
            if w < min_seen[arm] {
                min_seen[arm] = w;
            }
        }
        if round % CHECKPOINT_EVERY == 0 {
            checkpoints.push(Checkpoint {
                round,
                allocation: sel.allocation.clone(),
            });
        }

        let won = market.gen::<f64>() < cfg.true_probs[sel.arm];
        if won {
            wins += 1;
        }
        times_funded[sel.arm] += 1;
        allocator.update(sel.arm, if won { 1.0 } else { 0.0 })?;
    }

    let tail_len = cfg.rounds.min(TAIL_WINDOW).max(1) as f64;
    let rounds_len = cfg.rounds.max(1) as f64;
    Ok(SimReport {
        rounds: cfg.rounds,
        wins,
        times_funded,
        mean_allocation: alloc_sum.iter().map(|s| s / rounds_len).collect(),
        tail_mean_allocation: tail_sum.iter().map(|s| s / tail_len).collect(),
        min_allocation_seen: min_seen,
        posterior_mean: (0..n_arms).map(|arm| allocator.posterior().mean(arm)).collect(),
        checkpoints,
    })
}
