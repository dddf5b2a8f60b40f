//! Beta-Bernoulli posterior store.
//!
//! Per arm, the two sufficient statistics of a Beta-Bernoulli conjugate
//! model: a success count and a failure count, both seeded at 1.0 (uniform
//! Beta(1, 1) prior) so every arm starts with positive allocation
//! probability before any evidence exists.
//!
//! Both counts are monotonically non-decreasing for the life of the store;
//! each observed outcome increments exactly one of them by exactly 1.

use serde::{Deserialize, Serialize};

use crate::error::AllocError;

/// Per-arm success/failure counts. Owned exclusively by one allocator
/// instance; no internal locking.
#[derive(Debug, Clone)]
pub struct PosteriorStore {
    successes: Vec<f64>,
    failures: Vec<f64>,
}

/// Raw posterior statistics in arm-index order.
///
/// Serializable so an embedding system can checkpoint and resume across
/// restarts; the core itself never touches disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorSnapshot {
    pub successes: Vec<f64>,
    pub failures: Vec<f64>,
}

impl PosteriorStore {
    pub fn new(n_arms: usize) -> Self {
        Self {
            successes: vec![1.0; n_arms],
            failures: vec![1.0; n_arms],
        }
    }

    pub fn n_arms(&self) -> usize {
        self.successes.len()
    }

    pub fn successes(&self) -> &[f64] {
        &self.successes
    }

    pub fn failures(&self) -> &[f64] {
        &self.failures
    }

    /// Posterior mean win rate for one arm. Deterministic (no sampling);
    /// use for display and logging, not for selection.
    ///
    /// Panics if `arm >= n_arms()`; callers reaching this through the
    /// allocator have already validated the index.
    pub fn mean(&self, arm: usize) -> f64 {
        let a = self.successes[arm];
        let b = self.failures[arm];
        a / (a + b)
    }

    pub(crate) fn record_success(&mut self, arm: usize) {
        self.successes[arm] += 1.0;
    }

    pub(crate) fn record_failure(&mut self, arm: usize) {
        self.failures[arm] += 1.0;
    }

    pub fn snapshot(&self) -> PosteriorSnapshot {
        PosteriorSnapshot {
            successes: self.successes.clone(),
            failures: self.failures.clone(),
        }
    }

    /// Replace the statistics with a previously taken snapshot.
    ///
    /// Validates shape and the `>= 1` lower bound before touching any state,
    /// so a rejected snapshot leaves the store as it was.
    pub fn restore(&mut self, snapshot: &PosteriorSnapshot) -> Result<(), AllocError> {
        let n = self.n_arms();
        if snapshot.successes.len() != n || snapshot.failures.len() != n {
            let got = if snapshot.successes.len() != n {
                snapshot.successes.len()
            } else {
                snapshot.failures.len()
            };
            return Err(AllocError::SnapshotShape { got, expected: n });
        }
        for (field, values) in [
            ("successes", &snapshot.successes),
            ("failures", &snapshot.failures),
        ] {
            for (arm, &value) in values.iter().enumerate() {
                if !value.is_finite() || value < 1.0 {
                    return Err(AllocError::SnapshotValue { field, arm, value });
                }
            }
        }
        self.successes.clone_from(&snapshot.successes);
        self.failures.clone_from(&snapshot.failures);
        Ok(())
    }
}
