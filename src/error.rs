//! Error taxonomy for the allocator.
//!
//! Two classes: configuration errors raised only at construction (fatal to
//! that construction attempt), and per-call argument errors (the allocator's
//! state is left untouched). Numerical degeneracy inside `select` is handled
//! by internal fallback and never surfaces here.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocError {
    /// An allocator needs at least one arm.
    #[error("invalid arm count {0}: need at least one arm")]
    InvalidArmCount(usize),

    /// The fairness floor must lie in `[0, 1)`.
    #[error("invalid min_allocation {0}: must be in [0, 1)")]
    InvalidFloor(f64),

    /// Even nominally, the floor cannot be met: `min_allocation * n_arms > 1`.
    #[error("infeasible floor: min_allocation {min_allocation} with {n_arms} arms exceeds the simplex")]
    InfeasibleFloor { min_allocation: f64, n_arms: usize },

    /// Arm index outside `[0, n_arms)`.
    #[error("arm {arm} out of range: allocator has {n_arms} arms")]
    ArmOutOfRange { arm: usize, n_arms: usize },

    /// Snapshot arrays do not match the allocator's arm count.
    #[error("snapshot holds {got} arms, allocator has {expected}")]
    SnapshotShape { got: usize, expected: usize },

    /// Snapshot statistic below the Beta(1, 1) prior or non-finite.
    #[error("snapshot {field}[{arm}] = {value}: statistics must be finite and >= 1")]
    SnapshotValue {
        field: &'static str,
        arm: usize,
        value: f64,
    },
}
