//! End-to-end simulation tests: convergence, floor behavior, determinism,
//! and long-run liveness.
//!
//! These drive the full select → observe → update loop for thousands of
//! rounds and check the properties an operator actually relies on: money
//! flows toward the better strategy, the weak strategy stays funded near
//! the floor, and a seeded run is exactly reproducible.

use fairalloc::simulate::{run, SimConfig, TAIL_WINDOW};
use fairalloc::Allocator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Reference portfolio: high risk / stable / weak.
const TRUE_PROBS: [f64; 3] = [0.60, 0.55, 0.40];

#[test]
fn strong_arm_outearns_weak_arm_in_the_tail() {
    let report = run(&SimConfig {
        true_probs: TRUE_PROBS.to_vec(),
        min_allocation: 0.10,
        rounds: 2_000,
        seed: 42,
    })
    .unwrap();

    // After 1,800 warm-up rounds the posteriors are well separated: the
    // 60%-win arm must hold more of the book than the 40%-win arm over the
    // final window.
    assert!(report.rounds >= TAIL_WINDOW);
    assert!(
        report.tail_mean_allocation[0] > report.tail_mean_allocation[2],
        "tail allocations: {:?}",
        report.tail_mean_allocation
    );

    // The weak arm was funded at least once (no starvation).
    assert!(report.times_funded[2] > 0);
}

#[test]
fn weak_arm_hovers_near_the_floor() {
    let report = run(&SimConfig {
        true_probs: TRUE_PROBS.to_vec(),
        min_allocation: 0.10,
        rounds: 2_000,
        seed: 42,
    })
    .unwrap();

    // The single-pass projection lets entries dip under the floor by the
    // renormalization shrink. With 3 arms and floor 0.10 the worst case is
    // 0.10 / 1.20; allow that plus a little slack, never more.
    for arm in 0..3 {
        assert!(
            report.min_allocation_seen[arm] >= 0.10 - 0.02,
            "arm {} fell to {}",
            arm,
            report.min_allocation_seen[arm]
        );
    }
}

#[test]
fn seeded_runs_are_identical() {
    let cfg = SimConfig {
        true_probs: TRUE_PROBS.to_vec(),
        min_allocation: 0.10,
        rounds: 1_000,
        seed: 7,
    };
    let a = run(&cfg).unwrap();
    let b = run(&cfg).unwrap();
    assert_eq!(a, b);

    // A different seed takes a different path.
    let c = run(&SimConfig { seed: 8, ..cfg }).unwrap();
    assert_ne!(a.checkpoints, c.checkpoints);
}

#[test]
fn ten_thousand_rounds_never_error() {
    // Liveness: select followed by update on the returned arm, repeated,
    // must never fail for a validly constructed allocator.
    let mut allocator =
        Allocator::with_rng(4, 0.05, StdRng::seed_from_u64(1234)).unwrap();
    for round in 0..10_000 {
        let sel = allocator.select();
        let sum: f64 = sel.allocation.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        // Alternate outcome sign to exercise both counters.
        let reward = if round % 2 == 0 { 1.0 } else { -0.5 };
        allocator
            .update(sel.arm, reward)
            .expect("update on returned arm must succeed");
    }
    // 10,000 updates split across both counters, plus the 2-per-arm prior.
    let total: f64 = allocator.posterior().successes().iter().sum::<f64>()
        + allocator.posterior().failures().iter().sum::<f64>();
    assert!((total - (10_000.0 + 8.0)).abs() < 1e-9);
}

#[test]
fn snapshot_resumes_a_run_deterministically() {
    // Train an allocator, checkpoint it, and resume in a fresh instance
    // with the same RNG stream position: both must decide identically.
    let mut trained =
        Allocator::with_rng(3, 0.10, StdRng::seed_from_u64(99)).unwrap();
    let mut market = StdRng::seed_from_u64(5);
    for _ in 0..500 {
        let sel = trained.select();
        let won = market.gen::<f64>() < TRUE_PROBS[sel.arm];
        trained.update(sel.arm, if won { 1.0 } else { 0.0 }).unwrap();
    }
    let snap = trained.snapshot();

    let mut resumed =
        Allocator::with_rng(3, 0.10, StdRng::seed_from_u64(77)).unwrap();
    resumed.restore(&snap).unwrap();
    let mut replica =
        Allocator::with_rng(3, 0.10, StdRng::seed_from_u64(77)).unwrap();
    replica.restore(&snap).unwrap();

    for _ in 0..100 {
        let a = resumed.select();
        let b = replica.select();
        assert_eq!(a, b);
        resumed.update(a.arm, 1.0).unwrap();
        replica.update(b.arm, 1.0).unwrap();
    }
}
