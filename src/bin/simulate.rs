//! Seeded market simulation: three strategies, one fairness-floored bandit.
//!
//! Demonstrates the allocator converging on the strongest strategy while the
//! floor keeps the weakest one funded. Configure via env vars:
//! ROUNDS, MIN_ALLOCATION, SEED, TRUE_PROBS (comma-separated).

use anyhow::{Context, Result};
use fairalloc::simulate::{run, SimConfig};
use tracing_subscriber::EnvFilter;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn true_probs_from_env() -> Result<Vec<f64>> {
    match std::env::var("TRUE_PROBS") {
        Ok(raw) => raw
            .split(',')
            .map(|p| p.trim().parse::<f64>().context("bad TRUE_PROBS entry"))
            .collect(),
        // High risk / stable / weak, as in the reference portfolio.
        Err(_) => Ok(vec![0.60, 0.55, 0.40]),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = SimConfig {
        true_probs: true_probs_from_env()?,
        min_allocation: env_or("MIN_ALLOCATION", 0.10),
        rounds: env_or("ROUNDS", 1000),
        seed: env_or("SEED", 42),
    };

    println!(
        "simulating {} rounds, {} arms, floor {:.0}%, seed {}",
        cfg.rounds,
        cfg.true_probs.len(),
        cfg.min_allocation * 100.0,
        cfg.seed
    );

    let report = run(&cfg)?;

    println!("\nallocation evolution (every checkpoint):");
    for cp in &report.checkpoints {
        let cols: Vec<String> = cp.allocation.iter().map(|w| format!("{:.3}", w)).collect();
        println!("  round {:>5}  [{}]", cp.round, cols.join(", "));
    }

    println!("\nper-arm summary:");
    for arm in 0..cfg.true_probs.len() {
        println!(
            "  arm {}: true p={:.2}  posterior mean={:.3}  funded {:>4}x  \
             mean alloc={:.3}  tail alloc={:.3}  min alloc={:.3}",
            arm,
            cfg.true_probs[arm],
            report.posterior_mean[arm],
            report.times_funded[arm],
            report.mean_allocation[arm],
            report.tail_mean_allocation[arm],
            report.min_allocation_seen[arm],
        );
    }
    println!(
        "\ntotal wins: {}/{} ({:.1}%)",
        report.wins,
        report.rounds,
        100.0 * report.wins as f64 / report.rounds.max(1) as f64
    );

    println!("\n{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
