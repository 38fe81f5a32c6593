//! Ties the constructor and the GA engine together: build a seed
//! solution, run the island-model search for a fixed wall-clock budget,
//! return both the seed and the best solution found.
//!
//! # Reference
//! Grounded on `run.hpp`'s `run_job_shop_scheduling` entry point, which
//! does the same construct-then-search-then-return sequence.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::constructor;
use crate::error::ConstructorError;
use crate::ga::{run_islands, GaConfig};
use crate::instance::Instance;
use crate::solution::Solution;

/// Parameters for one end-to-end solve.
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    pub num_threads: usize,
    pub time_limit: Duration,
    pub seed: Option<u64>,
    pub ga: GaConfig,
}

/// The outcome of one end-to-end solve: the GRASP-constructed seed
/// solution (before any GA search) and the best solution found by the
/// time the search stopped. Callers that only need the final answer can
/// read `.best`; the CLI reports both, per the "initial and final best
/// makespan" stdout contract.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub seed: Solution,
    pub best: Solution,
}

/// Builds an initial feasible solution via GRASP, then runs
/// `config.num_threads` GA workers against it for `config.time_limit`,
/// and returns both the seed solution and the best solution any worker
/// found.
pub fn solve(instance: &Instance, config: OrchestratorConfig) -> Result<SolveReport, ConstructorError> {
    let mut construction_rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let seed_solution = constructor::construct(instance, &mut construction_rng)?;
    log::info!(
        "constructed seed solution: makespan {} ({} tasks)",
        seed_solution.makespan(),
        seed_solution.task_count()
    );

    let best = run_islands(
        instance,
        seed_solution.clone(),
        config.num_threads,
        config.time_limit,
        config.seed,
        config.ga,
    );
    log::info!("final best makespan: {}", best.makespan());
    Ok(SolveReport { seed: seed_solution, best })
}
