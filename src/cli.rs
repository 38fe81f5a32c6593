//! Command-line entry point: parses arguments, generates an instance,
//! runs the solver, and reports makespan to stdout.
//!
//! # Reference
//! Flag-struct shape grounded on the `#[derive(Parser)]` CLI in
//! `scheduling-malleable-tasks`'s `main.rs`.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use rand::SeedableRng;

use crate::ga::GaConfig;
use crate::instance_gen::generate_instance;
use crate::orchestrator::{self, OrchestratorConfig};

/// Job-shop scheduling: GRASP construction plus a parallel island-model
/// genetic algorithm.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Number of jobs in the generated instance.
    #[arg(long, default_value_t = 10)]
    pub num_jobs: u32,

    /// Number of machines (each job visits every machine exactly once,
    /// in a random order).
    #[arg(long, default_value_t = 10)]
    pub num_machines: u32,

    /// GA worker thread count.
    #[arg(long, default_value_t = 4)]
    pub num_threads: usize,

    /// Search wall-clock budget, in seconds.
    #[arg(long, default_value_t = 10)]
    pub time_limit: u64,

    /// Seeds every worker's RNG deterministically from this root value.
    /// Omit to seed from OS entropy.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Runs the CLI: validates arguments, generates an instance, solves it,
/// and prints the initial/final makespan. Returns a non-zero exit code
/// on any argument error or algorithm-invariant violation; neither
/// should happen for valid input.
pub fn run(args: Args) -> ExitCode {
    if args.num_jobs == 0 || args.num_machines == 0 {
        eprintln!("error: --num-jobs and --num-machines must both be at least 1");
        return ExitCode::FAILURE;
    }
    if args.num_threads == 0 {
        eprintln!("error: --num-threads must be at least 1");
        return ExitCode::FAILURE;
    }

    let mut gen_rng = match args.seed {
        Some(seed) => rand::rngs::SmallRng::seed_from_u64(seed),
        None => rand::rngs::SmallRng::from_os_rng(),
    };
    let instance = generate_instance(args.num_jobs, args.num_machines, &mut gen_rng);

    let config = OrchestratorConfig {
        num_threads: args.num_threads,
        time_limit: Duration::from_secs(args.time_limit),
        seed: args.seed,
        ga: GaConfig::default(),
    };

    match orchestrator::solve(&instance, config) {
        Ok(report) => {
            println!("initial best makespan: {}", report.seed.makespan());
            println!("final best makespan: {}", report.best.makespan());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
