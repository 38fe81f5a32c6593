//! End-to-end boundary behaviours and the parallel-search scenario that
//! don't fit naturally inside a single module's unit tests.
//!
//! Scenarios 1-5 (trivial decode, two-jobs-one-machine, the classic 3x3,
//! crossover closure, mutation improvement) are covered where they're
//! grounded: `src/ga/chromosome.rs` and `src/ga/operators.rs`. This file
//! covers the remaining boundary behaviours and scenario 6 (parallel
//! monotonicity), run at a size and time budget that keeps the suite fast.

use std::time::Duration;

use jssp_ga::constructor;
use jssp_ga::ga::GaConfig;
use jssp_ga::instance::InstanceBuilder;
use jssp_ga::instance_gen::generate_instance;
use jssp_ga::orchestrator::{self, OrchestratorConfig};

use rand::rngs::SmallRng;
use rand::SeedableRng;

#[test]
fn n_jobs_one_machine_makespan_is_the_duration_sum() {
    let mut builder = InstanceBuilder::new().add_machine(0);
    let durations = [4, 2, 7, 3];
    for (job_id, &duration) in durations.iter().enumerate() {
        builder = builder
            .add_job(job_id as u32, 100)
            .add_step(job_id as u32, 0, 0, duration);
    }
    let instance = builder.build().unwrap();

    let mut rng = SmallRng::seed_from_u64(0);
    let solution = constructor::construct(&instance, &mut rng).unwrap();
    assert_eq!(solution.makespan(), durations.iter().sum::<u32>());
}

#[test]
fn one_job_many_machines_makespan_is_purely_sequential() {
    let durations = [5, 2, 8, 1, 4];
    let mut builder = InstanceBuilder::new();
    for machine_id in 0..durations.len() as u32 {
        builder = builder.add_machine(machine_id);
    }
    builder = builder.add_job(0, 100);
    for (step_id, &duration) in durations.iter().enumerate() {
        builder = builder.add_step(0, step_id as u32, step_id as u32, duration);
    }
    let instance = builder.build().unwrap();

    let mut rng = SmallRng::seed_from_u64(0);
    let solution = constructor::construct(&instance, &mut rng).unwrap();
    assert_eq!(solution.makespan(), durations.iter().sum::<u32>());
}

#[test]
fn parallel_search_never_worsens_the_constructed_seed() {
    let mut gen_rng = SmallRng::seed_from_u64(2024);
    let instance = generate_instance(6, 6, &mut gen_rng);

    let mut construction_rng = SmallRng::seed_from_u64(2024);
    let seed_solution = constructor::construct(&instance, &mut construction_rng).unwrap();
    let seed_makespan = seed_solution.makespan();

    let config = OrchestratorConfig {
        num_threads: 4,
        time_limit: Duration::from_secs(1),
        seed: Some(2024),
        ga: GaConfig {
            population_size: 40,
            ..GaConfig::default()
        },
    };
    let report = orchestrator::solve(&instance, config).unwrap();

    assert!(report.best.makespan() <= seed_makespan);
    assert!(report.best.is_feasible(&instance));
}
