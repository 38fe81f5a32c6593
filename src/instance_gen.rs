//! Random instance generation, used by the CLI and by tests that need
//! an instance larger than is practical to write out by hand.
//!
//! # Distribution
//! `num_jobs` jobs each visit every one of `num_machines` machines
//! exactly once, in an independently shuffled per-job order. Step
//! duration is uniform on `[3, 10]`; due date is uniform on
//! `[num_jobs * num_machines, num_jobs * num_machines + 50]`.
//!
//! # Reference
//! Grounded on `JobShopInstance::generate_instance` in the original
//! `jobShopInstance.cpp`.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::instance::{Instance, InstanceBuilder, JobId, MachineId};

const MIN_STEP_DURATION: u32 = 3;
const MAX_STEP_DURATION: u32 = 10;
const DUE_DATE_SLACK: u32 = 50;

/// Generates a random instance with `num_jobs` jobs and `num_machines`
/// machines. Panics if either is 0, since [`InstanceBuilder::build`]
/// would reject the result anyway (`NoJobs`/`NoMachines`) and a caller
/// asking for zero of either is a programmer error, not recoverable
/// input.
pub fn generate_instance<R: Rng>(num_jobs: u32, num_machines: u32, rng: &mut R) -> Instance {
    assert!(num_jobs > 0, "generate_instance requires at least one job");
    assert!(num_machines > 0, "generate_instance requires at least one machine");

    let mut builder = InstanceBuilder::new();
    for machine_id in 0..num_machines {
        builder = builder.add_machine(machine_id);
    }

    let due_date_lb = num_jobs * num_machines;
    let due_date_ub = due_date_lb + DUE_DATE_SLACK;

    let mut machine_order: Vec<MachineId> = (0..num_machines).collect();
    for job_id in 0..num_jobs as JobId {
        let due_date = rng.random_range(due_date_lb..=due_date_ub);
        builder = builder.add_job(job_id, due_date);

        machine_order.shuffle(rng);
        for (step_id, &machine_id) in machine_order.iter().enumerate() {
            let duration = rng.random_range(MIN_STEP_DURATION..=MAX_STEP_DURATION);
            builder = builder.add_step(job_id, step_id as u32, machine_id, duration);
        }
    }

    builder
        .build()
        .expect("generated instance is complete and self-consistent by construction")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn generates_the_requested_shape() {
        let mut rng = SmallRng::seed_from_u64(1);
        let instance = generate_instance(5, 4, &mut rng);
        assert_eq!(instance.job_count(), 5);
        assert_eq!(instance.machine_count(), 4);
        assert_eq!(instance.total_steps(), 20);
        for job in instance.jobs() {
            assert_eq!(job.step_count(), 4);
        }
    }

    #[test]
    fn every_job_visits_every_machine_exactly_once() {
        let mut rng = SmallRng::seed_from_u64(2);
        let instance = generate_instance(6, 5, &mut rng);
        for job in instance.jobs() {
            let mut machines: Vec<MachineId> = job.steps().map(|s| s.machine_id).collect();
            machines.sort_unstable();
            assert_eq!(machines, vec![0, 1, 2, 3, 4]);
        }
    }

    #[test]
    fn durations_and_due_dates_stay_within_the_documented_range() {
        let mut rng = SmallRng::seed_from_u64(3);
        let num_jobs = 4;
        let num_machines = 3;
        let instance = generate_instance(num_jobs, num_machines, &mut rng);
        let lb = num_jobs * num_machines;
        for job in instance.jobs() {
            assert!(job.due_date >= lb && job.due_date <= lb + DUE_DATE_SLACK);
            for step in job.steps() {
                assert!(step.duration >= MIN_STEP_DURATION && step.duration <= MAX_STEP_DURATION);
            }
        }
    }

    #[test]
    fn is_reproducible_under_a_fixed_seed() {
        let mut rng1 = SmallRng::seed_from_u64(42);
        let mut rng2 = SmallRng::seed_from_u64(42);
        let a = generate_instance(8, 8, &mut rng1);
        let b = generate_instance(8, 8, &mut rng2);
        assert_eq!(a.total_steps(), b.total_steps());
        for (job_a, job_b) in a.jobs().zip(b.jobs()) {
            assert_eq!(job_a.due_date, job_b.due_date);
            for (step_a, step_b) in job_a.steps().zip(job_b.steps()) {
                assert_eq!(step_a.machine_id, step_b.machine_id);
                assert_eq!(step_a.duration, step_b.duration);
            }
        }
    }
}
