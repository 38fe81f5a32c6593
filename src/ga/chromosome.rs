//! Operation-based chromosome: encode/decode between `Solution` and
//! `Chromosome`, plus the frugal decoder used in the GA's inner loop.
//!
//! # Encoding
//! A chromosome is a permutation of job ids, length `Σ|steps(job)|`, where
//! each job id appears exactly as many times as the job has steps. The
//! k-th occurrence of job `j` decodes to step `k` of job `j` (0-indexed).
//! This is closed under arbitrary permutation: every permutation
//! satisfying the multiplicity constraint decodes to a feasible schedule.
//!
//! # Reference
//! Grounded on `GAAlgorithm::encode`/`GAAlgorithm::decode` in the original
//! `algorithm.cpp`.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::instance::{Instance, JobId, StepId};
use crate::solution::{Solution, StepTask};

/// A permutation-with-repetition chromosome: a sequence of job ids.
pub type Chromosome = Vec<JobId>;

/// A chromosome paired with its fitness (lower is better).
///
/// `fitness` is the makespan of `decode(chromosome, instance)`.
#[derive(Debug, Clone)]
pub struct Individual {
    pub chromosome: Chromosome,
    pub fitness: u32,
}

impl Individual {
    /// Evaluates a chromosome's fitness via a fresh decode.
    pub fn evaluate(chromosome: Chromosome, instance: &Instance) -> Self {
        let fitness = decode(&chromosome, instance).makespan();
        Self { chromosome, fitness }
    }
}

/// Encodes a feasible `Solution` into a chromosome.
///
/// Collects all step-tasks, sorts ascending by `start_time` (ties broken
/// by `(job_id, step_id)` for determinism — this crate's resolution of
/// the source's "ties broken by map iteration order" ambiguity), and
/// emits each task's `job_id` in that order.
pub fn encode_from_solution(solution: &Solution) -> Chromosome {
    let mut tasks: Vec<&StepTask> = solution.step_tasks().collect();
    tasks.sort_by_key(|t| (t.start_time, t.job_id, t.step_id));
    tasks.iter().map(|t| t.job_id).collect()
}

/// Builds a random chromosome directly from an instance: each job id
/// repeated once per step, then uniformly shuffled.
pub fn encode_random<R: Rng>(instance: &Instance, rng: &mut R) -> Chromosome {
    let mut chromosome = Vec::with_capacity(instance.total_steps());
    for job in instance.jobs() {
        chromosome.extend(std::iter::repeat(job.job_id).take(job.step_count()));
    }
    chromosome.shuffle(rng);
    chromosome
}

/// Scratch buffers reused across decode calls so the GA's inner loop
/// doesn't allocate a map on every fitness evaluation.
///
/// Sized once from an instance's job/machine id range; safe to reuse
/// across any chromosome decoded against that same instance.
pub struct Decoder {
    machine_end: Vec<u32>,
    job_end: Vec<u32>,
    next_step: Vec<StepId>,
}

impl Decoder {
    /// Allocates scratch buffers sized for `instance`.
    pub fn new(instance: &Instance) -> Self {
        let machines = instance.max_machine_id().map(|m| m as usize + 1).unwrap_or(0);
        let jobs = instance.max_job_id().map(|j| j as usize + 1).unwrap_or(0);
        Self {
            machine_end: vec![0; machines],
            job_end: vec![0; jobs],
            next_step: vec![0; jobs],
        }
    }

    /// Decodes `chromosome` into a `Solution`, reusing this decoder's
    /// scratch buffers. `instance` must be the same instance (or one with
    /// an equal or smaller id range) the decoder was created for.
    pub fn decode_into(&mut self, chromosome: &[JobId], instance: &Instance) -> Solution {
        self.machine_end.iter_mut().for_each(|v| *v = 0);
        self.job_end.iter_mut().for_each(|v| *v = 0);
        self.next_step.iter_mut().for_each(|v| *v = 0);

        let mut solution = Solution::new();
        for &job_id in chromosome {
            let step_id = self.next_step[job_id as usize];
            let step = instance
                .step(job_id, step_id)
                .expect("chromosome references a step the instance does not have");

            let machine_idx = step.machine_id as usize;
            let job_idx = job_id as usize;
            let start = self.machine_end[machine_idx].max(self.job_end[job_idx]);
            let task = StepTask::new(step.machine_id, step.duration, start, job_id, step_id);

            self.machine_end[machine_idx] = task.end_time;
            self.job_end[job_idx] = task.end_time;
            self.next_step[job_idx] = step_id + 1;

            solution.push_step_task(task);
        }
        solution
    }
}

/// Decodes a chromosome into a `Solution` from scratch (no reused
/// buffers). Convenience wrapper around [`Decoder`] for call sites that
/// decode only once (tests, the constructor's seed encoding, etc).
///
/// This is a semi-active schedule: no machine is ever left idle if a
/// ready operation (per the chromosome's order) could occupy it.
pub fn decode(chromosome: &[JobId], instance: &Instance) -> Solution {
    Decoder::new(instance).decode_into(chromosome, instance)
}

/// Checks that a chromosome satisfies the multiplicity invariant: each
/// job id appears exactly `|steps(job)|` times.
pub fn is_valid_chromosome(chromosome: &[JobId], instance: &Instance) -> bool {
    let mut counts = vec![0u32; instance.max_job_id().map(|j| j as usize + 1).unwrap_or(0)];
    for &job_id in chromosome {
        match counts.get_mut(job_id as usize) {
            Some(c) => *c += 1,
            None => return false,
        }
    }
    instance
        .jobs()
        .all(|job| counts[job.job_id as usize] as usize == job.step_count())
}
