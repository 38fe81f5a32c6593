//! Instance model: the immutable description of jobs, machines, and steps.
//!
//! An `Instance` is built once via [`InstanceBuilder`], validated, and then
//! shared read-only across the GRASP constructor and every GA worker thread.
//!
//! # Reference
//! Grounded on `jobShopInstance.hpp`/`jobShopInstance.cpp` in the original
//! C++ implementation this crate's algorithms are modeled on.

use std::collections::BTreeMap;

use crate::error::InstanceError;

/// Identifies a job within an instance.
pub type JobId = u32;
/// Identifies a step within a job (0-indexed, contiguous).
pub type StepId = u32;
/// Identifies a machine within an instance.
pub type MachineId = u32;
/// A processing duration or point in time, in the instance's shared time unit.
pub type TimeUnit = u32;
/// Uniquely identifies a step-task across the whole instance.
pub type TaskId = (JobId, StepId);

/// One machine-bound unit of work belonging to a job.
///
/// Steps of a job are totally ordered by `step_id` starting at 0 with no
/// gaps; `step_id` is the job's own operation sequence, not a global index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub job_id: JobId,
    pub step_id: StepId,
    pub machine_id: MachineId,
    pub duration: TimeUnit,
}

/// A job: a totally ordered sequence of steps plus a due date.
///
/// `due_date` is carried for future objectives; the core algorithms in
/// this crate minimise makespan only and never read it.
#[derive(Debug, Clone)]
pub struct Job {
    pub job_id: JobId,
    pub due_date: TimeUnit,
    steps: BTreeMap<StepId, Step>,
}

impl Job {
    /// Number of steps in this job.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Looks up a step by id.
    pub fn step(&self, step_id: StepId) -> Option<&Step> {
        self.steps.get(&step_id)
    }

    /// Iterates steps in ascending `step_id` order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.values()
    }
}

/// A machine: exclusive-use resource identified only by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Machine {
    pub machine_id: MachineId,
}

/// Immutable, validated description of a job-shop scheduling problem.
///
/// Built once through [`InstanceBuilder`], then shared read-only by the
/// GRASP constructor and every GA worker. Iteration over jobs and machines
/// is always in ascending id order, which is what makes `decode` of a
/// fixed chromosome reproducible.
#[derive(Debug, Clone)]
pub struct Instance {
    jobs: BTreeMap<JobId, Job>,
    machines: BTreeMap<MachineId, Machine>,
}

impl Instance {
    /// Total number of steps across every job.
    pub fn total_steps(&self) -> usize {
        self.jobs.values().map(Job::step_count).sum()
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Number of machines.
    pub fn machine_count(&self) -> usize {
        self.machines.len()
    }

    /// Iterates jobs in ascending `job_id` order.
    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    /// Iterates machines in ascending `machine_id` order.
    pub fn machines(&self) -> impl Iterator<Item = &Machine> {
        self.machines.values()
    }

    /// Looks up a job by id.
    pub fn job(&self, job_id: JobId) -> Option<&Job> {
        self.jobs.get(&job_id)
    }

    /// Looks up a step by `(job_id, step_id)`.
    pub fn step(&self, job_id: JobId, step_id: StepId) -> Option<&Step> {
        self.jobs.get(&job_id)?.step(step_id)
    }

    /// The maximum job id present in the instance, if any.
    pub fn max_job_id(&self) -> Option<JobId> {
        self.jobs.keys().next_back().copied()
    }

    /// The maximum machine id present in the instance, if any.
    pub fn max_machine_id(&self) -> Option<MachineId> {
        self.machines.keys().next_back().copied()
    }
}

/// Builder for [`Instance`]. Add machines, jobs, and steps in any order;
/// [`InstanceBuilder::build`] validates the whole graph at once.
#[derive(Debug, Clone, Default)]
pub struct InstanceBuilder {
    jobs: BTreeMap<JobId, Job>,
    machines: BTreeMap<MachineId, Machine>,
}

impl InstanceBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a machine.
    pub fn add_machine(mut self, machine_id: MachineId) -> Self {
        self.machines.insert(machine_id, Machine { machine_id });
        self
    }

    /// Registers a job with the given due date. Must be called before
    /// [`InstanceBuilder::add_step`] for that job's id.
    pub fn add_job(mut self, job_id: JobId, due_date: TimeUnit) -> Self {
        self.jobs.entry(job_id).or_insert_with(|| Job {
            job_id,
            due_date,
            steps: BTreeMap::new(),
        });
        self
    }

    /// Adds a step to a job previously registered with [`InstanceBuilder::add_job`].
    ///
    /// If the job has not been added yet, it is created with `due_date = 0`
    /// (the caller is expected to have called `add_job` first; this mirrors
    /// the teacher's tolerant `map[key]` insertion behaviour rather than
    /// panicking on out-of-order calls).
    pub fn add_step(mut self, job_id: JobId, step_id: StepId, machine_id: MachineId, duration: TimeUnit) -> Self {
        let job = self.jobs.entry(job_id).or_insert_with(|| Job {
            job_id,
            due_date: 0,
            steps: BTreeMap::new(),
        });
        job.steps.insert(
            step_id,
            Step {
                job_id,
                step_id,
                machine_id,
                duration,
            },
        );
        self
    }

    /// Validates and freezes the instance.
    ///
    /// Collects every problem instead of stopping at the first one:
    /// missing machine references, gaps in a job's step ids, and an
    /// empty machine or job set.
    pub fn build(self) -> Result<Instance, Vec<InstanceError>> {
        let mut errors = Vec::new();

        if self.machines.is_empty() {
            errors.push(InstanceError::NoMachines);
        }
        if self.jobs.is_empty() {
            errors.push(InstanceError::NoJobs);
        }

        for job in self.jobs.values() {
            let n = job.steps.len() as StepId;
            for step_id in 0..n {
                if !job.steps.contains_key(&step_id) {
                    let found = job.steps.keys().find(|&&k| k >= n).copied();
                    errors.push(InstanceError::StepIdGap {
                        job_id: job.job_id,
                        expected: step_id,
                        found,
                    });
                    break;
                }
            }

            for (&step_id, step) in &job.steps {
                if !self.machines.contains_key(&step.machine_id) {
                    errors.push(InstanceError::MissingMachine {
                        job_id: job.job_id,
                        step_id,
                        machine_id: step.machine_id,
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(Instance {
                jobs: self.jobs,
                machines: self.machines,
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_job_one_machine() -> Instance {
        InstanceBuilder::new()
            .add_machine(0)
            .add_job(0, 100)
            .add_step(0, 0, 0, 4)
            .add_job(1, 100)
            .add_step(1, 0, 0, 3)
            .build()
            .unwrap()
    }

    #[test]
    fn builds_a_valid_instance() {
        let instance = two_job_one_machine();
        assert_eq!(instance.job_count(), 2);
        assert_eq!(instance.machine_count(), 1);
        assert_eq!(instance.total_steps(), 2);
    }

    #[test]
    fn iterates_jobs_and_machines_in_ascending_order() {
        let instance = InstanceBuilder::new()
            .add_machine(2)
            .add_machine(0)
            .add_machine(1)
            .add_job(3, 0)
            .add_step(3, 0, 0, 1)
            .add_job(1, 0)
            .add_step(1, 0, 1, 1)
            .build()
            .unwrap();

        let job_ids: Vec<JobId> = instance.jobs().map(|j| j.job_id).collect();
        assert_eq!(job_ids, vec![1, 3]);
        let machine_ids: Vec<MachineId> = instance.machines().map(|m| m.machine_id).collect();
        assert_eq!(machine_ids, vec![0, 1, 2]);
    }

    #[test]
    fn rejects_missing_machine_reference() {
        let result = InstanceBuilder::new()
            .add_machine(0)
            .add_job(0, 0)
            .add_step(0, 0, 5, 3)
            .build();

        let errors = result.unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, InstanceError::MissingMachine { machine_id: 5, .. })));
    }

    #[test]
    fn rejects_step_id_gap() {
        let result = InstanceBuilder::new()
            .add_machine(0)
            .add_job(0, 0)
            .add_step(0, 1, 0, 3) // missing step 0
            .build();

        let errors = result.unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, InstanceError::StepIdGap { expected: 0, .. })));
    }

    #[test]
    fn rejects_empty_instance() {
        let errors = InstanceBuilder::new().build().unwrap_err();
        assert!(errors.contains(&InstanceError::NoMachines));
        assert!(errors.contains(&InstanceError::NoJobs));
    }

    #[test]
    fn step_lookup() {
        let instance = two_job_one_machine();
        let step = instance.step(0, 0).unwrap();
        assert_eq!(step.duration, 4);
        assert!(instance.step(0, 1).is_none());
        assert!(instance.step(9, 0).is_none());
    }

    #[test]
    fn max_job_id() {
        let instance = two_job_one_machine();
        assert_eq!(instance.max_job_id(), Some(1));
    }
}
