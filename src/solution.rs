//! Solution model: a schedule assigning start times to every step.
//!
//! A `Solution` owns its scheduled tasks in a contiguous arena; machine
//! timelines and the task-id index hold arena indices rather than smart
//! pointers. This is the re-architecture `SPEC_FULL.md` §3 calls for in
//! place of the original's `shared_ptr`/`weak_ptr` pair, and it is what
//! makes `Solution: Clone` cheap enough to snapshot under the global-best
//! lock without holding the lock during the clone itself.

use std::collections::HashMap;

use crate::instance::{JobId, MachineId, StepId, TaskId, TimeUnit};

/// A scheduled job step: one machine-bound unit of work with a fixed
/// `[start_time, end_time)` interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTask {
    pub machine_id: MachineId,
    pub duration: TimeUnit,
    pub start_time: TimeUnit,
    pub end_time: TimeUnit,
    pub job_id: JobId,
    pub step_id: StepId,
}

impl StepTask {
    pub fn new(machine_id: MachineId, duration: TimeUnit, start_time: TimeUnit, job_id: JobId, step_id: StepId) -> Self {
        Self {
            machine_id,
            duration,
            start_time,
            end_time: start_time + duration,
            job_id,
            step_id,
        }
    }
}

/// A preventive-maintenance task.
///
/// Reserved extension point: the core constructor and GA never produce
/// one of these. It exists so `ScheduledTask` is a real tagged union
/// instead of a dynamic-dispatch placeholder — see `SPEC_FULL.md` §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PmTask {
    pub pm_id: u32,
    pub machine_id: MachineId,
    pub start_time: TimeUnit,
    pub end_time: TimeUnit,
}

/// A task scheduled onto a machine timeline: either a job step or a
/// (currently unused) preventive-maintenance task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    Step(StepTask),
    Pm(PmTask),
}

impl ScheduledTask {
    pub fn machine_id(&self) -> MachineId {
        match self {
            ScheduledTask::Step(t) => t.machine_id,
            ScheduledTask::Pm(t) => t.machine_id,
        }
    }

    pub fn start_time(&self) -> TimeUnit {
        match self {
            ScheduledTask::Step(t) => t.start_time,
            ScheduledTask::Pm(t) => t.start_time,
        }
    }

    pub fn end_time(&self) -> TimeUnit {
        match self {
            ScheduledTask::Step(t) => t.end_time,
            ScheduledTask::Pm(t) => t.end_time,
        }
    }

    /// The `StepTask` payload, if this is a step (not a PM task).
    pub fn as_step(&self) -> Option<&StepTask> {
        match self {
            ScheduledTask::Step(t) => Some(t),
            ScheduledTask::Pm(_) => None,
        }
    }
}

/// A complete assignment of start times to every step in an instance.
///
/// Scheduled tasks live in a single arena (`tasks`); `step_tasks` maps
/// `(job_id, step_id)` to an arena index, and `schedules` maps each
/// machine to its timeline of arena indices, already in start-time order.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    tasks: Vec<ScheduledTask>,
    step_tasks: HashMap<TaskId, usize>,
    schedules: HashMap<MachineId, Vec<usize>>,
    makespan: TimeUnit,
}

impl Solution {
    /// An empty solution (no scheduled tasks, makespan 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step-task to its machine's timeline.
    ///
    /// Callers are expected to append in non-decreasing `start_time` per
    /// machine (both the GRASP constructor and the chromosome decoder do
    /// this naturally), which keeps `schedules` in start-time order without
    /// a separate sort.
    pub fn push_step_task(&mut self, task: StepTask) {
        let idx = self.tasks.len();
        self.step_tasks.insert((task.job_id, task.step_id), idx);
        self.schedules.entry(task.machine_id).or_default().push(idx);
        if task.end_time > self.makespan {
            self.makespan = task.end_time;
        }
        self.tasks.push(ScheduledTask::Step(task));
    }

    /// Current makespan: the maximum `end_time` over every scheduled task.
    /// Maintained incrementally on every insert, so it is never stale.
    pub fn makespan(&self) -> TimeUnit {
        self.makespan
    }

    /// Number of scheduled tasks (steps + PM tasks).
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Looks up the step-task scheduled for `(job_id, step_id)`.
    pub fn step_task(&self, job_id: JobId, step_id: StepId) -> Option<&StepTask> {
        let idx = *self.step_tasks.get(&(job_id, step_id))?;
        self.tasks[idx].as_step()
    }

    /// Iterates every scheduled task, in arena insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.tasks.iter()
    }

    /// Iterates every step-task, in arena insertion order.
    pub fn step_tasks(&self) -> impl Iterator<Item = &StepTask> {
        self.tasks.iter().filter_map(ScheduledTask::as_step)
    }

    /// Iterates a machine's timeline in start-time order.
    pub fn machine_timeline(&self, machine_id: MachineId) -> impl Iterator<Item = &ScheduledTask> {
        self.schedules
            .get(&machine_id)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.tasks[idx])
    }

    /// Iterates every machine id that has at least one scheduled task.
    pub fn machine_ids(&self) -> impl Iterator<Item = MachineId> + '_ {
        self.schedules.keys().copied()
    }

    /// Recomputes `makespan` from scratch over every scheduled task.
    ///
    /// `push_step_task` already maintains makespan incrementally; this is
    /// provided for callers that mutate tasks by other means and need to
    /// re-establish the invariant explicitly.
    pub fn recompute_makespan(&mut self) {
        self.makespan = self.tasks.iter().map(ScheduledTask::end_time).max().unwrap_or(0);
    }

    /// Checks that every machine timeline holds pairwise-disjoint
    /// intervals and that each job's steps respect precedence. Used by
    /// tests and debug assertions, not by the hot path.
    pub fn is_feasible(&self, instance: &crate::instance::Instance) -> bool {
        for machine_id in self.schedules.keys() {
            let mut timeline: Vec<&StepTask> = self
                .machine_timeline(*machine_id)
                .filter_map(ScheduledTask::as_step)
                .collect();
            timeline.sort_by_key(|t| t.start_time);
            for pair in timeline.windows(2) {
                if pair[0].end_time > pair[1].start_time {
                    return false;
                }
            }
        }

        for job in instance.jobs() {
            let mut prev_end = 0;
            for step in job.steps() {
                let Some(task) = self.step_task(job.job_id, step.step_id) else {
                    return false;
                };
                if task.start_time < prev_end {
                    return false;
                }
                prev_end = task.end_time;
            }
        }

        true
    }
}
