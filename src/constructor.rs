//! GRASP (greedy randomised adaptive search procedure) constructor:
//! builds one feasible schedule from scratch, used to seed the GA.
//!
//! # Algorithm
//! Each machine keeps a ready list of steps whose job-predecessor has
//! finished; steps still awaiting their predecessor sit in a single
//! waiting list keyed by `(job_id, next_step_id)`. A priority queue
//! orders machines by ascending `plan_time` (a watermark that only ever
//! moves forward: it tracks `curr_time` while the machine is working and
//! gets bumped ahead of it while idle). Each iteration pops the machine
//! with the smallest key: if its ready list is empty and the waiting
//! list isn't, the machine's `plan_time` is bumped by 3 and it's
//! requeued at that strictly higher key, guaranteeing some other machine
//! (or this one, once a waiter lands in its ready list) is popped next;
//! otherwise the ready list is sorted by `(ready_time, duration)` and a
//! greediness-biased random pick is scheduled.
//!
//! # Reference
//! Grounded on `solutionConsturctor.cpp`/`.hpp`'s `SolutionConstructor`
//! (the `draft/` priority-queue version): `StepScheduler`,
//! `MachineScheduler`, `CompareMachineScheduler`, `CompareStepScheduler`,
//! `select_next_step`, `random_select_index`, and `schedule()`.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use rand::Rng;

use crate::error::ConstructorError;
use crate::instance::{Instance, JobId, MachineId, StepId, TaskId, TimeUnit};
use crate::solution::{Solution, StepTask};

/// GRASP greediness parameter: 0 is pure greedy, 1 is pure random.
const ALPHA: f64 = 0.3;

/// Amount `plan_time` advances when a machine has no ready work but the
/// instance isn't finished; keeps idle machines cycling through the
/// queue instead of blocking it.
const IDLE_BUMP: TimeUnit = 3;

#[derive(Debug, Clone, Copy)]
struct ReadyStep {
    job_id: JobId,
    step_id: StepId,
    machine_id: MachineId,
    duration: TimeUnit,
    ready_time: TimeUnit,
}

/// Builds a feasible `Solution` for `instance` using GRASP construction.
///
/// The iteration safety bound scales with instance size
/// (`5000.max(20 * total_steps)`) rather than the source's fixed 5000,
/// since a fixed bound is only correct for a small default instance —
/// see `DESIGN.md`. Returns `ConstructorError` if the bound is hit, or
/// if the queue empties, before every step is scheduled; neither should
/// happen for a validated instance.
pub fn construct<R: Rng>(instance: &Instance, rng: &mut R) -> Result<Solution, ConstructorError> {
    let total_steps = instance.total_steps();
    let iteration_bound = 5000.max(20 * total_steps);
    let num_machines = instance.max_machine_id().map(|m| m as usize + 1).unwrap_or(0);

    let mut ready_lists: Vec<Vec<ReadyStep>> = vec![Vec::new(); num_machines];
    let mut curr_time = vec![0 as TimeUnit; num_machines];
    let mut plan_time = vec![0 as TimeUnit; num_machines];
    let mut waiting: HashMap<TaskId, ReadyStep> = HashMap::new();

    for job in instance.jobs() {
        for step in job.steps() {
            let ready_step = ReadyStep {
                job_id: step.job_id,
                step_id: step.step_id,
                machine_id: step.machine_id,
                duration: step.duration,
                ready_time: 0,
            };
            if step.step_id == 0 {
                ready_lists[step.machine_id as usize].push(ready_step);
            } else {
                waiting.insert((step.job_id, step.step_id), ready_step);
            }
        }
    }

    let mut queue: BinaryHeap<Reverse<(TimeUnit, MachineId)>> = instance
        .machines()
        .map(|machine| Reverse((0, machine.machine_id)))
        .collect();

    let mut solution = Solution::new();
    let mut scheduled = 0usize;
    let mut iterations = 0usize;

    while let Some(Reverse((_, machine_id))) = queue.pop() {
        iterations += 1;
        if iterations > iteration_bound {
            return Err(ConstructorError {
                scheduled,
                total: total_steps,
                bound: iteration_bound,
            });
        }

        let idx = machine_id as usize;
        if ready_lists[idx].is_empty() {
            if waiting.is_empty() {
                continue;
            }
            // Re-enqueue at a strictly-demoted key. Keying the heap on
            // `curr_time` here would re-push this idle machine at an
            // unchanged key, so with a deterministic `machine_id` tiebreak
            // it would keep winning the pop and no other machine could
            // ever make progress. Keying on `plan_time` instead, which this
            // bump strictly increases, guarantees some other machine (or
            // this one, once a waiter lands in its ready list) is popped
            // next.
            plan_time[idx] += IDLE_BUMP;
            queue.push(Reverse((plan_time[idx], machine_id)));
            continue;
        }

        let selected = select_next_step(&mut ready_lists[idx], rng);

        let start = curr_time[idx].max(selected.ready_time);
        let task = StepTask::new(machine_id, selected.duration, start, selected.job_id, selected.step_id);
        curr_time[idx] = task.end_time;
        plan_time[idx] = plan_time[idx].max(task.end_time);
        solution.push_step_task(task);
        scheduled += 1;

        let next_task_id = (selected.job_id, selected.step_id + 1);
        if let Some(mut next) = waiting.remove(&next_task_id) {
            next.ready_time = task.end_time;
            ready_lists[next.machine_id as usize].push(next);
        }

        if ready_lists[idx].is_empty() && waiting.is_empty() {
            continue;
        }
        queue.push(Reverse((plan_time[idx], machine_id)));
    }

    if scheduled != total_steps {
        return Err(ConstructorError {
            scheduled,
            total: total_steps,
            bound: iteration_bound,
        });
    }
    Ok(solution)
}

/// Sorts a machine's ready list by `(ready_time, duration)` ascending,
/// then draws uniformly from the first `k + 1` entries where
/// `k = floor(len * ALPHA)`, removing and returning the chosen step.
fn select_next_step<R: Rng>(ready_list: &mut Vec<ReadyStep>, rng: &mut R) -> ReadyStep {
    ready_list.sort_by_key(|step| (step.ready_time, step.duration));
    let k = ((ready_list.len() as f64) * ALPHA).floor() as usize;
    let index = rng.random_range(0..=k.min(ready_list.len() - 1));
    ready_list.remove(index)
}
