//! Error types for instance construction and the GRASP constructor.
//!
//! Mirrors the plain-enum-plus-`Display` style used throughout this crate
//! instead of reaching for an error-derive crate: each error kind carries
//! the fields a caller needs to build a diagnostic, and `Display` renders
//! a human-readable message for stderr.

use std::fmt;

use crate::instance::{JobId, MachineId, StepId};

/// A single problem found while validating a `JobShopInstance` under
/// construction. Multiple errors are collected rather than reported
/// one at a time, so a caller sees every problem in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// A step references a machine id that was never added to the instance.
    MissingMachine {
        job_id: JobId,
        step_id: StepId,
        machine_id: MachineId,
    },
    /// A job's step ids are not a contiguous `0..n` range.
    StepIdGap {
        job_id: JobId,
        expected: StepId,
        found: Option<StepId>,
    },
    /// The instance has no machines.
    NoMachines,
    /// The instance has no jobs.
    NoJobs,
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceError::MissingMachine {
                job_id,
                step_id,
                machine_id,
            } => write!(
                f,
                "job {job_id} step {step_id} references machine {machine_id}, \
                 which was never added to the instance"
            ),
            InstanceError::StepIdGap {
                job_id,
                expected,
                found,
            } => match found {
                Some(found) => write!(
                    f,
                    "job {job_id} is missing step {expected} (found step {found} instead)"
                ),
                None => write!(f, "job {job_id} is missing step {expected}"),
            },
            InstanceError::NoMachines => write!(f, "instance has no machines"),
            InstanceError::NoJobs => write!(f, "instance has no jobs"),
        }
    }
}

impl std::error::Error for InstanceError {}

/// Raised when the GRASP constructor's iteration safety bound is hit
/// before every step has been scheduled. Correct inputs never trigger
/// this; it signals an internal invariant violation rather than a
/// recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructorError {
    /// Number of steps actually scheduled before the bound was hit.
    pub scheduled: usize,
    /// Total number of steps the instance requires.
    pub total: usize,
    /// The iteration bound that was reached.
    pub bound: usize,
}

impl fmt::Display for ConstructorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GRASP constructor hit its iteration safety bound ({}) after scheduling {}/{} steps",
            self.bound, self.scheduled, self.total
        )
    }
}

impl std::error::Error for ConstructorError {}
