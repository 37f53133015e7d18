//! Environment setup procedure.
//!
//! - [`plan`] - Which mutating steps a run performs
//! - [`workflow`] - The ordered steps themselves
//! - [`outcome`] - Per-step records and the run summary

pub mod outcome;
pub mod plan;
pub mod workflow;

pub use outcome::{SetupStep, SetupSummary, StepRecord, StepStatus};
pub use plan::SetupPlan;
pub use workflow::{locate_tool, SetupOptions, SetupWorkflow};
