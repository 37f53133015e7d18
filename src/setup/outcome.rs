//! Step records and the run summary.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// The fixed sequence of setup steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    LocateTool,
    LoadManifest,
    CheckExisting,
    Remove,
    Create,
    ShellHook,
    Activate,
    Verify,
}

impl SetupStep {
    pub fn label(&self) -> &'static str {
        match self {
            SetupStep::LocateTool => "package manager",
            SetupStep::LoadManifest => "manifest",
            SetupStep::CheckExisting => "existing environment",
            SetupStep::Remove => "remove",
            SetupStep::Create => "create",
            SetupStep::ShellHook => "shell hook",
            SetupStep::Activate => "activate",
            SetupStep::Verify => "verify",
        }
    }
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Skipped,
    /// Finished, but a non-fatal check reported problems.
    Warned,
    /// Stopped the run.
    Failed,
}

impl StepStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            StepStatus::Completed => "✓",
            StepStatus::Skipped => "○",
            StepStatus::Warned => "⚠",
            StepStatus::Failed => "✗",
        }
    }
}

/// One executed (or skipped) step.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub step: SetupStep,
    pub status: StepStatus,
    pub detail: Option<String>,
    pub duration: Option<Duration>,
}

/// Result of a setup run.
#[derive(Debug, Clone, Default)]
pub struct SetupSummary {
    pub env_name: String,
    pub prefix: Option<PathBuf>,
    pub steps: Vec<StepRecord>,
    pub dry_run: bool,
    pub success: bool,
    pub total_duration: Duration,
}

impl SetupSummary {
    pub fn record(
        &mut self,
        step: SetupStep,
        status: StepStatus,
        detail: Option<String>,
        duration: Option<Duration>,
    ) {
        self.steps.push(StepRecord {
            step,
            status,
            detail,
            duration,
        });
    }

    pub fn status_of(&self, step: SetupStep) -> Option<StepStatus> {
        self.steps.iter().find(|r| r.step == step).map(|r| r.status)
    }

    pub fn warning_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|r| r.status == StepStatus::Warned)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_tracks_steps() {
        let mut summary = SetupSummary::default();
        summary.record(SetupStep::Create, StepStatus::Skipped, None, None);
        summary.record(
            SetupStep::Verify,
            StepStatus::Warned,
            Some("pip check".into()),
            None,
        );

        assert_eq!(summary.status_of(SetupStep::Create), Some(StepStatus::Skipped));
        assert_eq!(summary.status_of(SetupStep::Remove), None);
        assert_eq!(summary.warning_count(), 1);
    }

    #[test]
    fn failed_step_has_its_own_icon() {
        assert_eq!(StepStatus::Failed.icon(), "✗");
        assert_eq!(SetupStep::ShellHook.to_string(), "shell hook");
    }
}
