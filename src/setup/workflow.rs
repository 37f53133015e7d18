//! The setup procedure.
//!
//! Steps run strictly in order and stop at the first fatal error:
//! locate the tool, load the manifest, query the registry, then remove
//! and/or create as the [`SetupPlan`] says, then prove activation works.
//! Nothing that changes the registry runs before the tool and manifest
//! checks have passed.

use std::time::Instant;

use crate::config::SetupTarget;
use crate::error::Result;
use crate::manager::{EnvironmentManager, ManagerLocator, ManagerTool};
use crate::manifest::{validate_env_name, EnvironmentManifest};
use crate::shell::{detect_shell, is_elevated, CommandRunner, ShellType};
use crate::ui::{live_output_callback, SpinnerHandle, UserInterface};

use super::outcome::{SetupStep, SetupSummary, StepStatus};
use super::plan::SetupPlan;

/// Lines of package manager output kept under a running spinner.
const LIVE_OUTPUT_LINES: usize = 4;

/// Flags that change what a run does.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetupOptions {
    /// Remove an existing environment before creating it.
    pub recreate: bool,
    /// Stop after reporting the plan.
    pub dry_run: bool,
    /// Skip `pip check` and import checks.
    pub skip_verify: bool,
}

/// Locate the package manager for `target` using the process environment.
pub fn locate_tool(target: &SetupTarget) -> Result<ManagerTool> {
    ManagerLocator::from_env().locate(target.manager, target.conda_exe.as_deref())
}

/// Runs the setup procedure against one target.
pub struct SetupWorkflow<'a> {
    target: &'a SetupTarget,
    options: SetupOptions,
    runner: &'a dyn CommandRunner,
    shell: ShellType,
}

impl<'a> SetupWorkflow<'a> {
    pub fn new(target: &'a SetupTarget, options: SetupOptions, runner: &'a dyn CommandRunner) -> Self {
        Self {
            target,
            options,
            runner,
            shell: detect_shell(),
        }
    }

    /// Generate hooks for `shell` instead of the detected one.
    pub fn with_shell(mut self, shell: ShellType) -> Self {
        self.shell = shell;
        self
    }

    /// Execute every step, returning the summary or the first fatal error.
    ///
    /// On a fatal error the failed step is recorded and the partial summary
    /// is shown before the error is returned.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<SetupSummary> {
        let started = Instant::now();
        let mut summary = SetupSummary::default();

        match self.run_steps(ui, &mut summary, started) {
            Ok(()) => Ok(summary),
            Err(e) => {
                summary.total_duration = started.elapsed();
                ui.show_summary(&summary);
                Err(e)
            }
        }
    }

    fn run_steps(
        &self,
        ui: &mut dyn UserInterface,
        summary: &mut SetupSummary,
        started: Instant,
    ) -> Result<()> {
        if is_elevated() {
            ui.warning("Running as root; the environment will be owned by root");
        }

        // Tool presence
        let step_start = Instant::now();
        let mut spinner = ui.start_spinner("Locating package manager...");
        let located = locate_tool(self.target).and_then(|tool| {
            let manager = EnvironmentManager::new(tool, self.runner).in_dir(&self.target.project_root);
            let version = manager.version()?;
            Ok((manager, version))
        });
        let (manager, version) = failing(
            spinner.as_mut(),
            summary,
            SetupStep::LocateTool,
            located,
            "Package manager not found",
        )?;
        let tool_name = manager.tool().kind.binary();
        spinner.finish_success(&format!(
            "Found {} {} at {}",
            tool_name,
            version,
            manager.tool().path.display()
        ));
        summary.record(
            SetupStep::LocateTool,
            StepStatus::Completed,
            Some(format!("{} {}", tool_name, version)),
            Some(step_start.elapsed()),
        );

        // Manifest
        let step_start = Instant::now();
        let manifest_path = &self.target.manifest_path;
        let mut spinner = ui.start_spinner("Reading environment manifest...");
        let loaded = EnvironmentManifest::load(manifest_path).and_then(|manifest| {
            let name = self.target.env_name(&manifest);
            validate_env_name(&name)?;
            Ok((manifest, name))
        });
        let (manifest, env_name) = failing(
            spinner.as_mut(),
            summary,
            SetupStep::LoadManifest,
            loaded,
            "Manifest check failed",
        )?;
        let counts = manifest.summary();
        spinner.finish_success(&format!(
            "Manifest {} ({} conda, {} pip packages)",
            manifest_path.display(),
            counts.conda_packages,
            counts.pip_packages
        ));
        for warning in manifest.warnings() {
            ui.warning(&warning);
        }
        summary.env_name = env_name.clone();
        summary.record(
            SetupStep::LoadManifest,
            StepStatus::Completed,
            counts.python.map(|p| format!("python {}", p)),
            Some(step_start.elapsed()),
        );

        // Existence
        let step_start = Instant::now();
        let mut spinner = ui.start_spinner(&format!("Looking for environment '{}'...", env_name));
        let state = failing(
            spinner.as_mut(),
            summary,
            SetupStep::CheckExisting,
            manager.environment_state(&env_name),
            "Could not read the environment list",
        )?;
        let plan = SetupPlan::decide(&state, self.options.recreate);
        match state.prefix() {
            Some(prefix) => spinner.finish_success(&format!(
                "Environment '{}' exists at {}",
                env_name,
                prefix.display()
            )),
            None => spinner.finish_success(&format!("Environment '{}' does not exist yet", env_name)),
        }
        let found = if state.exists() { "present" } else { "absent" };
        summary.record(
            SetupStep::CheckExisting,
            StepStatus::Completed,
            Some(found.to_string()),
            Some(step_start.elapsed()),
        );
        tracing::debug!("Plan for '{}': {}", env_name, plan);

        if self.options.dry_run {
            ui.message(&format!("Dry run: would {} '{}'", plan, env_name));
            for step in [SetupStep::Remove, SetupStep::Create] {
                summary.record(step, StepStatus::Skipped, Some("dry run".to_string()), None);
            }
            summary.dry_run = true;
            summary.success = true;
            summary.total_duration = started.elapsed();
            ui.show_summary(summary);
            return Ok(());
        }

        // Removal
        if plan.remove {
            let step_start = Instant::now();
            let message = format!("Removing environment '{}'...", env_name);
            let mut spinner = ui.start_spinner(&message);
            let callback = live_output_callback(
                spinner.progress_bar(),
                message,
                LIVE_OUTPUT_LINES,
                ui.output_mode().shows_command_output(),
            );
            failing(
                spinner.as_mut(),
                summary,
                SetupStep::Remove,
                manager.remove(&env_name, callback),
                &format!("Failed to remove '{}'", env_name),
            )?;
            spinner.finish_success(&format!("Removed environment '{}'", env_name));
            summary.record(
                SetupStep::Remove,
                StepStatus::Completed,
                None,
                Some(step_start.elapsed()),
            );
        } else {
            summary.record(SetupStep::Remove, StepStatus::Skipped, None, None);
        }

        // Creation
        if plan.create {
            let step_start = Instant::now();
            let message = format!("Creating environment '{}' from {}...", env_name, manifest_path.display());
            let mut spinner = ui.start_spinner(&message);
            let callback = live_output_callback(
                spinner.progress_bar(),
                message,
                LIVE_OUTPUT_LINES,
                ui.output_mode().shows_command_output(),
            );
            failing(
                spinner.as_mut(),
                summary,
                SetupStep::Create,
                manager.create(manifest_path, &env_name, callback),
                &format!("Failed to create '{}'", env_name),
            )?;
            spinner.finish_success(&format!("Created environment '{}'", env_name));
            summary.record(
                SetupStep::Create,
                StepStatus::Completed,
                None,
                Some(step_start.elapsed()),
            );
        } else {
            let mut spinner = ui.start_spinner("Creating environment...");
            spinner.finish_skipped(&format!(
                "Environment '{}' already exists (use --recreate to rebuild it)",
                env_name
            ));
            summary.record(
                SetupStep::Create,
                StepStatus::Skipped,
                Some("already exists".to_string()),
                None,
            );
        }

        // Shell hook
        let step_start = Instant::now();
        let mut spinner = ui.start_spinner(&format!("Initializing {} shell hook...", self.shell));
        failing(
            spinner.as_mut(),
            summary,
            SetupStep::ShellHook,
            manager.shell_hook(self.shell),
            "Shell hook initialization failed",
        )?;
        spinner.finish_success(&format!("Shell hook available for {}", self.shell));
        summary.record(
            SetupStep::ShellHook,
            StepStatus::Completed,
            Some(self.shell.to_string()),
            Some(step_start.elapsed()),
        );

        // Activation
        let step_start = Instant::now();
        let mut spinner = ui.start_spinner(&format!("Activating '{}'...", env_name));
        let prefix = failing(
            spinner.as_mut(),
            summary,
            SetupStep::Activate,
            manager.activate(&env_name),
            &format!("Could not activate '{}'", env_name),
        )?;
        spinner.finish_success(&format!("Interpreter runs from {}", prefix.display()));
        summary.record(
            SetupStep::Activate,
            StepStatus::Completed,
            Some(prefix.display().to_string()),
            Some(step_start.elapsed()),
        );
        summary.prefix = Some(prefix);

        // Verification
        self.verify(&manager, &env_name, ui, summary);

        summary.success = true;
        summary.total_duration = started.elapsed();
        ui.show_summary(summary);
        ui.success(&format!("Environment '{}' is ready", env_name));
        ui.show_hint(&format!("Activate it with: {} activate {}", tool_name, env_name));
        Ok(())
    }

    /// Consistency checks. Problems are reported as warnings only.
    fn verify(
        &self,
        manager: &EnvironmentManager<'_>,
        env_name: &str,
        ui: &mut dyn UserInterface,
        summary: &mut SetupSummary,
    ) {
        let checks = &self.target.verify;
        if self.options.skip_verify || (!checks.pip_check && checks.imports.is_empty()) {
            summary.record(SetupStep::Verify, StepStatus::Skipped, None, None);
            return;
        }

        let step_start = Instant::now();
        let mut spinner = ui.start_spinner("Verifying installed packages...");
        let mut problems = Vec::new();

        if checks.pip_check {
            match manager.run_in(env_name, &["python", "-m", "pip", "check"]) {
                Ok(result) if result.success => {}
                Ok(result) => problems.push(format!(
                    "pip check reported problems:\n{}",
                    result.output_tail(10)
                )),
                Err(e) => problems.push(format!("pip check could not run: {}", e)),
            }
        }

        for module in &checks.imports {
            let statement = format!("import {}", module);
            match manager.run_in(env_name, &["python", "-c", &statement]) {
                Ok(result) if result.success => {}
                Ok(result) => problems.push(format!(
                    "Module '{}' failed to import: {}",
                    module,
                    result.output_tail(1)
                )),
                Err(e) => problems.push(format!("Module '{}' could not be checked: {}", module, e)),
            }
        }

        if problems.is_empty() {
            spinner.finish_success("Packages are consistent");
            summary.record(
                SetupStep::Verify,
                StepStatus::Completed,
                None,
                Some(step_start.elapsed()),
            );
        } else {
            spinner.finish_skipped(&format!("Verification found {} problem(s)", problems.len()));
            for problem in &problems {
                ui.warning(problem);
            }
            summary.record(
                SetupStep::Verify,
                StepStatus::Warned,
                Some(format!("{} problem(s)", problems.len())),
                Some(step_start.elapsed()),
            );
        }
    }
}

/// Mark the spinner and `step` failed when `result` is an error, then pass
/// it through.
fn failing<T>(
    spinner: &mut dyn SpinnerHandle,
    summary: &mut SetupSummary,
    step: SetupStep,
    result: Result<T>,
    message: &str,
) -> Result<T> {
    if result.is_err() {
        spinner.finish_error(message);
        summary.record(step, StepStatus::Failed, Some(message.to_string()), None);
    }
    result
}
