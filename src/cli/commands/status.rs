//! Status command implementation.
//!
//! The `envsetup status` command reports what a setup run would find. It
//! only ever runs read-only manager commands.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::StatusArgs;
use crate::config::SetupTarget;
use crate::error::{Result, SetupError};
use crate::manager::{EnvironmentManager, ManagerKind};
use crate::manifest::EnvironmentManifest;
use crate::setup::locate_tool;
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display::report_failure;

/// The status command implementation.
pub struct StatusCommand {
    project_root: PathBuf,
    args: StatusArgs,
}

/// Machine-readable status.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub manager: ManagerStatus,
    pub manifest: ManifestStatus,
    pub environment: EnvironmentStatus,
}

#[derive(Debug, Serialize)]
pub struct ManagerStatus {
    pub kind: ManagerKind,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ManifestStatus {
    pub path: PathBuf,
    pub found: bool,
    pub conda_packages: usize,
    pub pip_packages: usize,
    pub python: Option<String>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnvironmentStatus {
    pub name: String,
    /// `None` when the registry could not be queried.
    pub exists: Option<bool>,
    pub prefix: Option<PathBuf>,
}

impl StatusReport {
    /// Whether a setup run could proceed past its checks.
    pub fn is_healthy(&self) -> bool {
        self.manager.error.is_none() && self.manifest.error.is_none() && self.environment.exists.is_some()
    }
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(project_root: &Path, args: StatusArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    /// Gather the report using `runner` for manager commands.
    pub fn collect(&self, target: &SetupTarget, runner: &dyn CommandRunner) -> StatusReport {
        let mut manager_status = ManagerStatus {
            kind: target.manager,
            path: None,
            version: None,
            error: None,
        };

        let manager = match locate_tool(target) {
            Ok(tool) => {
                manager_status.path = Some(tool.path.clone());
                let manager = EnvironmentManager::new(tool, runner).in_dir(&target.project_root);
                match manager.version() {
                    Ok(version) => {
                        manager_status.version = Some(version);
                        Some(manager)
                    }
                    Err(e) => {
                        manager_status.error = Some(e.to_string());
                        None
                    }
                }
            }
            Err(e) => {
                manager_status.error = Some(e.to_string());
                None
            }
        };

        let mut manifest_status = ManifestStatus {
            path: target.manifest_path.clone(),
            found: target.manifest_path.is_file(),
            conda_packages: 0,
            pip_packages: 0,
            python: None,
            warnings: Vec::new(),
            error: None,
        };
        let manifest = match EnvironmentManifest::load(&target.manifest_path) {
            Ok(manifest) => {
                let summary = manifest.summary();
                manifest_status.conda_packages = summary.conda_packages;
                manifest_status.pip_packages = summary.pip_packages;
                manifest_status.python = summary.python;
                manifest_status.warnings = manifest.warnings();
                manifest
            }
            Err(e) => {
                manifest_status.error = Some(e.to_string());
                EnvironmentManifest::default()
            }
        };

        let name = target.env_name(&manifest);
        let state = manager.as_ref().map(|m| m.environment_state(&name));
        let environment = match state {
            Some(Ok(state)) => EnvironmentStatus {
                name,
                exists: Some(state.exists()),
                prefix: state.prefix().map(Path::to_path_buf),
            },
            Some(Err(e)) => {
                tracing::debug!("Could not query environments: {}", e);
                EnvironmentStatus {
                    name,
                    exists: None,
                    prefix: None,
                }
            }
            None => EnvironmentStatus {
                name,
                exists: None,
                prefix: None,
            },
        };

        StatusReport {
            manager: manager_status,
            manifest: manifest_status,
            environment,
        }
    }

    fn show(&self, report: &StatusReport, ui: &mut dyn UserInterface) {
        ui.show_header(&format!("Environment '{}'", report.environment.name));

        match (&report.manager.path, &report.manager.version) {
            (Some(path), Some(version)) => ui.success(&format!(
                "{} {} at {}",
                report.manager.kind,
                version,
                path.display()
            )),
            _ => ui.error(report.manager.error.as_deref().unwrap_or("package manager unavailable")),
        }

        match &report.manifest.error {
            None => {
                let python = report
                    .manifest
                    .python
                    .as_deref()
                    .map(|p| format!(", python {}", p))
                    .unwrap_or_default();
                ui.success(&format!(
                    "Manifest {} ({} conda, {} pip packages{})",
                    report.manifest.path.display(),
                    report.manifest.conda_packages,
                    report.manifest.pip_packages,
                    python
                ));
                for warning in &report.manifest.warnings {
                    ui.warning(warning);
                }
            }
            Some(error) => ui.error(error),
        }

        match (report.environment.exists, &report.environment.prefix) {
            (Some(true), Some(prefix)) => ui.success(&format!("Environment exists at {}", prefix.display())),
            (Some(_), _) => {
                ui.message("Environment does not exist yet");
                ui.show_hint("Run `envsetup` to create it");
            }
            (None, _) => ui.warning("Environment state unknown"),
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let target = match SetupTarget::resolve(&self.project_root, &self.args.target.to_overrides()) {
            Ok(target) => target,
            Err(e) => {
                report_failure(ui, &e);
                return Ok(CommandResult::failure(1));
            }
        };

        let report = self.collect(&target, &SystemRunner);

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| SetupError::Other(e.into()))?;
            println!("{}", json);
        } else {
            self.show(&report, ui);
        }

        if report.is_healthy() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::{Overrides, ProjectConfig};
    use crate::shell::ScriptedRunner;
    use crate::ui::MockUI;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn project(manifest: Option<&str>) -> (TempDir, SetupTarget) {
        let temp = TempDir::new().unwrap();
        let conda = temp.path().join("conda");
        fs::write(&conda, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&conda, fs::Permissions::from_mode(0o755)).unwrap();
        if let Some(content) = manifest {
            fs::write(temp.path().join("environment.yml"), content).unwrap();
        }
        let overrides = Overrides {
            conda_exe: Some(conda),
            ..Default::default()
        };
        let target = SetupTarget::from_parts(temp.path(), &overrides, ProjectConfig::default());
        (temp, target)
    }

    fn runner() -> ScriptedRunner {
        ScriptedRunner::new()
            .respond(&["--version"], 0, "conda 23.11.0")
            .respond(
                &["env", "list", "--json"],
                0,
                r#"{"envs": ["/opt/conda", "/opt/conda/envs/PDFTranslator"]}"#,
            )
    }

    #[test]
    fn healthy_project_report() {
        let (temp, target) = project(Some("name: PDFTranslator\ndependencies:\n  - python=3.10\n"));
        let cmd = StatusCommand::new(temp.path(), StatusArgs::default());
        let runner = runner();

        let report = cmd.collect(&target, &runner);

        assert!(report.is_healthy());
        assert_eq!(report.manager.version.as_deref(), Some("23.11.0"));
        assert_eq!(report.manifest.conda_packages, 1);
        assert_eq!(report.manifest.python.as_deref(), Some("=3.10"));
        assert_eq!(report.environment.exists, Some(true));
        assert!(!runner.was_called(&["create"]));
        assert!(!runner.was_called(&["remove"]));
    }

    #[test]
    fn missing_manifest_is_unhealthy() {
        let (temp, target) = project(None);
        let cmd = StatusCommand::new(temp.path(), StatusArgs::default());

        let report = cmd.collect(&target, &runner());

        assert!(!report.is_healthy());
        assert!(!report.manifest.found);
        assert_eq!(report.environment.name, "PDFTranslator");
    }

    #[test]
    fn report_serializes() {
        let (temp, target) = project(Some("name: other\ndependencies: [python]\n"));
        let cmd = StatusCommand::new(temp.path(), StatusArgs::default());

        let report = cmd.collect(&target, &runner());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["manager"]["kind"], "conda");
        assert_eq!(json["environment"]["name"], "other");
        assert_eq!(json["environment"]["exists"], false);
    }

    #[test]
    fn show_reports_absent_environment() {
        let (temp, target) = project(Some("name: other\ndependencies: [python]\n"));
        let cmd = StatusCommand::new(temp.path(), StatusArgs::default());
        let report = cmd.collect(&target, &runner());
        let mut ui = MockUI::new();

        cmd.show(&report, &mut ui);

        assert!(ui.has_message("does not exist yet"));
        assert!(ui.has_hint("envsetup"));
    }
}
