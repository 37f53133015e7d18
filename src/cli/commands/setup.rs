//! Setup command implementation.
//!
//! `envsetup` and `envsetup setup` create or reuse the environment.

use std::path::{Path, PathBuf};

use crate::cli::args::SetupArgs;
use crate::config::SetupTarget;
use crate::error::Result;
use crate::setup::{SetupOptions, SetupWorkflow};
use crate::shell::SystemRunner;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::display::report_failure;

/// The setup command implementation.
pub struct SetupCommand {
    project_root: PathBuf,
    args: SetupArgs,
}

impl SetupCommand {
    /// Create a new setup command.
    pub fn new(project_root: &Path, args: SetupArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            args,
        }
    }

    fn options(&self) -> SetupOptions {
        SetupOptions {
            recreate: self.args.recreate,
            dry_run: self.args.dry_run,
            skip_verify: self.args.skip_verify,
        }
    }
}

impl Command for SetupCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let target = match SetupTarget::resolve(&self.project_root, &self.args.target.to_overrides())
        {
            Ok(target) => target,
            Err(e) => {
                report_failure(ui, &e);
                return Ok(CommandResult::failure(1));
            }
        };

        let title = match &target.env_name_override {
            Some(name) => format!("Setting up environment '{}'", name),
            None => "Setting up environment".to_string(),
        };
        ui.show_header(&title);

        let runner = SystemRunner;
        let workflow = SetupWorkflow::new(&target, self.options(), &runner);
        match workflow.run(ui) {
            Ok(summary) => {
                tracing::debug!(
                    "Setup of '{}' finished with {} warning(s)",
                    summary.env_name,
                    summary.warning_count()
                );
                Ok(CommandResult::success())
            }
            Err(e) => {
                tracing::debug!("Setup failed: {:?}", e);
                report_failure(ui, &e);
                Ok(CommandResult::failure(1))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::TargetArgs;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn options_follow_flags() {
        let args = SetupArgs {
            recreate: true,
            dry_run: false,
            skip_verify: true,
            target: TargetArgs::default(),
        };
        let cmd = SetupCommand::new(Path::new("/proj"), args);
        let options = cmd.options();
        assert!(options.recreate);
        assert!(!options.dry_run);
        assert!(options.skip_verify);
    }

    #[test]
    fn bad_project_config_fails_with_exit_one() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".envsetup.yml"), "unknown_key: 1\n").unwrap();
        let cmd = SetupCommand::new(temp.path(), SetupArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("Failed to parse config"));
    }

    #[test]
    fn missing_explicit_tool_fails_with_exit_one() {
        let temp = TempDir::new().unwrap();
        let args = SetupArgs {
            target: TargetArgs {
                conda_exe: Some(temp.path().join("missing-conda")),
                ..Default::default()
            },
            ..Default::default()
        };
        let cmd = SetupCommand::new(temp.path(), args);
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(!result.success);
        assert!(ui.has_error("Package manager 'conda' not found"));
        assert!(ui.has_hint("--conda-exe"));
    }
}
