//! Operations against a located package manager.
//!
//! Every method maps to a single subordinate process. Nothing here retries;
//! a failure is reported to the caller with the exit code and the tail of
//! the captured output.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SetupError};
use crate::shell::{CommandResult, CommandRunner, Invocation, OutputCallback, ShellType};

use super::locate::ManagerTool;
use super::registry::{EnvironmentList, EnvironmentState};

/// Lines of captured output attached to failures.
const OUTPUT_TAIL_LINES: usize = 20;

/// A package manager bound to a process runner.
pub struct EnvironmentManager<'a> {
    tool: ManagerTool,
    runner: &'a dyn CommandRunner,
    cwd: Option<PathBuf>,
}

impl<'a> EnvironmentManager<'a> {
    pub fn new(tool: ManagerTool, runner: &'a dyn CommandRunner) -> Self {
        Self {
            tool,
            runner,
            cwd: None,
        }
    }

    /// Run subordinate processes from `dir`.
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn tool(&self) -> &ManagerTool {
        &self.tool
    }

    fn invocation<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let inv = Invocation::new(&self.tool.path).args(args);
        match &self.cwd {
            Some(dir) => inv.current_dir(dir),
            None => inv,
        }
    }

    /// Confirm the executable runs and report its version.
    pub fn version(&self) -> Result<String> {
        let not_runnable = |message: String| SetupError::ToolNotFound {
            tool: self.tool.kind.binary().to_string(),
            message,
        };

        let result = self
            .runner
            .run(&self.invocation(["--version"]))
            .map_err(|_| not_runnable(format!("{} could not be started", self.tool.path.display())))?;

        if !result.success {
            return Err(not_runnable(format!(
                "{} --version exited with code {:?}",
                self.tool.path.display(),
                result.exit_code
            )));
        }

        let text = format!("{}{}", result.stdout, result.stderr);
        Ok(extract_version(&text).unwrap_or_else(|| text.trim().to_string()))
    }

    /// Read the environment registry.
    pub fn list_environments(&self) -> Result<EnvironmentList> {
        let result = self.runner.run(&self.invocation(["env", "list", "--json"]))?;
        if !result.success {
            return Err(SetupError::EnvironmentListFailed {
                message: format!(
                    "exit code {:?}: {}",
                    result.exit_code,
                    result.output_tail(3)
                ),
            });
        }
        EnvironmentList::parse(&result.stdout)
    }

    /// Whether `name` exists, and where.
    pub fn environment_state(&self, name: &str) -> Result<EnvironmentState> {
        let state = self.list_environments()?.state_of(name);
        tracing::debug!("Environment '{}' state: {:?}", name, state);
        Ok(state)
    }

    /// Remove the named environment and everything in it.
    pub fn remove(&self, name: &str, callback: OutputCallback) -> Result<()> {
        let inv = self.invocation(["env", "remove", "--name", name, "--yes"]);
        let result = self.runner.run_streaming(&inv, callback)?;
        if result.success {
            return Ok(());
        }
        Err(SetupError::EnvironmentRemoveFailed {
            name: name.to_string(),
            code: result.exit_code,
            output: result.output_tail(OUTPUT_TAIL_LINES),
        })
    }

    /// Create the named environment from a manifest.
    pub fn create(&self, manifest: &Path, name: &str, callback: OutputCallback) -> Result<()> {
        let inv = self.invocation([
            "env".to_string(),
            "create".to_string(),
            "--file".to_string(),
            manifest.display().to_string(),
            "--name".to_string(),
            name.to_string(),
        ]);
        let result = self.runner.run_streaming(&inv, callback)?;
        if result.success {
            return Ok(());
        }
        Err(SetupError::EnvironmentCreateFailed {
            name: name.to_string(),
            code: result.exit_code,
            output: result.output_tail(OUTPUT_TAIL_LINES),
        })
    }

    /// Generate the shell activation hook.
    ///
    /// The hook text itself is discarded; a child process cannot modify the
    /// calling shell. Success proves the manager's activation machinery works.
    pub fn shell_hook(&self, shell: ShellType) -> Result<()> {
        let inv = self.invocation(self.tool.kind.hook_args(shell));
        let hook_failed = |message: String| SetupError::ShellHookFailed {
            shell: shell.to_string(),
            message,
        };

        let result = self
            .runner
            .run(&inv)
            .map_err(|e| hook_failed(e.to_string()))?;
        if !result.success {
            return Err(hook_failed(format!(
                "exit code {:?}: {}",
                result.exit_code,
                result.output_tail(3)
            )));
        }
        if result.stdout.trim().is_empty() {
            return Err(hook_failed("hook script was empty".to_string()));
        }
        Ok(())
    }

    /// Enter the environment and return the interpreter's `sys.prefix`.
    pub fn activate(&self, name: &str) -> Result<PathBuf> {
        let activation_failed = |message: String| SetupError::ActivationFailed {
            name: name.to_string(),
            message,
        };

        let result = self
            .run_in(name, &["python", "-c", "import sys; print(sys.prefix)"])
            .map_err(|e| activation_failed(e.to_string()))?;
        if !result.success {
            return Err(activation_failed(format!(
                "exit code {:?}: {}",
                result.exit_code,
                result.output_tail(3)
            )));
        }

        let prefix = result
            .stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| activation_failed("python printed no prefix".to_string()))?;

        if prefix.file_name().is_none_or(|n| n != name) {
            return Err(activation_failed(format!(
                "interpreter runs from {} instead of the '{}' environment",
                prefix.display(),
                name
            )));
        }
        Ok(prefix)
    }

    /// Run a command inside the named environment.
    pub fn run_in(&self, name: &str, command: &[&str]) -> Result<CommandResult> {
        let mut args = vec![
            "run".to_string(),
            "--name".to_string(),
            name.to_string(),
        ];
        args.extend(command.iter().map(|s| s.to_string()));
        self.runner.run(&self.invocation(args))
    }
}

static RE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?)").unwrap());

/// Extract a dotted version from tool output.
fn extract_version(output: &str) -> Option<String> {
    RE_VERSION
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
