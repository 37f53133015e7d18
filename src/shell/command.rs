//! Process execution.

use crate::error::{Result, SetupError};
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// A program and its arguments, run without shell interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable to run.
    pub program: PathBuf,

    /// Arguments passed verbatim.
    pub args: Vec<String>,

    /// Working directory.
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    /// Create an invocation of `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Append arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn current_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Whether the argument list contains `needle` as a contiguous run.
    pub fn has_args(&self, needle: &[&str]) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.args
            .windows(needle.len())
            .any(|w| w.iter().zip(needle).all(|(a, b)| a == b))
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let program = self
            .program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string());
        write!(f, "{}", program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Last `lines` lines of combined output, stderr after stdout.
    pub fn output_tail(&self, lines: usize) -> String {
        let combined: Vec<&str> = self
            .stdout
            .lines()
            .chain(self.stderr.lines())
            .filter(|l| !l.trim().is_empty())
            .collect();
        let start = combined.len().saturating_sub(lines);
        combined[start..].join("\n")
    }
}

/// Output line from command execution.
#[derive(Debug, Clone)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Callback for streaming output.
pub type OutputCallback = Box<dyn Fn(OutputLine) + Send>;

/// Seam between setup logic and process spawning.
pub trait CommandRunner {
    /// Run to completion, capturing output.
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;

    /// Run to completion, relaying each output line to `callback` as it arrives.
    fn run_streaming(
        &self,
        invocation: &Invocation,
        callback: OutputCallback,
    ) -> Result<CommandResult>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        execute(invocation)
    }

    fn run_streaming(
        &self,
        invocation: &Invocation,
        callback: OutputCallback,
    ) -> Result<CommandResult> {
        execute_streaming(invocation, callback)
    }
}

/// Execute a command, capturing stdout and stderr.
pub fn execute(invocation: &Invocation) -> Result<CommandResult> {
    let start = Instant::now();
    tracing::debug!("Running {}", invocation);

    let mut cmd = invocation.to_command();
    cmd.stdin(Stdio::null());

    let output = cmd.output().map_err(|e| {
        tracing::debug!("Failed to spawn {}: {}", invocation.program.display(), e);
        SetupError::CommandFailed {
            command: invocation.to_string(),
            code: None,
        }
    })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    tracing::debug!(
        "{} exited with {:?} after {:?}",
        invocation,
        output.status.code(),
        duration
    );

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Execute a command with streaming output.
pub fn execute_streaming(
    invocation: &Invocation,
    callback: OutputCallback,
) -> Result<CommandResult> {
    let start = Instant::now();
    tracing::debug!("Running (streaming) {}", invocation);

    let mut cmd = invocation.to_command();
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let spawn_failed = || SetupError::CommandFailed {
        command: invocation.to_string(),
        code: None,
    };

    let mut child = cmd.spawn().map_err(|_| spawn_failed())?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow::anyhow!("stdout pipe missing for {}", invocation))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow::anyhow!("stderr pipe missing for {}", invocation))?;

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle = thread::spawn(move || {
        let reader = BufReader::new(stdout);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stdout.send(OutputLine::Stdout(line));
        }
        output
    });

    let stderr_handle = thread::spawn(move || {
        let reader = BufReader::new(stderr);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stderr.send(OutputLine::Stderr(line));
        }
        output
    });

    for line in rx {
        callback(line);
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child.wait().map_err(|_| spawn_failed())?;
    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(
            stdout_output,
            stderr_output,
            duration,
        ))
    } else {
        Ok(CommandResult::failure(
            status.code(),
            stdout_output,
            stderr_output,
            duration,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let inv = Invocation::new("/opt/conda/bin/conda").args([
            "run",
            "--name",
            "env",
            "python",
            "-c",
            "import sys; print(sys.prefix)",
        ]);
        assert_eq!(
            inv.to_string(),
            "conda run --name env python -c \"import sys; print(sys.prefix)\""
        );
    }

    #[test]
    fn has_args_matches_contiguous_run() {
        let inv = Invocation::new("conda").args(["env", "list", "--json"]);
        assert!(inv.has_args(&["env", "list"]));
        assert!(inv.has_args(&["--json"]));
        assert!(!inv.has_args(&["env", "--json"]));
        assert!(inv.has_args(&[]));
    }

    #[test]
    fn output_tail_keeps_last_lines() {
        let result = CommandResult::failure(
            Some(1),
            "one\ntwo\n\nthree\n".to_string(),
            "four\n".to_string(),
            Duration::ZERO,
        );
        assert_eq!(result.output_tail(2), "three\nfour");
        assert_eq!(result.output_tail(10), "one\ntwo\nthree\nfour");
    }

    #[cfg(unix)]
    #[test]
    fn execute_successful_command() {
        let result = execute(&Invocation::new("echo").args(["hello"])).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_failing_command() {
        let result = execute(&Invocation::new("sh").args(["-c", "exit 3"])).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn execute_missing_program_is_command_failed() {
        let err = execute(&Invocation::new("this-command-does-not-exist-12345")).unwrap_err();
        assert!(matches!(err, SetupError::CommandFailed { code: None, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = execute(&Invocation::new("pwd").current_dir(temp.path())).unwrap();
        assert!(result.success);
    }

    #[cfg(unix)]
    #[test]
    fn execute_streaming_captures_both_streams() {
        use std::sync::{Arc, Mutex};

        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_clone = Arc::clone(&lines);

        let callback: OutputCallback = Box::new(move |line| {
            lines_clone.lock().unwrap().push(line);
        });

        let inv = Invocation::new("sh").args(["-c", "echo line1; echo line2; echo oops >&2"]);
        let result = execute_streaming(&inv, callback).unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("line2"));
        assert!(result.stderr.contains("oops"));

        let captured = lines.lock().unwrap();
        assert_eq!(captured.len(), 3);
        assert!(captured.iter().any(|l| matches!(l, OutputLine::Stderr(_))));
    }
}
