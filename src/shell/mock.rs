//! Scripted command runner for testing.
//!
//! `ScriptedRunner` implements [`CommandRunner`] without spawning anything.
//! Each invocation is recorded and answered by the first rule whose argument
//! pattern matches, falling back to a plain success.
//!
//! # Example
//!
//! ```
//! use envsetup::shell::{CommandRunner, Invocation, ScriptedRunner};
//!
//! let runner = ScriptedRunner::new()
//!     .respond(&["--version"], 0, "conda 24.1.2");
//!
//! let result = runner.run(&Invocation::new("conda").args(["--version"])).unwrap();
//! assert_eq!(result.stdout, "conda 24.1.2");
//! assert!(runner.was_called(&["--version"]));
//! ```

use std::cell::RefCell;
use std::time::Duration;

use crate::error::Result;

use super::command::{CommandResult, CommandRunner, Invocation, OutputCallback, OutputLine};

struct Rule {
    pattern: Vec<String>,
    exit_code: i32,
    stdout: String,
    stderr: String,
}

/// Command runner that replays canned results.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    /// Create a runner where every invocation succeeds with no output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer invocations containing `pattern` with `exit_code` and `stdout`.
    ///
    /// Rules are checked in insertion order.
    pub fn respond(self, pattern: &[&str], exit_code: i32, stdout: &str) -> Self {
        self.respond_full(pattern, exit_code, stdout, "")
    }

    /// Like [`respond`](Self::respond) with stderr as well.
    pub fn respond_full(
        mut self,
        pattern: &[&str],
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        self.rules.push(Rule {
            pattern: pattern.iter().map(|s| s.to_string()).collect(),
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        });
        self
    }

    /// All invocations seen so far.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Whether any invocation contained `pattern`.
    pub fn was_called(&self, pattern: &[&str]) -> bool {
        self.calls.borrow().iter().any(|c| c.has_args(pattern))
    }

    /// Position of the first invocation containing `pattern`.
    pub fn call_index(&self, pattern: &[&str]) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c.has_args(pattern))
    }

    fn answer(&self, invocation: &Invocation) -> CommandResult {
        self.calls.borrow_mut().push(invocation.clone());

        let pattern_matches = |rule: &&Rule| {
            let needle: Vec<&str> = rule.pattern.iter().map(String::as_str).collect();
            invocation.has_args(&needle)
        };

        match self.rules.iter().find(pattern_matches) {
            Some(rule) if rule.exit_code == 0 => {
                CommandResult::success(rule.stdout.clone(), rule.stderr.clone(), Duration::ZERO)
            }
            Some(rule) => CommandResult::failure(
                Some(rule.exit_code),
                rule.stdout.clone(),
                rule.stderr.clone(),
                Duration::ZERO,
            ),
            None => CommandResult::success(String::new(), String::new(), Duration::ZERO),
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        Ok(self.answer(invocation))
    }

    fn run_streaming(
        &self,
        invocation: &Invocation,
        callback: OutputCallback,
    ) -> Result<CommandResult> {
        let result = self.answer(invocation);
        for line in result.stdout.lines() {
            callback(OutputLine::Stdout(line.to_string()));
        }
        for line in result.stderr.lines() {
            callback(OutputLine::Stderr(line.to_string()));
        }
        Ok(result)
    }
}
