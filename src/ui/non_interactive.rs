//! Non-interactive UI for CI/headless environments.

use crate::setup::SetupSummary;

use super::progress::format_duration;
use super::theme::SetupTheme;
use super::{OutputMode, SpinnerHandle, UserInterface};

/// UI implementation for pipes, CI logs and redirected output.
///
/// Spinners degrade to one line when started and one when finished. Status
/// goes to stdout; warnings and errors go to stderr.
pub struct NonInteractiveUI {
    mode: OutputMode,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn success(&mut self, msg: &str) {
        println!("{}", SetupTheme::plain().format_success(msg));
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("{}", SetupTheme::plain().format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", SetupTheme::plain().format_error(msg));
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_detail() {
            println!("  {}", message);
        }
        Box::new(LineSpinner)
    }

    fn show_header(&mut self, title: &str) {
        println!("\n{}\n", title);
    }

    fn show_hint(&mut self, hint: &str) {
        println!("  {}", SetupTheme::plain().format_hint(hint));
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        eprintln!();
        eprintln!("    ┌─ Command ──────────────────────────");
        eprintln!("    │ {}", command);
        if !output.is_empty() {
            eprintln!("    ├─ Output ───────────────────────────");
            for line in output.lines() {
                eprintln!("    │ {}", line);
            }
        }
        eprintln!("    └────────────────────────────────────");
        if let Some(h) = hint {
            eprintln!();
            eprintln!("    Hint: {}", h);
        }
    }

    fn show_summary(&mut self, summary: &SetupSummary) {
        if !self.mode.shows_detail() {
            return;
        }

        println!();
        println!("  ┌─ Summary ──────────────────────────");
        for record in &summary.steps {
            let right = record
                .duration
                .map(format_duration)
                .or_else(|| record.detail.clone())
                .unwrap_or_default();
            println!(
                "  │ {} {:<22} {}",
                record.status.icon(),
                record.step.label(),
                right
            );
        }
        println!("  ├────────────────────────────────────");
        println!("  │ Total: {}", format_duration(summary.total_duration));
        println!("  └────────────────────────────────────");
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner that prints its final state as a single line.
struct LineSpinner;

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        println!("{}", SetupTheme::plain().format_success(msg));
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("{}", SetupTheme::plain().format_error(msg));
    }

    fn finish_skipped(&mut self, msg: &str) {
        println!("{}", SetupTheme::plain().format_skipped(msg));
    }
}
