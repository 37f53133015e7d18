//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::setup::SetupSummary;

use super::progress::format_duration;
use super::{
    NonInteractiveUI, OutputMode, ProgressSpinner, SetupTheme, SpinnerHandle, UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    err: Term,
    theme: SetupTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            term: Term::stdout(),
            err: Term::stderr(),
            theme: SetupTheme::detect(),
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        writeln!(self.term, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        Box::new(ProgressSpinner::new(message))
    }

    fn show_header(&mut self, title: &str) {
        writeln!(self.term).ok();
        writeln!(self.term, "{}", self.theme.format_header(title)).ok();
        writeln!(self.term).ok();
    }

    fn show_hint(&mut self, hint: &str) {
        writeln!(self.term, "  {}", self.theme.format_hint(hint)).ok();
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        let border = &self.theme.border;
        writeln!(self.err).ok();
        writeln!(
            self.err,
            "    {} {}",
            border.apply_to("┌─"),
            self.theme.command.apply_to(command)
        )
        .ok();
        for line in output.lines() {
            writeln!(self.err, "    {} {}", border.apply_to("│"), line).ok();
        }
        writeln!(self.err, "    {}", border.apply_to("└─")).ok();
        if let Some(h) = hint {
            writeln!(self.err, "    {}", self.theme.format_hint(h)).ok();
        }
    }

    fn show_summary(&mut self, summary: &SetupSummary) {
        if !self.mode.shows_detail() {
            return;
        }

        writeln!(self.term).ok();
        for record in &summary.steps {
            let right = record
                .duration
                .map(format_duration)
                .or_else(|| record.detail.clone())
                .unwrap_or_default();
            writeln!(
                self.term,
                "  {} {:<22} {}",
                record.status.icon(),
                record.step.label(),
                self.theme.dim.apply_to(right)
            )
            .ok();
        }
        writeln!(
            self.term,
            "  {}",
            self.theme
                .dim
                .apply_to(format!("Total: {}", format_duration(summary.total_duration)))
        )
        .ok();
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_ui_reports_mode() {
        let ui = TerminalUI::new(OutputMode::Quiet);
        assert_eq!(ui.output_mode(), OutputMode::Quiet);
        assert!(ui.is_interactive());
    }

    #[test]
    fn create_ui_non_interactive() {
        let ui = create_ui(false, OutputMode::Normal);
        assert!(!ui.is_interactive());
    }
}
