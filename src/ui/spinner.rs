//! Progress spinners.

use indicatif::{ProgressBar, ProgressStyle};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::shell::{OutputCallback, OutputLine};

use super::theme::SetupTheme;
use super::SpinnerHandle;

/// A progress spinner for long-running operations.
pub struct ProgressSpinner {
    bar: ProgressBar,
    theme: SetupTheme,
}

impl ProgressSpinner {
    /// Create a new spinner with a message.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.green} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        Self {
            bar,
            theme: SetupTheme::detect(),
        }
    }

    #[cfg(test)]
    fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            theme: SetupTheme::plain(),
        }
    }

    fn finish_with(&mut self, line: String) {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            self.bar.set_style(style);
        }
        self.bar.finish_with_message(line);
    }
}

impl SpinnerHandle for ProgressSpinner {
    fn set_message(&mut self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn finish_success(&mut self, msg: &str) {
        let line = self.theme.format_success(msg);
        self.finish_with(line);
    }

    fn finish_error(&mut self, msg: &str) {
        let line = self.theme.format_error(msg);
        self.finish_with(line);
    }

    fn finish_skipped(&mut self, msg: &str) {
        let line = self.theme.format_skipped(msg);
        self.finish_with(line);
    }

    fn progress_bar(&self) -> Option<ProgressBar> {
        Some(self.bar.clone())
    }
}

/// Create an output callback for a long-running package manager command.
///
/// With a spinner bar, the last `max_lines` output lines are shown under
/// the base message. Without one, lines are printed only when `echo` is set
/// (verbose mode) and dropped otherwise.
pub fn live_output_callback(
    bar: Option<ProgressBar>,
    base_message: String,
    max_lines: usize,
    echo: bool,
) -> OutputCallback {
    let buffer: Arc<Mutex<VecDeque<String>>> = Arc::new(Mutex::new(VecDeque::new()));
    let theme = SetupTheme::detect();

    Box::new(move |line: OutputLine| {
        let text = match &line {
            OutputLine::Stdout(s) | OutputLine::Stderr(s) => s.trim_end().to_string(),
        };
        if text.is_empty() {
            return;
        }

        let Some(bar) = &bar else {
            if echo {
                println!("    {}", text);
            }
            return;
        };

        if echo {
            bar.println(format!("    {}", text));
            return;
        }

        let display: String = if text.chars().count() > 72 {
            let cut: String = text.chars().take(69).collect();
            format!("{}...", cut)
        } else {
            text
        };

        let Ok(mut buf) = buffer.lock() else {
            return;
        };
        buf.push_back(display);
        while buf.len() > max_lines {
            buf.pop_front();
        }

        let mut msg = base_message.clone();
        for l in buf.iter() {
            msg.push_str("\n  ");
            msg.push_str(&theme.dim.apply_to(format!("» {}", l)).to_string());
        }
        bar.set_message(msg);
    })
}
