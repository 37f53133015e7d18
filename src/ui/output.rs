//! Output verbosity.

/// How much of a setup run reaches the terminal.
///
/// Errors, warnings and the final status are shown in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Stream conda's own output under the active spinner.
    Verbose,
    /// Spinners, status lines and the closing summary.
    #[default]
    Normal,
    /// Status lines only; no summary table, no per-step start lines.
    Quiet,
}

impl OutputMode {
    /// Whether package manager output is echoed while a step runs.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Whether summaries and step start lines are printed.
    pub fn shows_detail(&self) -> bool {
        !matches!(self, Self::Quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_verbose_shows_command_output() {
        assert!(OutputMode::Verbose.shows_command_output());
        assert!(!OutputMode::Normal.shows_command_output());
        assert!(!OutputMode::Quiet.shows_command_output());
    }

    #[test]
    fn quiet_hides_detail() {
        assert!(OutputMode::Verbose.shows_detail());
        assert!(OutputMode::Normal.shows_detail());
        assert!(!OutputMode::Quiet.shows_detail());
    }

    #[test]
    fn normal_is_default() {
        assert_eq!(OutputMode::default(), OutputMode::Normal);
    }
}
