//! Shared display helpers for failures.
//!
//! Both `setup` and `status` end a failed run the same way: the error line,
//! then the captured command output if there is any, then a hint.

use crate::error::SetupError;
use crate::ui::UserInterface;

/// Short label for the subordinate command behind an error, if any.
pub fn failed_command(err: &SetupError) -> Option<&'static str> {
    match err {
        SetupError::EnvironmentCreateFailed { .. } => Some("env create"),
        SetupError::EnvironmentRemoveFailed { .. } => Some("env remove"),
        _ => None,
    }
}

/// Print an error with its captured output and remedy.
pub fn report_failure(ui: &mut dyn UserInterface, err: &SetupError) {
    ui.error(&err.to_string());
    let hint = err.hint();
    match (failed_command(err), err.output()) {
        (Some(command), Some(output)) => ui.show_error_block(command, output, hint.as_deref()),
        _ => {
            if let Some(h) = hint {
                ui.show_hint(&h);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::path::PathBuf;

    #[test]
    fn creation_failure_shows_output_block() {
        let mut ui = MockUI::new();
        let err = SetupError::EnvironmentCreateFailed {
            name: "PDFTranslator".into(),
            code: Some(1),
            output: "ResolvePackageNotFound".into(),
        };
        report_failure(&mut ui, &err);

        assert!(ui.has_error("Failed to create environment 'PDFTranslator'"));
        let blocks = ui.error_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].0, "env create");
        assert!(blocks[0].1.contains("ResolvePackageNotFound"));
        assert!(ui.has_hint("--recreate"));
    }

    #[test]
    fn plain_error_shows_hint_only() {
        let mut ui = MockUI::new();
        let err = SetupError::ManifestNotFound {
            path: PathBuf::from("environment.yml"),
        };
        report_failure(&mut ui, &err);

        assert!(ui.error_blocks().is_empty());
        assert!(ui.has_hint("--file"));
    }

    #[test]
    fn error_without_hint() {
        let mut ui = MockUI::new();
        let err = SetupError::EnvironmentListFailed {
            message: "bad json".into(),
        };
        report_failure(&mut ui, &err);
        assert!(ui.hints().is_empty());
        assert!(ui.has_error("bad json"));
    }
}
