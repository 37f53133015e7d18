//! Error types for envsetup operations.
//!
//! This module defines [`SetupError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Every fatal setup step maps to its own `SetupError` variant
//! - Use `anyhow::Error` (via `SetupError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users; [`SetupError::hint`]
//!   adds a remedy where one exists

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for envsetup operations.
#[derive(Debug, Error)]
pub enum SetupError {
    /// The package manager executable could not be located or run.
    #[error("Package manager '{tool}' not found: {message}")]
    ToolNotFound { tool: String, message: String },

    /// Environment manifest not found at expected location.
    #[error("Environment manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Failed to parse the environment manifest.
    #[error("Failed to parse manifest at {path}: {message}")]
    ManifestParseError { path: PathBuf, message: String },

    /// Failed to parse the project configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// The environment name cannot be used.
    #[error("Invalid environment name '{name}': {reason}")]
    InvalidEnvironmentName { name: String, reason: String },

    /// The manager's environment registry could not be read.
    #[error("Could not list environments: {message}")]
    EnvironmentListFailed { message: String },

    /// Removing an existing environment failed.
    #[error("Failed to remove environment '{name}' (exit code {code:?})")]
    EnvironmentRemoveFailed {
        name: String,
        code: Option<i32>,
        output: String,
    },

    /// Creating the environment from the manifest failed.
    #[error("Failed to create environment '{name}' (exit code {code:?})")]
    EnvironmentCreateFailed {
        name: String,
        code: Option<i32>,
        output: String,
    },

    /// The manager could not emit its shell hook.
    #[error("Shell hook initialization failed for {shell}: {message}")]
    ShellHookFailed { shell: String, message: String },

    /// The environment could not be entered.
    #[error("Failed to activate environment '{name}': {message}")]
    ActivationFailed { name: String, message: String },

    /// A subordinate command failed to start or exited abnormally.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SetupError {
    /// A short remedy to show below the error, if one applies.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::ToolNotFound { tool, .. } => Some(format!(
                "Install Miniconda or Miniforge, or pass --conda-exe with the path to '{}'",
                tool
            )),
            Self::ManifestNotFound { .. } => {
                Some("Run from the project root or pass --file <environment.yml>".to_string())
            }
            Self::InvalidEnvironmentName { .. } => {
                Some("Pass --name or set `name:` in the manifest".to_string())
            }
            Self::EnvironmentCreateFailed { .. } => Some(
                "Check the manifest pins, then rerun with --recreate to start from scratch"
                    .to_string(),
            ),
            Self::EnvironmentRemoveFailed { name, .. } => Some(format!(
                "Close any shell with '{}' activated and try again",
                name
            )),
            Self::ShellHookFailed { .. } => {
                Some("Run `conda init` for your shell and open a new terminal".to_string())
            }
            _ => None,
        }
    }

    /// Captured process output attached to the error, if any.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::EnvironmentRemoveFailed { output, .. }
            | Self::EnvironmentCreateFailed { output, .. } => Some(output.as_str()),
            _ => None,
        }
    }
}

/// Result type alias for envsetup operations.
pub type Result<T> = std::result::Result<T, SetupError>;
