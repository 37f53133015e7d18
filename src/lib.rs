//! envsetup - Provision a named conda environment from an environment manifest.
//!
//! The procedure is linear: confirm the package manager runs, confirm the
//! manifest is usable, check whether the environment exists, optionally
//! remove it, create it if needed, then prove it can be activated.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - `.envsetup.yml` loading and flag precedence
//! - [`error`] - Error types and result aliases
//! - [`manager`] - Package manager discovery and operations
//! - [`manifest`] - `environment.yml` parsing and validation
//! - [`setup`] - The setup procedure and its summary
//! - [`shell`] - Process execution and platform probes
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use envsetup::manager::EnvironmentState;
//! use envsetup::setup::SetupPlan;
//!
//! // An existing environment is only touched when recreation is requested
//! let plan = SetupPlan::decide(&EnvironmentState::Absent, false);
//! assert!(plan.create && !plan.remove);
//! ```
//!
//! For runs against a package manager, see the integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod manager;
pub mod manifest;
pub mod setup;
pub mod shell;
pub mod ui;

pub use error::{Result, SetupError};
