//! Command-line interface for envsetup.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, SetupArgs, StatusArgs, TargetArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
