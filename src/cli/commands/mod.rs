//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! Commands are dispatched via [`CommandDispatcher`]. A bare `envsetup`
//! invocation routes to [`setup`].

pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod setup;
pub mod status;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
