//! Package manager discovery and environment operations.
//!
//! # Modules
//!
//! - [`kind`] - Supported managers and their command-line dialects
//! - [`locate`] - Finding the manager executable
//! - [`registry`] - Parsing the environment registry
//! - [`client`] - Remove, create, hook, activate and run-in operations

pub mod client;
pub mod kind;
pub mod locate;
pub mod registry;

pub use client::EnvironmentManager;
pub use kind::ManagerKind;
pub use locate::{resolve_tool_path, LocatedBy, ManagerLocator, ManagerTool};
pub use registry::{EnvironmentList, EnvironmentState};
