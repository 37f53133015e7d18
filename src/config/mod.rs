//! Configuration loading and resolution.
//!
//! - [`schema`] - The optional `.envsetup.yml` project file
//! - [`loader`] - Discovery and flag/config/manifest precedence

pub mod loader;
pub mod schema;

pub use loader::{load_project_config, Overrides, SetupTarget, CONFIG_FILE};
pub use schema::{ProjectConfig, VerifyConfig};
