//! Environment manifest (`environment.yml`) handling.
//!
//! The manifest is handed to the package manager as-is. It is parsed only to
//! learn the environment name, to summarise what will be installed, and to
//! surface advisory warnings before a long solve.

pub mod document;
pub mod name;

pub use document::{package_name, Dependency, EnvironmentManifest, ManifestSummary};
pub use name::{validate_env_name, DEFAULT_ENV_NAME};

/// File name looked up in the project root when no manifest path is given.
pub const DEFAULT_MANIFEST: &str = "environment.yml";
