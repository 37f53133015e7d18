//! Project configuration schema (`.envsetup.yml`).
//!
//! ```yaml
//! manifest: environment.yml
//! env_name: PDFTranslator
//! manager: conda
//! conda_exe: /opt/conda/bin/conda
//! verify:
//!   pip_check: true
//!   imports: [fitz, ebooklib]
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::manager::ManagerKind;

/// Defaults for a project, overridden by command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Manifest path, relative to the project root.
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    /// Environment name; takes precedence over the manifest's `name`.
    #[serde(default)]
    pub env_name: Option<String>,

    #[serde(default)]
    pub manager: Option<ManagerKind>,

    /// Explicit package manager executable.
    #[serde(default)]
    pub conda_exe: Option<PathBuf>,

    #[serde(default)]
    pub verify: VerifyConfig,
}

/// Post-install checks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifyConfig {
    /// Run `pip check` inside the environment.
    #[serde(default = "default_true")]
    pub pip_check: bool,

    /// Modules that must import cleanly.
    #[serde(default)]
    pub imports: Vec<String>,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            pip_check: true,
            imports: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}
