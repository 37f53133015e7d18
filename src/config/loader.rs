//! Configuration discovery and resolution.
//!
//! Precedence, highest first: command-line flags, `.envsetup.yml` in the
//! project root, the manifest's own `name`, built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{ProjectConfig, VerifyConfig};
use crate::error::{Result, SetupError};
use crate::manager::ManagerKind;
use crate::manifest::{EnvironmentManifest, DEFAULT_ENV_NAME, DEFAULT_MANIFEST};

/// Project config file name.
pub const CONFIG_FILE: &str = ".envsetup.yml";

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub manifest: Option<PathBuf>,
    pub env_name: Option<String>,
    pub manager: Option<ManagerKind>,
    pub conda_exe: Option<PathBuf>,
}

/// Everything a setup or status run needs to know about its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct SetupTarget {
    pub project_root: PathBuf,
    pub manifest_path: PathBuf,
    /// Name from flags or project config; the manifest is consulted otherwise.
    pub env_name_override: Option<String>,
    pub manager: ManagerKind,
    pub conda_exe: Option<PathBuf>,
    pub verify: VerifyConfig,
}

impl SetupTarget {
    /// Merge overrides with the project config found under `project_root`.
    pub fn resolve(project_root: &Path, overrides: &Overrides) -> Result<Self> {
        let config = load_project_config(project_root)?.unwrap_or_default();
        Ok(Self::from_parts(project_root, overrides, config))
    }

    pub fn from_parts(project_root: &Path, overrides: &Overrides, config: ProjectConfig) -> Self {
        let manifest = overrides
            .manifest
            .clone()
            .or(config.manifest)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));

        Self {
            project_root: project_root.to_path_buf(),
            manifest_path: absolutize(project_root, manifest),
            env_name_override: overrides.env_name.clone().or(config.env_name),
            manager: overrides.manager.or(config.manager).unwrap_or_default(),
            conda_exe: overrides
                .conda_exe
                .clone()
                .or(config.conda_exe)
                .map(|p| absolutize(project_root, p)),
            verify: config.verify,
        }
    }

    /// Final environment name once the manifest is known.
    pub fn env_name(&self, manifest: &EnvironmentManifest) -> String {
        self.env_name_override
            .clone()
            .or_else(|| manifest.name.clone())
            .unwrap_or_else(|| DEFAULT_ENV_NAME.to_string())
    }
}

fn absolutize(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

/// Load `.envsetup.yml` from the project root, if present.
pub fn load_project_config(project_root: &Path) -> Result<Option<ProjectConfig>> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    tracing::debug!("Loading project config from {}", path.display());
    let content = fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Ok(Some(ProjectConfig::default()));
    }

    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|e| SetupError::ConfigParseError {
            path,
            message: e.to_string(),
        })
}
