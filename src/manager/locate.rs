//! Package manager discovery.
//!
//! Conda installs are frequently not on PATH in non-interactive shells: the
//! `conda init` block lives in `.bashrc`, which `Command::new()` never
//! sources. Discovery therefore checks, in order:
//!
//! 1. An explicit path from the command line or project config
//! 2. The manager's own env var (`CONDA_EXE` / `MAMBA_EXE`)
//! 3. Every `PATH` entry
//! 4. Well-known install roots under `$HOME`, then system-wide roots

use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};

use super::kind::ManagerKind;

/// Install roots relative to the home directory.
const HOME_INSTALL_ROOTS: &[&str] = &[
    "miniconda3",
    "anaconda3",
    "miniforge3",
    "mambaforge",
    "micromamba",
    ".conda",
];

/// Install roots checked as absolute paths.
const SYSTEM_INSTALL_ROOTS: &[&str] = &["/opt/conda", "/opt/miniconda3", "/opt/miniforge3"];

/// How a manager executable was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatedBy {
    Explicit,
    EnvVar,
    Path,
    InstallRoot,
}

/// A package manager executable on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerTool {
    pub kind: ManagerKind,
    pub path: PathBuf,
    pub located_by: LocatedBy,
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

fn is_runnable(path: &Path) -> bool {
    path.is_file() && is_executable(path)
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Does NOT use
/// the `which` command, whose behavior varies across systems.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let names = candidate_names(tool);
    for dir in path_entries {
        for name in &names {
            let candidate = dir.join(name);
            if is_runnable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

fn candidate_names(tool: &str) -> Vec<String> {
    if cfg!(windows) {
        vec![format!("{}.exe", tool), format!("{}.bat", tool), tool.to_string()]
    } else {
        vec![tool.to_string()]
    }
}

/// Locates a manager using an injectable env var lookup.
pub struct ManagerLocator<F>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    env_fn: F,
}

type EnvLookup = fn(&str) -> std::result::Result<String, std::env::VarError>;

fn process_env(key: &str) -> std::result::Result<String, std::env::VarError> {
    std::env::var(key)
}

impl ManagerLocator<EnvLookup> {
    /// Locator backed by the process environment.
    pub fn from_env() -> Self {
        Self {
            env_fn: process_env,
        }
    }
}

impl<F> ManagerLocator<F>
where
    F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
{
    /// Locator with a custom env var lookup (for testing).
    pub fn with_env(env_fn: F) -> Self {
        Self { env_fn }
    }

    /// Find the executable for `kind`.
    ///
    /// An explicit path is authoritative: if it is given but unusable, the
    /// other sources are not consulted.
    pub fn locate(&self, kind: ManagerKind, explicit: Option<&Path>) -> Result<ManagerTool> {
        let found = |path: PathBuf, located_by: LocatedBy| {
            tracing::debug!("Found {} at {} ({:?})", kind, path.display(), located_by);
            ManagerTool {
                kind,
                path,
                located_by,
            }
        };

        if let Some(path) = explicit {
            if is_runnable(path) {
                return Ok(found(path.to_path_buf(), LocatedBy::Explicit));
            }
            return Err(SetupError::ToolNotFound {
                tool: kind.binary().to_string(),
                message: format!("{} is not an executable file", path.display()),
            });
        }

        if let Ok(value) = (self.env_fn)(kind.exe_env_var()) {
            let path = PathBuf::from(value);
            if is_runnable(&path) {
                return Ok(found(path, LocatedBy::EnvVar));
            }
            tracing::debug!(
                "{} points at {}, which is not executable",
                kind.exe_env_var(),
                path.display()
            );
        }

        let path_entries: Vec<PathBuf> = (self.env_fn)("PATH")
            .map(|p| std::env::split_paths(&p).collect())
            .unwrap_or_default();
        if let Some(path) = resolve_tool_path(kind.binary(), &path_entries) {
            return Ok(found(path, LocatedBy::Path));
        }

        let roots = self.install_roots();
        let bins: Vec<PathBuf> = roots.iter().map(|r| r.join(bin_dir())).collect();
        if let Some(path) = resolve_tool_path(kind.binary(), &bins) {
            return Ok(found(path, LocatedBy::InstallRoot));
        }

        Err(SetupError::ToolNotFound {
            tool: kind.binary().to_string(),
            message: format!(
                "not on PATH, ${} is unset, and no install found in {} known locations",
                kind.exe_env_var(),
                roots.len()
            ),
        })
    }

    fn install_roots(&self) -> Vec<PathBuf> {
        let home = (self.env_fn)("HOME")
            .or_else(|_| (self.env_fn)("USERPROFILE"))
            .ok()
            .map(PathBuf::from);

        let mut roots: Vec<PathBuf> = home
            .map(|h| HOME_INSTALL_ROOTS.iter().map(|r| h.join(r)).collect())
            .unwrap_or_default();
        roots.extend(SYSTEM_INSTALL_ROOTS.iter().map(PathBuf::from));
        roots
    }
}

fn bin_dir() -> &'static str {
    if cfg!(windows) {
        "Scripts"
    } else {
        "bin"
    }
}
