//! Supported package managers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shell::ShellType;

/// A conda-compatible package manager.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ManagerKind {
    #[default]
    Conda,
    Mamba,
}

impl ManagerKind {
    /// Executable name looked up on PATH.
    pub fn binary(&self) -> &'static str {
        match self {
            ManagerKind::Conda => "conda",
            ManagerKind::Mamba => "mamba",
        }
    }

    /// Environment variable the manager's own activation scripts export.
    pub fn exe_env_var(&self) -> &'static str {
        match self {
            ManagerKind::Conda => "CONDA_EXE",
            ManagerKind::Mamba => "MAMBA_EXE",
        }
    }

    /// Arguments that print the activation hook for `shell`.
    pub fn hook_args(&self, shell: ShellType) -> Vec<String> {
        match self {
            ManagerKind::Conda => vec![format!("shell.{}", shell.hook_name()), "hook".to_string()],
            ManagerKind::Mamba => vec![
                "shell".to_string(),
                "hook".to_string(),
                "--shell".to_string(),
                shell.hook_name().to_string(),
            ],
        }
    }
}

impl fmt::Display for ManagerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conda_hook_args() {
        assert_eq!(
            ManagerKind::Conda.hook_args(ShellType::Zsh),
            vec!["shell.zsh", "hook"]
        );
    }

    #[test]
    fn mamba_hook_args() {
        assert_eq!(
            ManagerKind::Mamba.hook_args(ShellType::Bash),
            vec!["shell", "hook", "--shell", "bash"]
        );
    }

    #[test]
    fn deserializes_lowercase() {
        let kind: ManagerKind = serde_yaml::from_str("mamba").unwrap();
        assert_eq!(kind, ManagerKind::Mamba);
        assert!(serde_yaml::from_str::<ManagerKind>("pip").is_err());
    }

    #[test]
    fn defaults_to_conda() {
        assert_eq!(ManagerKind::default(), ManagerKind::Conda);
        assert_eq!(ManagerKind::Conda.exe_env_var(), "CONDA_EXE");
    }
}
