//! The package manager's environment registry (`env list --json`).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SetupError};

/// Whether a named environment exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentState {
    Absent,
    Present { prefix: PathBuf },
}

impl EnvironmentState {
    pub fn exists(&self) -> bool {
        matches!(self, EnvironmentState::Present { .. })
    }

    pub fn prefix(&self) -> Option<&Path> {
        match self {
            EnvironmentState::Present { prefix } => Some(prefix),
            EnvironmentState::Absent => None,
        }
    }
}

/// Environment prefixes known to the manager.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentList {
    #[serde(default)]
    pub envs: Vec<PathBuf>,
}

impl EnvironmentList {
    /// Parse the JSON printed by `env list --json`.
    ///
    /// Some conda versions print deprecation notices before the document, so
    /// parsing starts at the first `{`.
    pub fn parse(output: &str) -> Result<Self> {
        let start = output
            .find('{')
            .ok_or_else(|| SetupError::EnvironmentListFailed {
                message: "no JSON object in output".to_string(),
            })?;
        serde_json::from_str(&output[start..]).map_err(|e| SetupError::EnvironmentListFailed {
            message: e.to_string(),
        })
    }

    /// Look up a named environment by the final component of its prefix.
    ///
    /// Only prefixes inside an `envs` directory are named environments. The
    /// install root is listed too, but the manager calls it `base`.
    pub fn state_of(&self, name: &str) -> EnvironmentState {
        self.envs
            .iter()
            .filter(|prefix| is_named_env(prefix))
            .find(|prefix| prefix.file_name().is_some_and(|n| n == name))
            .map(|prefix| EnvironmentState::Present {
                prefix: prefix.clone(),
            })
            .unwrap_or(EnvironmentState::Absent)
    }
}

fn is_named_env(prefix: &Path) -> bool {
    prefix
        .parent()
        .and_then(Path::file_name)
        .is_some_and(|dir| dir == "envs")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST: &str = r#"{
  "envs": [
    "/home/dev/miniconda3",
    "/home/dev/miniconda3/envs/PDFTranslator",
    "/home/dev/miniconda3/envs/scratch"
  ]
}"#;

    #[test]
    fn finds_named_environment() {
        let list = EnvironmentList::parse(LIST).unwrap();
        let state = list.state_of("PDFTranslator");
        assert!(state.exists());
        assert_eq!(
            state.prefix(),
            Some(Path::new("/home/dev/miniconda3/envs/PDFTranslator"))
        );
    }

    #[test]
    fn name_match_is_exact() {
        let list = EnvironmentList::parse(LIST).unwrap();
        assert_eq!(list.state_of("PDF"), EnvironmentState::Absent);
        assert_eq!(list.state_of("pdftranslator"), EnvironmentState::Absent);
    }

    #[test]
    fn install_root_is_not_a_named_environment() {
        let list = EnvironmentList::parse(r#"{"envs": ["/opt/conda"]}"#).unwrap();
        assert_eq!(list.state_of("conda"), EnvironmentState::Absent);

        let list = EnvironmentList::parse(LIST).unwrap();
        assert_eq!(list.state_of("miniconda3"), EnvironmentState::Absent);
        assert!(list.state_of("scratch").exists());
    }

    #[test]
    fn tolerates_leading_noise() {
        let output = format!("==> WARNING: A newer version of conda exists. <==\n{}", LIST);
        let list = EnvironmentList::parse(&output).unwrap();
        assert_eq!(list.envs.len(), 3);
    }

    #[test]
    fn missing_envs_key_is_empty() {
        let list = EnvironmentList::parse("{}").unwrap();
        assert!(list.envs.is_empty());
    }

    #[test]
    fn rejects_non_json() {
        let err = EnvironmentList::parse("CondaError: bad").unwrap_err();
        assert!(matches!(err, SetupError::EnvironmentListFailed { .. }));
        assert!(EnvironmentList::parse("{\"envs\": [").is_err());
    }
}
