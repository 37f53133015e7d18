//! Environment manifest model.
//!
//! Only the fields the setup procedure reads are modelled. Installation
//! semantics stay with the package manager; unknown top-level keys such as
//! `variables` are ignored.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SetupError};

/// Parsed `environment.yml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentManifest {
    /// Environment name declared by the manifest.
    #[serde(default)]
    pub name: Option<String>,

    /// Channels searched for packages.
    #[serde(default)]
    pub channels: Vec<String>,

    /// Package specs, possibly with a nested `pip:` section.
    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    /// Explicit install prefix, if pinned.
    #[serde(default)]
    pub prefix: Option<String>,
}

/// A single entry in the `dependencies` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    /// A conda match spec, e.g. `python=3.10` or `numpy>=1.26`.
    Package(String),

    /// Packages installed by pip after the conda solve.
    Pip { pip: Vec<String> },
}

/// Counts shown before creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSummary {
    pub conda_packages: usize,
    pub pip_packages: usize,
    pub channels: usize,
    /// Version constraint declared for `python`, if any.
    pub python: Option<String>,
}

impl EnvironmentManifest {
    /// Load and parse a manifest.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SetupError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }

        let parse_error = |message: String| SetupError::ManifestParseError {
            path: path.to_path_buf(),
            message,
        };
        let content = fs::read_to_string(path).map_err(|e| parse_error(e.to_string()))?;
        Self::parse(&content).map_err(parse_error)
    }

    /// Parse manifest text.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Err("manifest is empty".to_string());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Conda match specs, in declaration order.
    pub fn conda_specs(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().filter_map(|d| match d {
            Dependency::Package(spec) => Some(spec.as_str()),
            Dependency::Pip { .. } => None,
        })
    }

    /// Pip requirement strings, across all `pip:` sections.
    pub fn pip_specs(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .filter_map(|d| match d {
                Dependency::Pip { pip } => Some(pip.iter().map(String::as_str)),
                Dependency::Package(_) => None,
            })
            .flatten()
    }

    pub fn summary(&self) -> ManifestSummary {
        let python = self
            .conda_specs()
            .find(|spec| package_name(spec) == "python")
            .map(|spec| constraint(spec).to_string())
            .filter(|constraint| !constraint.is_empty());

        ManifestSummary {
            conda_packages: self.conda_specs().count(),
            pip_packages: self.pip_specs().count(),
            channels: self.channels.len(),
            python,
        }
    }

    /// Advisory problems that do not stop setup.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.dependencies.is_empty() {
            warnings.push("Manifest declares no dependencies".to_string());
        }

        let has_pip_section = self
            .dependencies
            .iter()
            .any(|d| matches!(d, Dependency::Pip { .. }));
        if has_pip_section && !self.conda_specs().any(|s| package_name(s) == "pip") {
            warnings.push(
                "Manifest has a pip section but does not list 'pip' as a dependency".to_string(),
            );
        }

        let mut seen = HashSet::new();
        for spec in self.conda_specs() {
            let name = package_name(spec);
            if !seen.insert(name.to_string()) {
                warnings.push(format!("Package '{}' is listed more than once", name));
            }
        }

        if self.prefix.is_some() {
            warnings.push(
                "Manifest sets a prefix; it is ignored and the environment is created by name"
                    .to_string(),
            );
        }

        warnings
    }
}

/// Package name of a conda match spec or pip requirement.
///
/// `conda-forge::numpy>=1.26` yields `numpy`.
pub fn package_name(spec: &str) -> &str {
    let spec = spec.trim();
    let spec = spec.rsplit("::").next().unwrap_or(spec);
    let end = spec
        .find(|c: char| matches!(c, '=' | '<' | '>' | '!' | '~' | ' ' | '[' | ';' | '@'))
        .unwrap_or(spec.len());
    &spec[..end]
}

/// Version constraint of a spec, with the package name removed.
fn constraint(spec: &str) -> &str {
    let spec = spec.trim();
    let spec = spec.rsplit("::").next().unwrap_or(spec);
    spec[package_name(spec).len()..].trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
name: PDFTranslator
channels:
  - conda-forge
  - defaults
dependencies:
  - python=3.10
  - pip
  - pymupdf=1.23
  - pip:
      - ebooklib==0.18
      - langchain>=0.1
      - streamlit
"#;

    #[test]
    fn parses_name_channels_and_dependencies() {
        let manifest = EnvironmentManifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("PDFTranslator"));
        assert_eq!(manifest.channels, vec!["conda-forge", "defaults"]);
        assert_eq!(manifest.dependencies.len(), 4);
        assert!(matches!(
            &manifest.dependencies[3],
            Dependency::Pip { pip } if pip.len() == 3
        ));
    }

    #[test]
    fn summary_counts_packages_and_python() {
        let summary = EnvironmentManifest::parse(MANIFEST).unwrap().summary();
        assert_eq!(summary.conda_packages, 3);
        assert_eq!(summary.pip_packages, 3);
        assert_eq!(summary.channels, 2);
        assert_eq!(summary.python.as_deref(), Some("=3.10"));
    }

    #[test]
    fn well_formed_manifest_has_no_warnings() {
        let manifest = EnvironmentManifest::parse(MANIFEST).unwrap();
        assert!(manifest.warnings().is_empty());
    }

    #[test]
    fn warns_when_pip_section_lacks_pip() {
        let manifest = EnvironmentManifest::parse(
            "name: x\ndependencies:\n  - python\n  - pip:\n      - requests\n",
        )
        .unwrap();
        let warnings = manifest.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("pip section"));
    }

    #[test]
    fn warns_on_duplicates_and_empty() {
        let dup = EnvironmentManifest::parse("dependencies: [numpy=1.26, numpy]").unwrap();
        assert!(dup.warnings().iter().any(|w| w.contains("'numpy'")));

        let empty = EnvironmentManifest::parse("name: bare").unwrap();
        assert!(empty.warnings()[0].contains("no dependencies"));
    }

    #[test]
    fn name_is_optional() {
        let manifest = EnvironmentManifest::parse("dependencies: [python]").unwrap();
        assert!(manifest.name.is_none());
        assert!(manifest.summary().python.is_none());
    }

    #[test]
    fn rejects_empty_and_malformed_documents() {
        assert!(EnvironmentManifest::parse("   \n").is_err());
        assert!(EnvironmentManifest::parse("dependencies: {python: 3}").is_err());
        assert!(EnvironmentManifest::parse("name: [unclosed").is_err());
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = EnvironmentManifest::load(&temp.path().join("environment.yml")).unwrap_err();
        assert!(matches!(err, SetupError::ManifestNotFound { .. }));
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("environment.yml");
        fs::write(&path, "dependencies: 7").unwrap();
        let err = EnvironmentManifest::load(&path).unwrap_err();
        match err {
            SetupError::ManifestParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("Expected ManifestParseError, got {:?}", other),
        }
    }

    #[test]
    fn non_utf8_manifest_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("environment.yml");
        fs::write(&path, b"name: \xff\xfe").unwrap();
        let err = EnvironmentManifest::load(&path).unwrap_err();
        match err {
            SetupError::ManifestParseError { path: p, message } => {
                assert_eq!(p, path);
                assert!(message.contains("UTF-8"));
            }
            other => panic!("Expected ManifestParseError, got {:?}", other),
        }
    }

    #[test]
    fn pinned_prefix_is_reported_as_ignored() {
        let manifest =
            EnvironmentManifest::parse("name: pdf\nprefix: /tmp/pdf\ndependencies: [python]").unwrap();
        let warnings = manifest.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("ignored"));
    }

    #[test]
    fn package_name_strips_channel_and_constraints() {
        assert_eq!(package_name("python=3.10"), "python");
        assert_eq!(package_name("conda-forge::numpy>=1.26"), "numpy");
        assert_eq!(package_name("requests[socks]==2.31"), "requests");
        assert_eq!(package_name("pip"), "pip");
        assert_eq!(package_name("torch ==2.1"), "torch");
        assert_eq!(constraint("conda-forge::python>=3.10"), ">=3.10");
    }
}
