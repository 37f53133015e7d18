//! Tests for the public manifest and config API.

use envsetup::config::{Overrides, SetupTarget, CONFIG_FILE};
use envsetup::manifest::{validate_env_name, EnvironmentManifest, DEFAULT_ENV_NAME};
use envsetup::SetupError;
use std::fs;
use tempfile::TempDir;

const PDF_TRANSLATOR: &str = r#"
name: PDFTranslator
channels:
  - pytorch
  - conda-forge
dependencies:
  - python=3.10
  - pytorch::pytorch>=2.1
  - pip
  - pip:
      - pymupdf==1.23.8
      - ebooklib
      - python-docx
"#;

#[test]
fn load_manifest_from_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("environment.yml");
    fs::write(&path, PDF_TRANSLATOR).unwrap();

    let manifest = EnvironmentManifest::load(&path).unwrap();
    let summary = manifest.summary();

    assert_eq!(manifest.name.as_deref(), Some("PDFTranslator"));
    assert_eq!(summary.conda_packages, 3);
    assert_eq!(summary.pip_packages, 3);
    assert_eq!(summary.channels, 2);
    assert!(manifest.warnings().is_empty());
}

#[test]
fn missing_manifest_is_reported_with_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("environment.yml");

    let err = EnvironmentManifest::load(&path).unwrap_err();
    match err {
        SetupError::ManifestNotFound { path: reported } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn manifest_name_is_used_unless_overridden() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("environment.yml"), PDF_TRANSLATOR).unwrap();
    let manifest = EnvironmentManifest::load(&temp.path().join("environment.yml")).unwrap();

    let target = SetupTarget::resolve(temp.path(), &Overrides::default()).unwrap();
    assert_eq!(target.env_name(&manifest), "PDFTranslator");

    let overrides = Overrides {
        env_name: Some("pdf-gpu".to_string()),
        ..Default::default()
    };
    let target = SetupTarget::resolve(temp.path(), &overrides).unwrap();
    assert_eq!(target.env_name(&manifest), "pdf-gpu");
}

#[test]
fn unnamed_manifest_falls_back_to_default() {
    let manifest = EnvironmentManifest::parse("dependencies: [python]").unwrap();
    let temp = TempDir::new().unwrap();
    let target = SetupTarget::resolve(temp.path(), &Overrides::default()).unwrap();

    assert_eq!(target.env_name(&manifest), DEFAULT_ENV_NAME);
    assert!(validate_env_name(DEFAULT_ENV_NAME).is_ok());
}

#[test]
fn project_config_verify_section() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(CONFIG_FILE),
        "verify:\n  pip_check: false\n  imports: [fitz, ebooklib]\n",
    )
    .unwrap();

    let target = SetupTarget::resolve(temp.path(), &Overrides::default()).unwrap();
    assert!(!target.verify.pip_check);
    assert_eq!(target.verify.imports, vec!["fitz", "ebooklib"]);
}
