//! Library integration tests.

use envsetup::SetupError;

#[test]
fn error_types_are_public() {
    let err = SetupError::InvalidEnvironmentName {
        name: "base".into(),
        reason: "reserved".into(),
    };
    assert!(err.to_string().contains("base"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> envsetup::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use envsetup::cli::{Cli, Commands};

    let cli = Cli::parse_from(["envsetup", "status", "--json"]);
    if let Some(Commands::Status(args)) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected Status command");
    }
}

#[test]
fn plan_and_state_are_public() {
    use envsetup::manager::EnvironmentState;
    use envsetup::setup::SetupPlan;
    use std::path::PathBuf;

    let present = EnvironmentState::Present {
        prefix: PathBuf::from("/opt/conda/envs/PDFTranslator"),
    };
    assert!(!SetupPlan::decide(&present, false).create);
    assert!(SetupPlan::decide(&present, true).remove);
}
