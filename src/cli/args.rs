//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct. Running `envsetup` with no
//! subcommand performs setup using the top-level flags.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::Overrides;
use crate::manager::ManagerKind;

/// envsetup - Provision the PDFTranslator conda environment.
#[derive(Debug, Parser)]
#[command(name = "envsetup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Stream package manager output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(flatten)]
    pub setup: SetupArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create or reuse the environment (default if no command specified)
    Setup(SetupArgs),

    /// Report the package manager, manifest and environment without changing anything
    Status(StatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Which manifest, environment and package manager to use.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct TargetArgs {
    /// Environment manifest (default: environment.yml)
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Environment name (overrides the manifest's `name`)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Package manager to drive
    #[arg(long, value_enum)]
    pub manager: Option<ManagerKind>,

    /// Explicit package manager executable
    #[arg(long, value_name = "PATH", env = "ENVSETUP_CONDA_EXE")]
    pub conda_exe: Option<PathBuf>,
}

impl TargetArgs {
    pub fn to_overrides(&self) -> Overrides {
        Overrides {
            manifest: self.file.clone(),
            env_name: self.name.clone(),
            manager: self.manager,
            conda_exe: self.conda_exe.clone(),
        }
    }
}

/// Arguments for the `setup` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct SetupArgs {
    /// Remove an existing environment and build it again
    #[arg(long)]
    pub recreate: bool,

    /// Check the tool, manifest and environment, then print the plan
    #[arg(long)]
    pub dry_run: bool,

    /// Skip `pip check` and import checks after activation
    #[arg(long)]
    pub skip_verify: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
