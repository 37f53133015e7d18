//! Process execution and shell environment probes.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{
    execute, execute_streaming, CommandResult, CommandRunner, Invocation, OutputCallback,
    OutputLine, SystemRunner,
};
pub use mock::ScriptedRunner;
pub use platform::{detect_shell, is_ci, is_elevated, ShellType};
