// mediary-cli/src/lib.rs
//
// Library portion of the Mediary CLI application.
// Contains argument definitions, the command context and command logic.

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ConvertArgs, PlanArgs, ProbeArgs, RequirementArgs};
pub use commands::{run_arg_sets, run_convert, run_plan, run_probe};
pub use context::{CommandContext, Prober};
pub use error::{CliErrorContext, CliResult};
