//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command. Handlers
//! take the [`CommandContext`](crate::context::CommandContext) built in `main`.

/// The `arg-sets` command: lists the built-in argument sets.
pub mod arg_sets;

/// The `convert` command: probes, plans and runs ffmpeg with fallback.
pub mod convert;

/// The `plan` command: prints the plan and candidate commands.
pub mod plan;

/// The `probe` command: prints the stream inventory.
pub mod probe;

pub use arg_sets::run_arg_sets;
pub use convert::run_convert;
pub use plan::run_plan;
pub use probe::run_probe;
