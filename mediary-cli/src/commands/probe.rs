//! Implementation of the 'probe' subcommand.

use crate::cli::ProbeArgs;
use crate::context::CommandContext;
use crate::error::{CliErrorContext, CliResult};

use mediary_core::external::FfprobeExecutor;

/// Prints the typed stream inventory of the input as JSON.
pub fn run_probe(context: &CommandContext, args: &ProbeArgs) -> CliResult<()> {
    context.check_dependencies(false)?;

    let inventory = context
        .prober
        .probe(&args.input)
        .cli_with_context(|| format!("Failed to probe {}", args.input.display()))?;
    log::debug!("Probed {} stream(s)", inventory.streams.len());

    let rendered = serde_json::to_string_pretty(&inventory)
        .cli_context("Failed to render inventory as JSON")?;
    println!("{rendered}");
    Ok(())
}
