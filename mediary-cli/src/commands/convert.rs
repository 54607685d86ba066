//! Implementation of the 'convert' subcommand.
//!
//! Probes the input, plans it against the requirement arguments and runs
//! ffmpeg with each codec candidate until one succeeds.

use crate::cli::ConvertArgs;
use crate::context::CommandContext;
use crate::error::CliResult;
use crate::terminal;

use mediary_core::external::SidecarSpawner;
use mediary_core::{ConversionOutcome, ConversionReport, format_command};

use log::{debug, info};
use std::time::Instant;

/// Runs the `convert` command.
///
/// # Arguments
///
/// * `context` - Configuration and prober built from the arguments
/// * `args` - Parsed `convert` arguments
///
/// # Returns
///
/// * `Ok(())` - If the output was written, the input was already compliant,
///   or the dry-run command was printed
/// * `Err(CoreError)` - If planning failed or every candidate failed
pub fn run_convert(context: &CommandContext, args: &ConvertArgs) -> CliResult<()> {
    context.check_dependencies(!context.config.dry_run)?;
    debug!("Convert configuration: {:?}", context.config);

    let start = Instant::now();
    let report = mediary_core::convert_file(
        &context.config,
        &SidecarSpawner,
        &context.prober,
        &args.input,
        &args.output,
    )?;

    print_report(&report);
    info!(
        "Finished {} in {:.1}s",
        args.input.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn print_report(report: &ConversionReport) {
    match report.outcome {
        ConversionOutcome::Converted => terminal::print_status(&format!(
            "Converted with {} encoders",
            report.candidate
        )),
        ConversionOutcome::AlreadyCompliant => {
            terminal::print_status("Input already satisfies the requirements, ffmpeg not run")
        }
        ConversionOutcome::DryRun => {
            terminal::print_status(&format!("Dry run ({} encoders)", report.candidate))
        }
    }

    for warning in &report.plan.warnings {
        terminal::print_warning(&warning.to_string());
    }
    for attempt in &report.attempts {
        terminal::print_warning(&format!("Candidate {attempt} failed"));
    }

    terminal::print_info("Resources", &report.plan.resources);
    terminal::print_info("Command", format_command(&report.command));
}
