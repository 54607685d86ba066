//! Implementation of the 'plan' subcommand.
//!
//! Prints what `convert` would do for an input: the per-stream decisions, the
//! synthesized stream, warnings, resources and the command each candidate
//! would run. Nothing is executed.

use crate::cli::PlanArgs;
use crate::context::CommandContext;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;

use mediary_core::{ConversionRequest, PreparedConversion, format_command, prepare};

use serde_json::json;
use std::path::{Path, PathBuf};

/// Output path used when `--output` is not given: `movie.mkv` becomes
/// `movie.converted.mkv`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    let name = match input.extension() {
        Some(ext) => format!("{stem}.converted.{}", ext.to_string_lossy()),
        None => format!("{stem}.converted"),
    };
    input.with_file_name(name)
}

/// Runs the `plan` command.
pub fn run_plan(context: &CommandContext, args: &PlanArgs) -> CliResult<()> {
    context.check_dependencies(false)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    let request = ConversionRequest::new(&args.input, output);
    let prepared = prepare(&context.config, &context.prober, &request)?;

    if args.json {
        print_json(&prepared)
    } else {
        print_text(&request, &prepared)
    }
}

fn print_json(prepared: &PreparedConversion) -> CliResult<()> {
    let mut candidates = Vec::with_capacity(prepared.candidates.len());
    for (index, candidate) in prepared.candidates.iter().enumerate() {
        candidates.push(json!({
            "label": candidate.label,
            "reprobe_pixel_formats": candidate.reprobe_pixel_formats,
            "command": prepared.command(index)?,
        }));
    }

    let document = json!({
        "inventory": prepared.inventory,
        "plan": prepared.plan,
        "compliant": prepared.plan.is_compliant(),
        "candidates": candidates,
    });
    let rendered =
        serde_json::to_string_pretty(&document).cli_context("Failed to render plan as JSON")?;
    println!("{rendered}");
    Ok(())
}

fn print_text(request: &ConversionRequest, prepared: &PreparedConversion) -> CliResult<()> {
    let plan = &prepared.plan;

    terminal::print_section(&format!("Plan: {}", request.input.display()));
    terminal::print_info(
        "Input format",
        prepared.inventory.format_name.as_deref().unwrap_or("unknown"),
    );
    for stream in &plan.streams {
        let output = stream
            .output_index
            .map_or_else(|| "-".to_string(), |index| index.to_string());
        terminal::print_line(format!(
            "#{} {} {} -> {} [output {}] ({})",
            stream.input_index,
            stream.codec_type,
            stream.source_codec,
            stream.action,
            output,
            stream.resources
        ));
    }
    if let Some(synthesized) = &plan.synthesized {
        terminal::print_line(format!(
            "+ {} channel audio from #{} as {} [output {}] ({})",
            synthesized.channel_count,
            synthesized.source_index,
            synthesized.codec.as_deref().unwrap_or("source codec"),
            synthesized.output_index,
            synthesized.resources
        ));
    }
    for warning in &plan.warnings {
        terminal::print_warning(&warning.to_string());
    }

    terminal::print_info(
        "Container",
        plan.container_format.as_deref().unwrap_or("unchanged"),
    );
    terminal::print_info("Remux", if plan.remux_required { "yes" } else { "no" });
    terminal::print_info("Resources", &plan.resources);
    terminal::print_info("Compliant", if plan.is_compliant() { "yes" } else { "no" });

    terminal::print_section("Candidates");
    for (index, candidate) in prepared.candidates.iter().enumerate() {
        let command = prepared.command(index)?;
        let note = if candidate.reprobe_pixel_formats {
            " (re-planned for a hardware surface format before running)"
        } else {
            ""
        };
        terminal::print_info(
            &format!("{}. {}{}", index + 1, candidate.label, note),
            format_command(&command),
        );
    }
    Ok(())
}
