// ============================================================================
// mediary-cli/src/main.rs
// ============================================================================
//
// MEDIARY CLI: Entry point
//
// Parses the command line, installs logging, builds the command context once
// and dispatches to the command handler. Any error is printed to stderr and
// the process exits with status 1.

use clap::Parser;
use mediary_cli::logging::{init_logging, log_file_path};
use mediary_cli::{
    Cli, CliResult, CommandContext, Commands, run_arg_sets, run_convert, run_plan, run_probe,
    terminal,
};
use std::process;

fn run(cli: Cli) -> CliResult<()> {
    let log_file = log_file_path(cli.log_file.as_deref(), cli.log_dir.as_deref());
    init_logging(cli.verbose, log_file.as_deref())?;

    match cli.command {
        Commands::Convert(args) => {
            let context = CommandContext::for_convert(&args)?;
            run_convert(&context, &args)
        }
        Commands::Plan(args) => {
            let context = CommandContext::for_plan(&args)?;
            run_plan(&context, &args)
        }
        Commands::Probe(args) => {
            let context = CommandContext::for_probe(&args)?;
            run_probe(&context, &args)
        }
        Commands::ArgSets => run_arg_sets(),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::debug!("Command failed: {e:?}");
        terminal::print_error(&format!("Error: {e}"));
        process::exit(1);
    }
}
