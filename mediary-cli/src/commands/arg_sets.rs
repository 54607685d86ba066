//! Implementation of the 'arg-sets' subcommand.

use crate::error::CliResult;
use crate::terminal;

use mediary_core::requirements::BUILTIN_ARG_SETS;

/// Lists the built-in argument sets and their tokens.
pub fn run_arg_sets() -> CliResult<()> {
    terminal::print_section("Built-in argument sets");
    for set in BUILTIN_ARG_SETS {
        terminal::print_info(set.name, set.description);
        terminal::print_line(format!("  {}", set.tokens.join(" ")));
    }
    Ok(())
}
