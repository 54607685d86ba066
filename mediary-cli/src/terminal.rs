// ============================================================================
// mediary-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: Styled report output on stdout
//
// Command results go to stdout; logs go to stderr. Colors are only used when
// stdout is a terminal, so piped output stays plain text.
//
// KEY COMPONENTS:
// - styling: Symbols and indentation
// - print_section, print_info, print_status, print_warning: Report lines

use owo_colors::{OwoColorize, Style};
use std::fmt::Display;
use std::io::IsTerminal;

/// Styling constants for terminal output
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const WARNING_SYMBOL: &str = "!";
    pub const ERROR_SYMBOL: &str = "✗";

    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";

    pub const STATUS_INDENT: &str = "  ";
}

fn colors_enabled() -> bool {
    std::io::stdout().is_terminal()
}

fn style(styled: Style) -> Style {
    if colors_enabled() { styled } else { Style::new() }
}

/// Print a section heading.
pub fn print_section(title: &str) {
    println!(
        "\n{}",
        format!("{}{}{}", styling::SECTION_PREFIX, title, styling::SECTION_SUFFIX)
            .style(style(Style::new().cyan().bold()))
    );
}

/// Print an indented `label: value` line.
pub fn print_info<T: Display>(label: &str, value: T) {
    println!(
        "{}{}: {}",
        styling::STATUS_INDENT,
        label.style(style(Style::new().bright_cyan())),
        value
    );
}

/// Print a plain indented line.
pub fn print_line<T: Display>(text: T) {
    println!("{}{}", styling::STATUS_INDENT, text);
}

/// Print a success line.
pub fn print_status(message: &str) {
    println!(
        "{} {}",
        styling::SUCCESS_SYMBOL.style(style(Style::new().green().bold())),
        message
    );
}

/// Print a warning line.
pub fn print_warning(message: &str) {
    println!(
        "{}{} {}",
        styling::STATUS_INDENT,
        styling::WARNING_SYMBOL.style(style(Style::new().yellow().bold())),
        message
    );
}

/// Print an error to stderr.
pub fn print_error(message: &str) {
    let styled = if std::io::stderr().is_terminal() {
        Style::new().red().bold()
    } else {
        Style::new()
    };
    eprintln!("{} {}", styling::ERROR_SYMBOL.style(styled), message);
}
