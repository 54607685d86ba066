//! Error handling for the CLI.
//!
//! Commands return [`CoreError`] directly. The only CLI-side addition is
//! context for the steps the CLI performs itself (probing on behalf of
//! `probe`, rendering JSON, opening log files). Errors that already name the
//! user's mistake, such as a malformed probe report or an unknown argument
//! set, are passed through untouched so the message stays specific.

use mediary_core::{CoreError, CoreResult};
use std::fmt;

/// Result type for command handlers.
pub type CliResult<T> = CoreResult<T>;

/// Adds a description of the failed CLI step to an error.
pub trait CliErrorContext<T> {
    fn cli_context<C: fmt::Display>(self, context: C) -> CliResult<T>;

    /// Like [`CliErrorContext::cli_context`], building the context lazily.
    fn cli_with_context<C: fmt::Display, F: FnOnce() -> C>(self, f: F) -> CliResult<T>;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C: fmt::Display>(self, context: C) -> CliResult<T> {
        self.map_err(|e| with_context(e.into(), context))
    }

    fn cli_with_context<C: fmt::Display, F: FnOnce() -> C>(self, f: F) -> CliResult<T> {
        self.map_err(|e| with_context(e.into(), f()))
    }
}

fn with_context(error: CoreError, context: impl fmt::Display) -> CoreError {
    if is_self_describing(&error) {
        return error;
    }
    CoreError::OperationFailed(format!("{context}: {error}"))
}

/// Errors whose message is already specific enough to show as is.
fn is_self_describing(error: &CoreError) -> bool {
    matches!(
        error,
        CoreError::MalformedProbeOutput(_)
            | CoreError::UnrecognizedOption(_)
            | CoreError::ArgSetNotFound(_)
            | CoreError::PathError(_)
            | CoreError::DependencyNotFound(_)
            | CoreError::Config(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_errors_get_the_failed_step() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result.cli_context("Failed to open log file x.log").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Operation failed: Failed to open log file x.log: I/O error: gone"
        );
    }

    #[test]
    fn test_specific_errors_pass_through() {
        let result: CliResult<()> = Err(CoreError::MalformedProbeOutput("missing streams".into()));
        let err = result
            .cli_with_context(|| format!("Failed to probe {}", "movie.mkv"))
            .unwrap_err();
        assert!(matches!(err, CoreError::MalformedProbeOutput(_)));
    }
}
