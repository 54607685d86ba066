// ============================================================================
// mediary-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom error types for the mediary-core library
//
// This module defines the error taxonomy used throughout the library. Parsing
// errors (probe output, requirement tokens, argument sets) abort a conversion
// before any external invocation. Attempt failures are recovered by the
// conversion driver; only candidate exhaustion reaches the caller.
//
// KEY COMPONENTS:
// - CoreError: Main error enum
// - CoreResult: Type alias for Result with CoreError
// - Helper functions for creating command-related errors

use std::fmt;
use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// One failed invocation of the external executable, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// Label of the codec candidate that was tried (e.g. "vaapi", "software").
    pub candidate: String,
    /// Exit code of the process, or None if it never started or was killed.
    pub code: Option<i32>,
    /// Last lines the process wrote to stderr.
    pub stderr: String,
}

impl fmt::Display for AttemptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (exit code {})", self.candidate, code),
            None => write!(f, "{} (did not complete)", self.candidate),
        }
    }
}

fn format_attempts(attempts: &[AttemptRecord]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Custom error type for mediary-core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed probe output: {0}")]
    MalformedProbeOutput(String),

    #[error("Unrecognized option: {0}")]
    UnrecognizedOption(String),

    #[error("Argument set not found: {0}")]
    ArgSetNotFound(String),

    #[error("Attempt with candidate '{candidate}' failed (exit code {code:?}): {stderr}")]
    AttemptFailed {
        candidate: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("All codec candidates failed: {}", format_attempts(.attempts))]
    AllCandidatesFailed { attempts: Vec<AttemptRecord> },

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Command '{cmd}' failed with status {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Required dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for mediary-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Creates a `CommandStart` error for a command that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Creates a `CommandWait` error for a command whose exit could not be collected.
pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Creates a `CommandFailed` error for a command that exited unsuccessfully.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}

impl CoreError {
    /// Converts an attempt-level failure into its diagnostic record.
    ///
    /// Errors that are not tied to a single candidate are recorded under the
    /// given label with no exit code.
    pub fn into_attempt_record(self, candidate: &str) -> AttemptRecord {
        match self {
            CoreError::AttemptFailed {
                candidate,
                code,
                stderr,
            } => AttemptRecord {
                candidate,
                code,
                stderr,
            },
            other => AttemptRecord {
                candidate: candidate.to_string(),
                code: None,
                stderr: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_candidates_failed_lists_attempts() {
        let err = CoreError::AllCandidatesFailed {
            attempts: vec![
                AttemptRecord {
                    candidate: "nvenc".to_string(),
                    code: Some(1),
                    stderr: String::new(),
                },
                AttemptRecord {
                    candidate: "software".to_string(),
                    code: None,
                    stderr: "spawn failed".to_string(),
                },
            ],
        };
        let message = err.to_string();
        assert!(message.contains("nvenc (exit code 1)"));
        assert!(message.contains("software (did not complete)"));
    }

    #[test]
    fn test_into_attempt_record_keeps_failure_details() {
        let err = CoreError::AttemptFailed {
            candidate: "qsv".to_string(),
            code: Some(234),
            stderr: "Unknown encoder".to_string(),
        };
        let record = err.into_attempt_record("ignored");
        assert_eq!(record.candidate, "qsv");
        assert_eq!(record.code, Some(234));

        let record = CoreError::DependencyNotFound("ffmpeg".to_string()).into_attempt_record("software");
        assert_eq!(record.candidate, "software");
        assert_eq!(record.code, None);
        assert!(record.stderr.contains("ffmpeg"));
    }
}
