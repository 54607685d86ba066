//! FFprobe integration for stream inventory.
//!
//! The prober is consumed through [`FfprobeExecutor`] so the conversion driver
//! can be run against live `ffprobe`, a captured JSON report, or a mock.

use crate::error::{CoreResult, command_failed_error, command_start_error};
use crate::media::Inventory;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Arguments that make ffprobe print the stream and format report as JSON.
pub const FFPROBE_ARGS: [&str; 6] = [
    "-v",
    "quiet",
    "-print_format",
    "json",
    "-show_format",
    "-show_streams",
];

/// Trait for running the media prober.
pub trait FfprobeExecutor {
    /// Returns the prober's raw JSON report for a file.
    fn probe_raw(&self, input_path: &Path) -> CoreResult<String>;

    /// Probes a file and parses the report into an inventory.
    fn probe(&self, input_path: &Path) -> CoreResult<Inventory> {
        let raw = self.probe_raw(input_path)?;
        Inventory::parse(&raw)
    }
}

/// Runs the `ffprobe` executable.
#[derive(Debug, Clone)]
pub struct CommandFfprobeExecutor {
    program: PathBuf,
}

impl Default for CommandFfprobeExecutor {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl CommandFfprobeExecutor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl FfprobeExecutor for CommandFfprobeExecutor {
    fn probe_raw(&self, input_path: &Path) -> CoreResult<String> {
        let program = self.program.to_string_lossy().into_owned();
        log::debug!("Running {} on: {}", program, input_path.display());

        let output = Command::new(&self.program)
            .args(FFPROBE_ARGS)
            .arg(input_path)
            .output()
            .map_err(|e| command_start_error(program.as_str(), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            log::error!(
                "{} failed for {}: {}",
                program,
                input_path.display(),
                output.status
            );
            return Err(command_failed_error(program, output.status, stderr));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Serves a previously captured ffprobe report instead of running the prober.
///
/// Useful for planning on a machine that does not have the media file, and for
/// reproducing a conversion decision from a bug report.
#[derive(Debug, Clone)]
pub struct ReplayFfprobeExecutor {
    report_path: PathBuf,
}

impl ReplayFfprobeExecutor {
    pub fn new(report_path: impl Into<PathBuf>) -> Self {
        Self {
            report_path: report_path.into(),
        }
    }
}

impl FfprobeExecutor for ReplayFfprobeExecutor {
    fn probe_raw(&self, input_path: &Path) -> CoreResult<String> {
        log::debug!(
            "Replaying probe report {} for: {}",
            self.report_path.display(),
            input_path.display()
        );
        Ok(fs::read_to_string(&self.report_path)?)
    }
}
