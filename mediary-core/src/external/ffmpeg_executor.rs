// ============================================================================
// mediary-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with ffmpeg
// processes. The conversion driver only ever hands over a fully compiled
// argument vector, so spawning takes the vector rather than a builder.
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active ffmpeg process
// - FfmpegSpawner: Trait for creating new ffmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - StderrTail: Bounded buffer of the last log lines, kept for diagnostics

use crate::error::{
    CoreError, CoreResult, command_failed_error, command_start_error, command_wait_error,
};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::collections::VecDeque;
use std::process::ExitStatus;

/// Number of log lines kept for attempt diagnostics.
pub const STDERR_TAIL_LINES: usize = 20;

// --- FFmpeg Execution Abstraction ---

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;

    /// Spawns a process for a compiled argument vector. `args[0]` is the
    /// executable.
    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process>;
}

// --- Concrete Implementation using ffmpeg-sidecar ---

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            CoreError::OperationFailed(format!("ffmpeg event stream unavailable: {e}"))
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process> {
        let (program, rest) = args.split_first().ok_or_else(|| {
            CoreError::OperationFailed("Cannot spawn an empty ffmpeg command".to_string())
        })?;

        let mut cmd = FfmpegCommand::new_with_path(program);
        cmd.args(rest);
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error(program.as_str(), e))
    }
}

/// Keeps the last `capacity` log lines of a process.
#[derive(Debug, Clone)]
pub struct StderrTail {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Default for StderrTail {
    fn default() -> Self {
        Self::new(STDERR_TAIL_LINES)
    }
}

impl StderrTail {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    /// Records the text of log and error events; other events are ignored.
    pub fn record(&mut self, event: &FfmpegEvent) {
        match event {
            FfmpegEvent::Log(_, line) | FfmpegEvent::Error(line) => self.push(line.clone()),
            _ => {}
        }
    }

    pub fn into_string(self) -> String {
        Vec::from(self.lines).join("\n")
    }
}

/// Runs a compiled command to completion.
///
/// # Returns
///
/// * `Ok(String)` - The tail of the process log on exit code 0
/// * `Err(CoreError::CommandFailed)` - If the process exits unsuccessfully
/// * `Err(_)` - If the process cannot be spawned or waited on
pub fn run_command<S: FfmpegSpawner>(spawner: &S, args: &[String]) -> CoreResult<String> {
    let mut process = spawner.spawn(args)?;
    let mut tail = StderrTail::default();

    process.handle_events(|event| {
        if let FfmpegEvent::Error(line) = &event {
            log::debug!("ffmpeg: {line}");
        }
        tail.record(&event);
        Ok(())
    })?;

    let status = process.wait()?;
    let stderr = tail.into_string();
    if status.success() {
        Ok(stderr)
    } else {
        let program = args.first().map_or("ffmpeg", String::as_str);
        Err(command_failed_error(program, status, stderr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffmpeg_sidecar::event::LogLevel;

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let mut tail = StderrTail::new(2);
        tail.record(&FfmpegEvent::Log(LogLevel::Info, "one".to_string()));
        tail.record(&FfmpegEvent::Error("two".to_string()));
        tail.record(&FfmpegEvent::Done);
        tail.record(&FfmpegEvent::Log(LogLevel::Error, "three".to_string()));
        assert_eq!(tail.into_string(), "two\nthree");
    }

    #[test]
    fn test_empty_command_cannot_spawn() {
        let result = SidecarSpawner.spawn(&[]);
        assert!(matches!(result, Err(CoreError::OperationFailed(_))));
    }
}
