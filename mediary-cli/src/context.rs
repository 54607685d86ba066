//! Per-invocation command context.
//!
//! `main` builds one [`CommandContext`] from the parsed arguments and hands it
//! to the command handler. Handlers never read configuration from anywhere
//! else.

use crate::cli::{ConvertArgs, PlanArgs, ProbeArgs, RequirementArgs};
use crate::error::CliResult;

use mediary_core::config::{CoreConfig, CoreConfigBuilder, DEFAULT_ARG_SET, DEFAULT_FFPROBE};
use mediary_core::external::{CommandFfprobeExecutor, FfprobeExecutor, ReplayFfprobeExecutor};
use mediary_core::{CoreResult, check_dependency};

use std::path::Path;

/// The prober selected on the command line.
#[derive(Debug, Clone)]
pub enum Prober {
    /// Runs ffprobe.
    Live(CommandFfprobeExecutor),
    /// Replays a captured report.
    Replay(ReplayFfprobeExecutor),
}

impl Prober {
    pub fn new(ffprobe: Option<&str>, probe_output: Option<&Path>) -> Self {
        match probe_output {
            Some(report) => Prober::Replay(ReplayFfprobeExecutor::new(report)),
            None => Prober::Live(CommandFfprobeExecutor::new(
                ffprobe.unwrap_or(DEFAULT_FFPROBE),
            )),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Prober::Live(_))
    }
}

impl FfprobeExecutor for Prober {
    fn probe_raw(&self, input_path: &Path) -> CoreResult<String> {
        match self {
            Prober::Live(executor) => executor.probe_raw(input_path),
            Prober::Replay(executor) => executor.probe_raw(input_path),
        }
    }
}

/// Everything a command handler needs.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: CoreConfig,
    pub prober: Prober,
}

impl CommandContext {
    /// Context for `convert`.
    pub fn for_convert(args: &ConvertArgs) -> CliResult<Self> {
        let config = requirement_config(&args.requirements)
            .overwrite(!args.no_overwrite)
            .skip_compliant(!args.always_run)
            .dry_run(args.dry_run)
            .build();
        Self::validated(config, &args.requirements)
    }

    /// Context for `plan`.
    pub fn for_plan(args: &PlanArgs) -> CliResult<Self> {
        let config = requirement_config(&args.requirements).build();
        Self::validated(config, &args.requirements)
    }

    /// Context for `probe`.
    pub fn for_probe(args: &ProbeArgs) -> CliResult<Self> {
        let mut builder = CoreConfigBuilder::new();
        if let Some(ffprobe) = &args.ffprobe {
            builder = builder.ffprobe_path(ffprobe.as_str());
        }
        let config = builder.build();
        config.validate()?;
        Ok(Self {
            prober: Prober::new(Some(config.ffprobe_path.as_str()), args.probe_output.as_deref()),
            config,
        })
    }

    fn validated(config: CoreConfig, args: &RequirementArgs) -> CliResult<Self> {
        config.validate()?;
        Ok(Self {
            prober: Prober::new(Some(config.ffprobe_path.as_str()), args.probe_output.as_deref()),
            config,
        })
    }

    /// Verifies the external tools this invocation will actually run.
    pub fn check_dependencies(&self, runs_ffmpeg: bool) -> CliResult<()> {
        if self.prober.is_live() {
            check_dependency(&self.config.ffprobe_path)?;
        }
        if runs_ffmpeg {
            check_dependency(&self.config.ffmpeg_path)?;
        }
        Ok(())
    }
}

fn requirement_config(args: &RequirementArgs) -> CoreConfigBuilder {
    let arg_sets = if args.arg_sets.is_empty() {
        vec![DEFAULT_ARG_SET.to_string()]
    } else {
        args.arg_sets.clone()
    };

    let mut builder = CoreConfigBuilder::new()
        .arg_sets(arg_sets)
        .output_arg_sets(args.output_arg_sets.clone());
    if let Some(dir) = &args.arg_set_dir {
        builder = builder.arg_set_dir(dir.clone());
    }
    if let Some(ffmpeg) = &args.ffmpeg {
        builder = builder.ffmpeg_path(ffmpeg.as_str());
    }
    if let Some(ffprobe) = &args.ffprobe {
        builder = builder.ffprobe_path(ffprobe.as_str());
    }
    if args.no_hwaccel {
        builder = builder.hardware_backends(Vec::new());
    } else if let Some(backends) = &args.hwaccel {
        builder = builder.hardware_backends(backends.clone());
    }
    builder
}
