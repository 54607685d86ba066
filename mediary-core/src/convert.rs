// ============================================================================
// mediary-core/src/convert.rs
// ============================================================================
//
// CONVERSION DRIVER: Probe, plan, compile and run with candidate fallback
//
// This module ties the pipeline together. A conversion walks an explicit state
// machine with a cursor into the ordered codec candidates:
//
//   Planning -> Compiling -> Invoking -> Success
//                   ^            |
//                   |            v
//                   +--- RetryNextCandidate ---> Exhausted
//
// Parse and resolution errors abort during Planning. A failed attempt (spawn
// failure or non-zero exit) is recorded and the next candidate is tried; only
// exhausting every candidate is reported to the caller.
//
// KEY COMPONENTS:
// - ConversionRequest / ConversionReport: Input and result of one conversion
// - PreparedConversion: Everything decided before the first invocation
// - prepare: Load argument sets, probe, plan and explore candidates
// - Converter: Runs the state machine against an ffmpeg spawner

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

// ---- Internal crate imports ----
use crate::compile::{CommandCompiler, format_command};
use crate::config::CoreConfig;
use crate::error::{AttemptRecord, CoreError, CoreResult};
use crate::external::ffmpeg_executor::{FfmpegSpawner, run_command};
use crate::external::ffprobe_executor::FfprobeExecutor;
use crate::fallback::{CodecCandidate, explore, surface_pixel_format};
use crate::media::{CodecType, Inventory};
use crate::planning::{TranscodePlan, plan};
use crate::requirements::{RequirementSet, load_arg_sets, resolve, resolve_output_options};

/// Input and output of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// How a successful conversion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// ffmpeg ran and exited successfully.
    Converted,
    /// The input already satisfied the requirements; ffmpeg was not run.
    AlreadyCompliant,
    /// Dry-run mode; the first candidate's command was compiled but not run.
    DryRun,
}

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub outcome: ConversionOutcome,
    /// The plan the final command was compiled from.
    pub plan: TranscodePlan,
    /// Label of the candidate whose command is reported.
    pub candidate: String,
    /// The final argument vector.
    pub command: Vec<String>,
    /// Failed attempts before the reported one.
    pub attempts: Vec<AttemptRecord>,
}

/// Conversion state. Terminal states carry what the caller gets back.
#[derive(Debug)]
pub enum ConversionState {
    Planning,
    Compiling {
        candidate: usize,
    },
    Invoking {
        candidate: usize,
        plan: TranscodePlan,
        command: Vec<String>,
    },
    RetryNextCandidate {
        failed: usize,
    },
    Success(ConversionReport),
    Exhausted,
}

/// Everything decided before the first invocation.
#[derive(Debug, Clone)]
pub struct PreparedConversion {
    pub inventory: Inventory,
    pub requirements: RequirementSet,
    pub plan: TranscodePlan,
    pub candidates: Vec<CodecCandidate>,
    pub compiler: CommandCompiler,
}

impl PreparedConversion {
    /// Compiles the command of the candidate at `index` against the main plan.
    pub fn command(&self, index: usize) -> CoreResult<Vec<String>> {
        self.compiler.compile(&self.plan, &self.candidates, index)
    }
}

/// Resolves requirements, probes the input, plans and explores candidates.
///
/// # Arguments
///
/// * `config` - Core configuration (argument sets, backends, executables)
/// * `prober` - Prober used for the input
/// * `request` - Input and output paths
///
/// # Returns
///
/// * `Ok(PreparedConversion)` - The plan and its ordered candidates
/// * `Err(CoreError)` - If an argument set is missing, a token is unrecognized,
///   or the probe report is malformed
pub fn prepare<P: FfprobeExecutor>(
    config: &CoreConfig,
    prober: &P,
    request: &ConversionRequest,
) -> CoreResult<PreparedConversion> {
    let token_lists = load_arg_sets(&config.arg_sets, &config.arg_set_dirs)?;
    let requirements = resolve(&token_lists)?;
    let output_lists = load_arg_sets(&config.output_arg_sets, &config.arg_set_dirs)?;
    let output_options = resolve_output_options(&output_lists)?;

    let inventory = prober.probe(&request.input)?;
    log::debug!(
        "Probed {}: {} stream(s), format {}",
        request.input.display(),
        inventory.streams.len(),
        inventory.format_name.as_deref().unwrap_or("unknown")
    );

    let plan = plan(&inventory, &requirements);
    let candidates = explore(&plan, &config.hardware_backends);
    let compiler = CommandCompiler::new(config.ffmpeg_path.as_str(), &request.input, &request.output)
        .overwrite(config.overwrite)
        .output_options(output_options);

    Ok(PreparedConversion {
        inventory,
        requirements,
        plan,
        candidates,
        compiler,
    })
}

/// Drives conversions with an ffmpeg spawner and a prober.
pub struct Converter<'a, S: FfmpegSpawner, P: FfprobeExecutor> {
    config: &'a CoreConfig,
    spawner: &'a S,
    prober: &'a P,
}

impl<'a, S: FfmpegSpawner, P: FfprobeExecutor> Converter<'a, S, P> {
    pub fn new(config: &'a CoreConfig, spawner: &'a S, prober: &'a P) -> Self {
        Self {
            config,
            spawner,
            prober,
        }
    }

    /// Converts one file.
    ///
    /// # Returns
    ///
    /// * `Ok(ConversionReport)` - If a candidate succeeded, the input was
    ///   already compliant, or dry-run mode is on
    /// * `Err(CoreError::AllCandidatesFailed)` - If every candidate failed
    /// * `Err(CoreError)` - If planning failed
    pub fn convert(&self, request: &ConversionRequest) -> CoreResult<ConversionReport> {
        let mut state = ConversionState::Planning;
        let mut prepared: Option<PreparedConversion> = None;
        let mut attempts: Vec<AttemptRecord> = Vec::new();

        loop {
            state = match state {
                ConversionState::Planning => {
                    let ready = prepare(self.config, self.prober, request)?;

                    if ready.plan.is_compliant() && self.config.skip_compliant {
                        log::info!(
                            "{} already satisfies the requirements, skipping ffmpeg",
                            request.input.display()
                        );
                        let command = ready.command(ready.candidates.len() - 1)?;
                        return Ok(ConversionReport {
                            outcome: ConversionOutcome::AlreadyCompliant,
                            plan: ready.plan,
                            candidate: crate::fallback::SOFTWARE_CANDIDATE.to_string(),
                            command,
                            attempts,
                        });
                    }

                    prepared = Some(ready);
                    ConversionState::Compiling { candidate: 0 }
                }

                ConversionState::Compiling { candidate } => {
                    let ready = prepared.as_ref().ok_or_else(|| {
                        CoreError::OperationFailed("Compiling before planning".to_string())
                    })?;
                    let label = ready.candidates[candidate].label.clone();

                    match self.plan_for_candidate(ready, candidate, request) {
                        Ok(plan) => {
                            let command = ready.compiler.compile(&plan, &ready.candidates, candidate)?;
                            if self.config.dry_run {
                                log::info!("Dry run: {}", format_command(&command));
                                return Ok(ConversionReport {
                                    outcome: ConversionOutcome::DryRun,
                                    plan,
                                    candidate: label,
                                    command,
                                    attempts,
                                });
                            }
                            ConversionState::Invoking {
                                candidate,
                                plan,
                                command,
                            }
                        }
                        Err(e) => {
                            log::warn!("Re-planning for candidate {label} failed: {e}");
                            attempts.push(e.into_attempt_record(&label));
                            ConversionState::RetryNextCandidate { failed: candidate }
                        }
                    }
                }

                ConversionState::Invoking {
                    candidate,
                    plan,
                    command,
                } => {
                    let ready = prepared.as_ref().ok_or_else(|| {
                        CoreError::OperationFailed("Invoking before planning".to_string())
                    })?;
                    let label = ready.candidates[candidate].label.clone();

                    log::info!(
                        "Attempt {}/{} with {} encoders (resources: {})",
                        candidate + 1,
                        ready.candidates.len(),
                        label,
                        plan.resources
                    );
                    log::info!("Command: {}", format_command(&command));

                    match self.attempt(&label, &command) {
                        Ok(()) => ConversionState::Success(ConversionReport {
                            outcome: ConversionOutcome::Converted,
                            plan,
                            candidate: label,
                            command,
                            attempts: std::mem::take(&mut attempts),
                        }),
                        Err(e) => {
                            log::warn!("{e}");
                            attempts.push(e.into_attempt_record(&label));
                            ConversionState::RetryNextCandidate { failed: candidate }
                        }
                    }
                }

                ConversionState::RetryNextCandidate { failed } => {
                    let total = prepared.as_ref().map_or(0, |p| p.candidates.len());
                    if failed + 1 < total {
                        ConversionState::Compiling {
                            candidate: failed + 1,
                        }
                    } else {
                        ConversionState::Exhausted
                    }
                }

                ConversionState::Success(report) => {
                    log::info!(
                        "Converted {} -> {} with {} encoders",
                        request.input.display(),
                        request.output.display(),
                        report.candidate
                    );
                    return Ok(report);
                }

                ConversionState::Exhausted => {
                    log::error!(
                        "All {} codec candidate(s) failed for {}",
                        attempts.len(),
                        request.input.display()
                    );
                    return Err(CoreError::AllCandidatesFailed { attempts });
                }
            };
        }
    }

    /// Returns the plan to compile for a candidate, re-probing and re-planning
    /// with a surface pixel format when the candidate needs one.
    fn plan_for_candidate(
        &self,
        ready: &PreparedConversion,
        candidate: usize,
        request: &ConversionRequest,
    ) -> CoreResult<TranscodePlan> {
        if !ready.candidates[candidate].reprobe_pixel_formats {
            return Ok(ready.plan.clone());
        }

        let inventory = self.prober.probe(&request.input)?;
        let high_bit_depth = inventory
            .streams_of(CodecType::Video)
            .filter(|s| {
                ready
                    .plan
                    .stream(s.index)
                    .is_some_and(|planned| planned.is_transcoded())
            })
            .any(|s| s.is_high_bit_depth());

        let mut requirements = ready.requirements.clone();
        requirements.pixel_format = Some(surface_pixel_format(high_bit_depth).to_string());
        log::debug!(
            "Re-planned {} with surface pixel format {}",
            request.input.display(),
            surface_pixel_format(high_bit_depth)
        );
        Ok(plan(&inventory, &requirements))
    }

    /// Runs one command; any failure is reported as `AttemptFailed`.
    fn attempt(&self, label: &str, command: &[String]) -> CoreResult<()> {
        match run_command(self.spawner, command) {
            Ok(_) => Ok(()),
            Err(CoreError::CommandFailed { status, stderr, .. }) => Err(CoreError::AttemptFailed {
                candidate: label.to_string(),
                code: status.code(),
                stderr,
            }),
            Err(other) => Err(CoreError::AttemptFailed {
                candidate: label.to_string(),
                code: None,
                stderr: other.to_string(),
            }),
        }
    }
}

/// Convenience wrapper: checks that the input exists before converting.
pub fn convert_file<S: FfmpegSpawner, P: FfprobeExecutor>(
    config: &CoreConfig,
    spawner: &S,
    prober: &P,
    input: &Path,
    output: &Path,
) -> CoreResult<ConversionReport> {
    if !input.is_file() {
        return Err(CoreError::PathError(format!(
            "Input file does not exist: {}",
            input.display()
        )));
    }
    Converter::new(config, spawner, prober).convert(&ConversionRequest::new(input, output))
}
