// ============================================================================
// mediary-core/src/compile.rs
// ============================================================================
//
// COMMAND COMPILER: TranscodePlan + CodecCandidate -> ffmpeg argument vector
//
// The compiled command maps every input stream, un-maps the dropped ones,
// stream-copies by default and then overrides the codec of each re-encoded or
// synthesized output stream. Global flags come before per-stream flags so the
// per-stream ones win.
//
// KEY COMPONENTS:
// - CommandCompiler: Holds the executable and file paths for one conversion
// - compile: Renders the argument vector for the candidate at an index
// - format_command: Shell-style rendering for logs

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::fallback::CodecCandidate;
use crate::planning::{StreamAction, StreamOption, TranscodePlan};

/// Renders ffmpeg argument vectors for one input/output pair.
#[derive(Debug, Clone)]
pub struct CommandCompiler {
    ffmpeg: String,
    input: PathBuf,
    output: PathBuf,
    overwrite: bool,
    output_options: Vec<String>,
}

impl CommandCompiler {
    /// Creates a compiler that overwrites existing output files.
    pub fn new(ffmpeg: impl Into<String>, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            overwrite: true,
            output_options: Vec::new(),
        }
    }

    /// Sets whether an existing output file is overwritten (`-y`) or kept (`-n`).
    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets extra output options emitted after the plan's own. They are not
    /// part of the plan.
    #[must_use]
    pub fn output_options(mut self, options: Vec<String>) -> Self {
        self.output_options = options;
        self
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Renders the argument vector for the candidate at `index`.
    ///
    /// # Arguments
    ///
    /// * `plan` - The plan to execute
    /// * `candidates` - Ordered candidates from the fallback explorer
    /// * `index` - Position of the candidate to render
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - The full argument vector, executable first
    /// * `Err(CoreError::OperationFailed)` - If `index` is out of range
    pub fn compile(
        &self,
        plan: &TranscodePlan,
        candidates: &[CodecCandidate],
        index: usize,
    ) -> CoreResult<Vec<String>> {
        let candidate = candidates.get(index).ok_or_else(|| {
            CoreError::OperationFailed(format!(
                "Candidate index {index} out of range ({} candidates)",
                candidates.len()
            ))
        })?;
        Ok(self.compile_candidate(plan, candidate))
    }

    /// Renders the argument vector for one candidate.
    pub fn compile_candidate(&self, plan: &TranscodePlan, candidate: &CodecCandidate) -> Vec<String> {
        let mut args = vec![self.ffmpeg.clone(), "-hide_banner".to_string()];

        // Decoder options must precede the input
        args.extend(candidate.decoder_args.iter().cloned());
        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().into_owned());

        args.extend(["-map".to_string(), "0".to_string()]);
        for index in plan.dropped_indices() {
            args.extend(["-map".to_string(), format!("-0:{index}")]);
        }
        if let Some(synthesized) = &plan.synthesized {
            args.extend(["-map".to_string(), format!("0:{}", synthesized.source_index)]);
        }

        args.extend(["-codec".to_string(), "copy".to_string()]);
        if let Some(container) = &plan.container_format {
            args.extend(["-f".to_string(), container.clone()]);
        }
        args.extend(plan.output_options.iter().cloned());
        args.extend(self.output_options.iter().cloned());

        for stream in &plan.streams {
            let (StreamAction::Transcode { codec, options }, Some(output_index)) =
                (&stream.action, stream.output_index)
            else {
                continue;
            };

            let encoder_override = candidate.override_for(output_index);
            let encoder = encoder_override.map_or(codec.as_str(), |o| o.encoder.as_str());
            args.extend([format!("-codec:{output_index}"), encoder.to_string()]);

            let extra: &[StreamOption] = encoder_override
                .map(|o| o.options.as_slice())
                .unwrap_or_default();
            let planned = options
                .iter()
                .filter(|option| !extra.iter().any(|e| e.name == option.name));
            for option in planned.chain(extra) {
                args.extend([format!("-{}:{output_index}", option.name), option.value.clone()]);
            }
        }

        if let Some(synthesized) = &plan.synthesized {
            // A channel remap cannot be stream-copied, so fall back to the
            // source codec when no audio codec is required.
            let codec = synthesized
                .codec
                .clone()
                .or_else(|| {
                    plan.stream(synthesized.source_index)
                        .map(|s| s.source_codec.clone())
                })
                .unwrap_or_else(|| "aac".to_string());
            let out = synthesized.output_index;
            args.extend([
                format!("-codec:{out}"),
                codec,
                format!("-ac:{out}"),
                synthesized.channel_count.to_string(),
            ]);
        }

        args.push(self.output.to_string_lossy().into_owned());
        args.push(if self.overwrite { "-y" } else { "-n" }.to_string());
        args
    }
}

/// Renders an argument vector as a single shell-style line for logging.
pub fn format_command(args: &[String]) -> String {
    args.iter()
        .map(|arg| {
            let plain = !arg.is_empty()
                && arg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_:./+=,@%".contains(c));
            if plain {
                arg.clone()
            } else {
                format!("'{}'", arg.replace('\'', r"'\''"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{HardwareBackend, explore};
    use crate::media::{CodecType, Inventory, StreamDescriptor};
    use crate::planning::plan;
    use crate::requirements::resolve;

    fn compiler() -> CommandCompiler {
        CommandCompiler::new("ffmpeg", "in.mkv", "out.mkv")
    }

    fn position(args: &[String], needle: &str) -> usize {
        args.iter()
            .position(|a| a == needle)
            .unwrap_or_else(|| panic!("{needle} not found in {args:?}"))
    }

    #[test]
    fn test_compliant_plan_is_a_plain_copy() {
        let inventory = Inventory::from_streams(vec![
            StreamDescriptor::video(0, "h264", Some("yuv420p")),
            StreamDescriptor::audio(1, "aac", Some(2)),
        ]);
        let plan = plan(&inventory, &resolve(&[vec!["-codec:v", "h264", "-ac", "2"]]).unwrap());
        let args = compiler().compile(&plan, &explore(&plan, &[]), 0).unwrap();

        assert_eq!(
            args,
            vec![
                "ffmpeg", "-hide_banner", "-i", "in.mkv", "-map", "0", "-codec", "copy", "out.mkv",
                "-y"
            ]
        );
    }

    #[test]
    fn test_downmix_adds_channel_override_and_no_video_override() {
        let inventory = Inventory::from_streams(vec![
            StreamDescriptor::video(0, "h264", Some("yuv420p")),
            StreamDescriptor::audio(1, "aac", Some(6)),
        ]);
        let plan = plan(
            &inventory,
            &resolve(&[vec!["-codec:v", "h264", "-codec:a", "aac", "-ac", "2"]]).unwrap(),
        );
        let args = compiler().compile(&plan, &explore(&plan, &[]), 0).unwrap();
        let line = args.join(" ");

        assert!(line.contains("-map 0 -map 0:1 -codec copy"));
        assert!(line.contains("-codec:2 aac -ac:2 2"));
        assert!(!line.contains("-codec:0"));
        assert!(!line.contains("-codec:1"));
    }

    #[test]
    fn test_transcode_and_synthesis_without_audio_codec() {
        let inventory = Inventory::from_streams(vec![
            StreamDescriptor::video(0, "hevc", Some("yuv420p")),
            StreamDescriptor::audio(1, "opus", Some(1)),
        ]);
        let plan = plan(&inventory, &resolve(&[vec!["-codec:v", "h264", "-ac", "2"]]).unwrap());
        let args = compiler().compile(&plan, &explore(&plan, &[]), 0).unwrap();
        let line = args.join(" ");

        assert!(line.contains("-codec:0 h264"));
        assert!(line.contains("-codec:2 opus -ac:2 2"));
        assert!(position(&args, "-codec:0") > position(&args, "copy"));
    }

    #[test]
    fn test_dropped_streams_are_unmapped_and_never_overridden() {
        let inventory = Inventory::from_streams(vec![
            StreamDescriptor::video(0, "h264", None),
            StreamDescriptor::subtitle(1, "ass"),
            StreamDescriptor::new(2, CodecType::Data, "ttf"),
            StreamDescriptor::audio(3, "flac", Some(2)),
        ]);
        let requirements = resolve(&[vec!["-f", "webm", "-codec:v", "vp9", "-codec:a", "opus", "-codec:s", "webvtt"]]).unwrap();
        let plan = plan(&inventory, &requirements);
        let args = compiler().compile(&plan, &explore(&plan, &[]), 0).unwrap();
        let line = args.join(" ");

        assert!(line.contains("-map 0 -map -0:2 -codec copy -f webm"));
        assert!(line.contains("-codec:0 vp9"));
        assert!(line.contains("-codec:1 webvtt"));
        // Input stream 3 is the third output stream once stream 2 is dropped.
        assert!(line.contains("-codec:2 opus"));
        assert!(!line.contains("-codec:3"));
    }

    #[test]
    fn test_hardware_candidate_overrides_encoder() {
        let inventory = Inventory::from_streams(vec![StreamDescriptor::video(0, "hevc", Some("yuv420p"))]);
        let plan = plan(
            &inventory,
            &resolve(&[vec!["-codec:v", "h264", "-pix_fmt", "nv12"]]).unwrap(),
        );
        let candidates = explore(&plan, &[HardwareBackend::Nvenc, HardwareBackend::Vaapi]);

        let nvenc = compiler().compile(&plan, &candidates, 0).unwrap();
        assert!(position(&nvenc, "-hwaccel") < position(&nvenc, "-i"));
        assert!(nvenc.join(" ").contains("-codec:0 h264_nvenc -pix_fmt:0 nv12"));

        let vaapi = compiler().compile(&plan, &candidates, 1).unwrap().join(" ");
        assert!(vaapi.contains("-codec:0 h264_vaapi -filter:0 format=nv12,hwupload -pix_fmt:0 vaapi"));

        let software = compiler().compile(&plan, &candidates, 2).unwrap().join(" ");
        assert!(software.contains("-codec:0 h264 -pix_fmt:0 nv12"));
        assert!(!software.contains("-hwaccel"));
    }

    #[test]
    fn test_out_of_range_candidate() {
        let plan = plan(&Inventory::default(), &resolve::<&str>(&[]).unwrap());
        let err = compiler().compile(&plan, &[], 0).unwrap_err();
        assert!(matches!(err, CoreError::OperationFailed(_)));
    }

    #[test]
    fn test_output_options_and_no_overwrite() {
        let inventory = Inventory::from_streams(vec![StreamDescriptor::video(0, "h264", None)]);
        let plan = plan(
            &inventory,
            &resolve(&[vec!["-f", "mp4", "-movflags", "+faststart"]]).unwrap(),
        );
        let args = compiler()
            .overwrite(false)
            .compile(&plan, &explore(&plan, &[]), 0)
            .unwrap();
        let line = args.join(" ");
        assert!(line.contains("-codec copy -f mp4 -movflags +faststart out.mkv -n"));
    }

    #[test]
    fn test_compiler_output_options_follow_plan_options() {
        let inventory = Inventory::from_streams(vec![StreamDescriptor::video(0, "hevc", None)]);
        let plan = plan(
            &inventory,
            &resolve(&[vec!["-codec:v", "h264", "-movflags", "+faststart"]]).unwrap(),
        );
        let line = compiler()
            .output_options(vec!["-preset".to_string(), "slow".to_string()])
            .compile(&plan, &explore(&plan, &[]), 0)
            .unwrap()
            .join(" ");
        assert!(line.contains("-codec copy -movflags +faststart -preset slow -codec:0 h264 out.mkv"));
        assert!(!plan.output_options.contains(&"-preset".to_string()));
    }

    #[test]
    fn test_format_command_quotes_when_needed() {
        let args = vec![
            "ffmpeg".to_string(),
            "-i".to_string(),
            "my movie.mkv".to_string(),
            "it's.mp4".to_string(),
        ];
        assert_eq!(
            format_command(&args),
            r"ffmpeg -i 'my movie.mkv' 'it'\''s.mp4'"
        );
    }
}
