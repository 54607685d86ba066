// ============================================================================
// mediary-core/src/fallback.rs
// ============================================================================
//
// CODEC FALLBACK EXPLORER: Ordered encoder candidates for a plan
//
// A plan names codecs ("h264", "hevc"); which encoder produces them is decided
// here. Hardware backends are tried first, in configured order, and the
// software encoders are always the last resort.
//
// KEY COMPONENTS:
// - HardwareBackend: VideoToolbox, NVENC, Quick Sync, VA-API
// - CodecCandidate: Decoder arguments plus per-stream encoder overrides
// - explore: TranscodePlan -> ordered candidates (never empty)

// ---- Standard library imports ----
use std::env;
use std::fmt;
use std::str::FromStr;

// ---- Internal crate imports ----
use crate::error::CoreError;
use crate::media::stream::is_high_bit_depth_format;
use crate::planning::{StreamAction, StreamOption, TranscodePlan};

/// Label of the candidate that uses the planned codec names unchanged.
pub const SOFTWARE_CANDIDATE: &str = "software";

/// Render node used for VA-API when none is configured.
pub const DEFAULT_VAAPI_DEVICE: &str = "/dev/dri/renderD128";

/// A hardware encoding backend exposed by ffmpeg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareBackend {
    VideoToolbox,
    Nvenc,
    Qsv,
    Vaapi,
}

impl HardwareBackend {
    pub const ALL: [HardwareBackend; 4] = [
        HardwareBackend::VideoToolbox,
        HardwareBackend::Nvenc,
        HardwareBackend::Qsv,
        HardwareBackend::Vaapi,
    ];

    /// Backends assumed to be present on the current platform.
    ///
    /// Only VideoToolbox on macOS is assumed; the others depend on drivers and
    /// have to be enabled explicitly.
    #[must_use]
    pub fn detect() -> Vec<HardwareBackend> {
        if is_macos() {
            vec![HardwareBackend::VideoToolbox]
        } else {
            Vec::new()
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HardwareBackend::VideoToolbox => "videotoolbox",
            HardwareBackend::Nvenc => "nvenc",
            HardwareBackend::Qsv => "qsv",
            HardwareBackend::Vaapi => "vaapi",
        }
    }

    /// The hardware encoder for a codec, if this backend has one.
    pub fn encoder_for(self, codec: &str) -> Option<&'static str> {
        match (self, codec) {
            (HardwareBackend::VideoToolbox, "h264") => Some("h264_videotoolbox"),
            (HardwareBackend::VideoToolbox, "hevc") => Some("hevc_videotoolbox"),
            (HardwareBackend::VideoToolbox, "prores") => Some("prores_videotoolbox"),
            (HardwareBackend::Nvenc, "h264") => Some("h264_nvenc"),
            (HardwareBackend::Nvenc, "hevc") => Some("hevc_nvenc"),
            (HardwareBackend::Nvenc, "av1") => Some("av1_nvenc"),
            (HardwareBackend::Qsv, "h264") => Some("h264_qsv"),
            (HardwareBackend::Qsv, "hevc") => Some("hevc_qsv"),
            (HardwareBackend::Qsv, "av1") => Some("av1_qsv"),
            (HardwareBackend::Qsv, "vp9") => Some("vp9_qsv"),
            (HardwareBackend::Qsv, "mpeg2video") => Some("mpeg2_qsv"),
            (HardwareBackend::Vaapi, "h264") => Some("h264_vaapi"),
            (HardwareBackend::Vaapi, "hevc") => Some("hevc_vaapi"),
            (HardwareBackend::Vaapi, "av1") => Some("av1_vaapi"),
            (HardwareBackend::Vaapi, "vp8") => Some("vp8_vaapi"),
            (HardwareBackend::Vaapi, "vp9") => Some("vp9_vaapi"),
            (HardwareBackend::Vaapi, "mpeg2video") => Some("mpeg2_vaapi"),
            _ => None,
        }
    }

    /// Decoder arguments placed before the input.
    ///
    /// IMPORTANT: These must come BEFORE `-i` on the command line.
    pub fn decoder_args(self) -> Vec<String> {
        let args: &[&str] = match self {
            HardwareBackend::VideoToolbox => &["-hwaccel", "videotoolbox"],
            HardwareBackend::Nvenc => &["-hwaccel", "cuda"],
            HardwareBackend::Qsv => &["-hwaccel", "qsv"],
            HardwareBackend::Vaapi => &["-hwaccel", "vaapi", "-vaapi_device", DEFAULT_VAAPI_DEVICE],
        };
        args.iter().map(|a| a.to_string()).collect()
    }

    /// Whether the backend's encoders only accept a restricted set of surface
    /// pixel formats, so the input has to be re-planned for them.
    pub fn restricts_pixel_formats(self) -> bool {
        matches!(self, HardwareBackend::Qsv | HardwareBackend::Vaapi)
    }

    /// Per-stream options the backend's encoders need besides the encoder name.
    ///
    /// These replace planned options of the same name.
    fn encoder_options(self, high_bit_depth: bool) -> Vec<StreamOption> {
        match self {
            // VA-API encoders only take frames in GPU memory.
            HardwareBackend::Vaapi => vec![
                StreamOption::new(
                    "filter",
                    format!("format={},hwupload", surface_pixel_format(high_bit_depth)),
                ),
                StreamOption::new("pix_fmt", "vaapi"),
            ],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for HardwareBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HardwareBackend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "videotoolbox" | "vt" => Ok(HardwareBackend::VideoToolbox),
            "nvenc" | "cuda" | "nvidia" => Ok(HardwareBackend::Nvenc),
            "qsv" | "quicksync" => Ok(HardwareBackend::Qsv),
            "vaapi" => Ok(HardwareBackend::Vaapi),
            other => Err(CoreError::Config(format!(
                "Unknown hardware backend '{other}'. Valid values: videotoolbox, nvenc, qsv, vaapi"
            ))),
        }
    }
}

/// Surface pixel format hardware encoders accept for a source.
#[must_use]
pub fn surface_pixel_format(high_bit_depth: bool) -> &'static str {
    if high_bit_depth { "p010le" } else { "nv12" }
}

/// Checks if the current platform is macOS.
#[must_use]
pub fn is_macos() -> bool {
    env::consts::OS == "macos"
}

/// Encoder override for one output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderOverride {
    pub output_index: u32,
    pub encoder: String,
    pub options: Vec<StreamOption>,
}

/// One way of executing a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecCandidate {
    /// Short label used in logs and attempt records.
    pub label: String,
    /// `None` for the software candidate.
    pub backend: Option<HardwareBackend>,
    /// Arguments placed before the input.
    pub decoder_args: Vec<String>,
    pub overrides: Vec<EncoderOverride>,
    /// The input has to be re-planned with a surface pixel format before this
    /// candidate runs.
    pub reprobe_pixel_formats: bool,
}

impl CodecCandidate {
    /// The candidate that runs the plan as is.
    pub fn software() -> Self {
        Self {
            label: SOFTWARE_CANDIDATE.to_string(),
            backend: None,
            decoder_args: Vec::new(),
            overrides: Vec::new(),
            reprobe_pixel_formats: false,
        }
    }

    pub fn is_software(&self) -> bool {
        self.backend.is_none()
    }

    /// Encoder override for an output stream, if any.
    pub fn override_for(&self, output_index: u32) -> Option<&EncoderOverride> {
        self.overrides.iter().find(|o| o.output_index == output_index)
    }
}

/// Builds the hardware candidate for one backend, if it can encode every
/// transcoded video stream of the plan.
fn hardware_candidate(plan: &TranscodePlan, backend: HardwareBackend) -> Option<CodecCandidate> {
    let mut overrides = Vec::new();

    for stream in plan.transcoded_video() {
        let (StreamAction::Transcode { codec, .. }, Some(output_index)) =
            (&stream.action, stream.output_index)
        else {
            continue;
        };
        let encoder = backend.encoder_for(codec)?;
        let high_bit_depth = stream
            .source_pixel_format
            .as_deref()
            .is_some_and(is_high_bit_depth_format);
        overrides.push(EncoderOverride {
            output_index,
            encoder: encoder.to_string(),
            options: backend.encoder_options(high_bit_depth),
        });
    }

    if overrides.is_empty() {
        return None;
    }

    Some(CodecCandidate {
        label: backend.name().to_string(),
        backend: Some(backend),
        decoder_args: backend.decoder_args(),
        overrides,
        reprobe_pixel_formats: backend.restricts_pixel_formats(),
    })
}

/// Produces the ordered candidates for a plan.
///
/// # Arguments
///
/// * `plan` - The plan to execute
/// * `backends` - Hardware backends to consider, in preference order
///
/// # Returns
///
/// * `Vec<CodecCandidate>` - Hardware candidates first, the software candidate
///   last. Never empty.
pub fn explore(plan: &TranscodePlan, backends: &[HardwareBackend]) -> Vec<CodecCandidate> {
    let mut candidates: Vec<CodecCandidate> = backends
        .iter()
        .filter_map(|backend| {
            let candidate = hardware_candidate(plan, *backend);
            if candidate.is_none() && plan.transcoded_video().next().is_some() {
                log::debug!("Backend {backend} cannot encode every planned video codec, skipping");
            }
            candidate
        })
        .collect();
    candidates.push(CodecCandidate::software());

    log::debug!(
        "Codec candidates: {}",
        candidates
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    candidates
}
