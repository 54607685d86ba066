//! Transcode plan data types.
//!
//! A [`TranscodePlan`] is produced fresh by every planning call and never
//! mutated afterwards. When a fallback attempt needs different requirements the
//! driver asks the planner for a new plan instead.

use serde::Serialize;
use std::fmt;

use crate::media::CodecType;
use crate::planning::resources::ResourceSet;

/// A per-stream encoder option, rendered as `-<name>:<output index> <value>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamOption {
    pub name: String,
    pub value: String,
}

impl StreamOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// What happens to one input stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum StreamAction {
    /// Stream-copy without re-encoding.
    Copy,
    /// Re-encode with the given codec and per-stream options.
    Transcode {
        codec: String,
        options: Vec<StreamOption>,
    },
    /// Leave the stream out of the output.
    Drop { reason: String },
}

impl fmt::Display for StreamAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamAction::Copy => f.write_str("copy"),
            StreamAction::Transcode { codec, .. } => write!(f, "transcode to {codec}"),
            StreamAction::Drop { reason } => write!(f, "drop ({reason})"),
        }
    }
}

/// The decision for one input stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStream {
    pub input_index: u32,
    pub codec_type: CodecType,
    pub source_codec: String,
    pub source_pixel_format: Option<String>,
    /// Position in the output, `None` when the stream is dropped.
    pub output_index: Option<u32>,
    #[serde(flatten)]
    pub action: StreamAction,
    pub resources: ResourceSet,
}

impl PlannedStream {
    pub fn is_dropped(&self) -> bool {
        matches!(self.action, StreamAction::Drop { .. })
    }

    pub fn is_transcoded(&self) -> bool {
        matches!(self.action, StreamAction::Transcode { .. })
    }
}

/// An audio stream added to the output by remixing an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesizedStream {
    pub source_index: u32,
    pub output_index: u32,
    /// Requested audio codec; `None` re-encodes with the source stream's codec.
    pub codec: Option<String>,
    pub channel_count: u32,
    pub resources: ResourceSet,
}

/// Why a stream was handled differently from what the requirements asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// Bitmap and text subtitles cannot be converted into each other.
    SubtitleClassMismatch { current: String, desired: String },
    /// The required container cannot carry the stream's codec.
    UnsupportedInContainer { codec: String, container: String },
    /// A channel count is required but there is no audio stream to remix.
    NoSynthesisSource { channel_count: u32 },
}

/// A non-fatal compatibility downgrade recorded on the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanWarning {
    /// Input stream the warning applies to, if any.
    pub stream_index: Option<u32>,
    #[serde(flatten)]
    pub kind: WarningKind,
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(index) = self.stream_index {
            write!(f, "stream {index}: ")?;
        }
        match &self.kind {
            WarningKind::SubtitleClassMismatch { current, desired } => write!(
                f,
                "cannot convert subtitle {current} to {desired} (bitmap/text mismatch), copying instead"
            ),
            WarningKind::UnsupportedInContainer { codec, container } => {
                write!(f, "{codec} is not supported in {container}, dropping stream")
            }
            WarningKind::NoSynthesisSource { channel_count } => write!(
                f,
                "{channel_count} audio channels required but there is no audio stream to remix"
            ),
        }
    }
}

/// The complete per-stream decision set for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscodePlan {
    /// One entry per input stream, in input order.
    pub streams: Vec<PlannedStream>,
    pub synthesized: Option<SynthesizedStream>,
    /// Union of every stream's resource tags.
    pub resources: ResourceSet,
    pub warnings: Vec<PlanWarning>,
    /// Required container format, if any.
    pub container_format: Option<String>,
    /// True when the input is not already in the required container.
    pub remux_required: bool,
    /// Pass-through global output options, already rendered as tokens.
    pub output_options: Vec<String>,
}

impl TranscodePlan {
    /// Returns true if the output would be an exact stream copy of the input.
    pub fn is_compliant(&self) -> bool {
        self.streams.iter().all(|s| s.action == StreamAction::Copy)
            && self.synthesized.is_none()
            && !self.remux_required
            && self.output_options.is_empty()
    }

    /// Number of streams in the output, including the synthesized one.
    pub fn output_stream_count(&self) -> u32 {
        let kept = self.streams.iter().filter(|s| !s.is_dropped()).count() as u32;
        kept + u32::from(self.synthesized.is_some())
    }

    /// Input indices of dropped streams, in input order.
    pub fn dropped_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.streams
            .iter()
            .filter(|s| s.is_dropped())
            .map(|s| s.input_index)
    }

    /// Streams that are re-encoded, in input order.
    pub fn transcoded(&self) -> impl Iterator<Item = &PlannedStream> {
        self.streams.iter().filter(|s| s.is_transcoded())
    }

    /// Video streams that are re-encoded, in input order.
    pub fn transcoded_video(&self) -> impl Iterator<Item = &PlannedStream> {
        self.transcoded()
            .filter(|s| s.codec_type == CodecType::Video)
    }

    /// The planned stream for an input index.
    pub fn stream(&self, input_index: u32) -> Option<&PlannedStream> {
        self.streams.iter().find(|s| s.input_index == input_index)
    }
}
