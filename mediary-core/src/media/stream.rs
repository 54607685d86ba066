//! Typed stream descriptors.

use serde::Serialize;
use std::fmt;

/// The kind of elementary stream, as reported by the prober.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecType {
    Video,
    Audio,
    Subtitle,
    Data,
}

impl CodecType {
    /// All stream types, in the order ffmpeg lists them.
    pub const ALL: [CodecType; 4] = [
        CodecType::Video,
        CodecType::Audio,
        CodecType::Subtitle,
        CodecType::Data,
    ];

    /// Parses the prober's `codec_type` value.
    ///
    /// Attachments (fonts in Matroska files and the like) are carried as data.
    #[must_use]
    pub fn from_probe(value: &str) -> Option<Self> {
        match value {
            "video" => Some(CodecType::Video),
            "audio" => Some(CodecType::Audio),
            "subtitle" => Some(CodecType::Subtitle),
            "data" | "attachment" => Some(CodecType::Data),
            _ => None,
        }
    }

    /// Parses an ffmpeg stream-type specifier letter (`v`, `a`, `s`, `d`).
    #[must_use]
    pub fn from_specifier(value: &str) -> Option<Self> {
        match value {
            "v" => Some(CodecType::Video),
            "a" => Some(CodecType::Audio),
            "s" => Some(CodecType::Subtitle),
            "d" => Some(CodecType::Data),
            _ => None,
        }
    }

    /// The ffmpeg stream-type specifier letter.
    #[must_use]
    pub fn specifier(self) -> &'static str {
        match self {
            CodecType::Video => "v",
            CodecType::Audio => "a",
            CodecType::Subtitle => "s",
            CodecType::Data => "d",
        }
    }
}

impl fmt::Display for CodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CodecType::Video => "video",
            CodecType::Audio => "audio",
            CodecType::Subtitle => "subtitle",
            CodecType::Data => "data",
        };
        f.write_str(name)
    }
}

/// One input stream as reported by the prober. Immutable once probed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamDescriptor {
    /// Stream index within the input container.
    pub index: u32,
    pub codec_type: CodecType,
    pub codec_name: String,
    /// Pixel format, only meaningful for video streams.
    pub pixel_format: Option<String>,
    /// Channel count, only meaningful for audio streams.
    pub channel_count: Option<u32>,
}

impl StreamDescriptor {
    /// Creates a descriptor with no pixel format or channel information.
    pub fn new(index: u32, codec_type: CodecType, codec_name: impl Into<String>) -> Self {
        Self {
            index,
            codec_type,
            codec_name: codec_name.into(),
            pixel_format: None,
            channel_count: None,
        }
    }

    /// Convenience constructor for a video stream.
    pub fn video(index: u32, codec_name: impl Into<String>, pixel_format: Option<&str>) -> Self {
        Self {
            pixel_format: pixel_format.map(str::to_string),
            ..Self::new(index, CodecType::Video, codec_name)
        }
    }

    /// Convenience constructor for an audio stream.
    pub fn audio(index: u32, codec_name: impl Into<String>, channel_count: Option<u32>) -> Self {
        Self {
            channel_count,
            ..Self::new(index, CodecType::Audio, codec_name)
        }
    }

    /// Convenience constructor for a subtitle stream.
    pub fn subtitle(index: u32, codec_name: impl Into<String>) -> Self {
        Self::new(index, CodecType::Subtitle, codec_name)
    }

    /// Whether the stream carries a high bit-depth pixel format (10 bits or more).
    #[must_use]
    pub fn is_high_bit_depth(&self) -> bool {
        self.pixel_format.as_deref().is_some_and(is_high_bit_depth_format)
    }
}

/// Whether a pixel format name denotes 10 bits per component or more.
#[must_use]
pub fn is_high_bit_depth_format(pixel_format: &str) -> bool {
    ["10le", "10be", "12le", "12be", "p010", "p016"]
        .iter()
        .any(|marker| pixel_format.contains(marker))
}
