//! Normalization of raw ffprobe output into stream descriptors.
//!
//! The prober reports a JSON document with a `streams` list and a `format`
//! object. Only `index`, `codec_type` and `codec_name` are required for each
//! stream; `pix_fmt` and `channels` are picked up when present.

use crate::error::{CoreError, CoreResult};
use crate::media::stream::{CodecType, StreamDescriptor};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
struct RawProbe {
    streams: Option<Vec<RawStream>>,
    format: Option<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawStream {
    index: Option<i64>,
    codec_type: Option<String>,
    codec_name: Option<String>,
    pix_fmt: Option<String>,
    channels: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    format_name: Option<String>,
}

/// The probed contents of one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    /// Streams in input order.
    pub streams: Vec<StreamDescriptor>,
    /// Container format reported by the prober (e.g. "matroska,webm").
    pub format_name: Option<String>,
}

impl Inventory {
    /// Builds an inventory directly from descriptors.
    pub fn from_streams(streams: Vec<StreamDescriptor>) -> Self {
        Self {
            streams,
            format_name: None,
        }
    }

    /// Parses raw prober output into an inventory.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MalformedProbeOutput` if the document is not valid
    /// JSON, has no `streams` list, or any stream lacks a required field.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let probe: RawProbe = serde_json::from_str(raw)
            .map_err(|e| CoreError::MalformedProbeOutput(format!("invalid JSON: {e}")))?;

        let raw_streams = probe.streams.ok_or_else(|| {
            CoreError::MalformedProbeOutput("missing 'streams' list".to_string())
        })?;

        let mut seen = HashSet::new();
        let mut streams = Vec::with_capacity(raw_streams.len());
        for (position, raw_stream) in raw_streams.into_iter().enumerate() {
            let descriptor = normalize_stream(position, raw_stream)?;
            if !seen.insert(descriptor.index) {
                return Err(CoreError::MalformedProbeOutput(format!(
                    "duplicate stream index {}",
                    descriptor.index
                )));
            }
            streams.push(descriptor);
        }

        Ok(Self {
            streams,
            format_name: probe.format.and_then(|f| f.format_name),
        })
    }

    /// Streams of the given type, in input order.
    pub fn streams_of(&self, codec_type: CodecType) -> impl Iterator<Item = &StreamDescriptor> {
        self.streams
            .iter()
            .filter(move |s| s.codec_type == codec_type)
    }
}

/// Parses raw prober output into the ordered list of stream descriptors.
///
/// # Errors
///
/// See [`Inventory::parse`].
pub fn parse_streams(raw: &str) -> CoreResult<Vec<StreamDescriptor>> {
    Inventory::parse(raw).map(|inventory| inventory.streams)
}

fn normalize_stream(position: usize, raw: RawStream) -> CoreResult<StreamDescriptor> {
    let missing = |field: &str| {
        CoreError::MalformedProbeOutput(format!("stream #{position} is missing '{field}'"))
    };

    let index = raw.index.ok_or_else(|| missing("index"))?;
    let index = u32::try_from(index).map_err(|_| {
        CoreError::MalformedProbeOutput(format!("stream #{position} has invalid index {index}"))
    })?;

    let type_name = raw.codec_type.ok_or_else(|| missing("codec_type"))?;
    let codec_type = CodecType::from_probe(&type_name).ok_or_else(|| {
        CoreError::MalformedProbeOutput(format!(
            "stream {index} has unknown codec_type '{type_name}'"
        ))
    })?;

    let codec_name = raw.codec_name.ok_or_else(|| missing("codec_name"))?;

    let pixel_format = match codec_type {
        CodecType::Video => raw.pix_fmt,
        _ => None,
    };

    let channel_count = match codec_type {
        CodecType::Audio => match raw.channels {
            Some(c) if c < 0 => {
                log::warn!("Negative channel count ({c}) for stream {index}, ignoring it");
                None
            }
            Some(c) => u32::try_from(c).ok(),
            None => None,
        },
        _ => None,
    };

    Ok(StreamDescriptor {
        index,
        codec_type,
        codec_name,
        pixel_format,
        channel_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {"index": 0, "codec_name": "h264", "codec_type": "video", "pix_fmt": "yuv420p", "width": 1920},
            {"index": 1, "codec_name": "aac", "codec_type": "audio", "channels": 6, "sample_rate": "48000"},
            {"index": 2, "codec_name": "subrip", "codec_type": "subtitle"}
        ],
        "format": {"format_name": "matroska,webm", "duration": "60.000000"}
    }"#;

    #[test]
    fn test_parse_preserves_order_and_fields() {
        let inventory = Inventory::parse(SAMPLE).unwrap();
        assert_eq!(inventory.streams.len(), 3);
        assert_eq!(
            inventory.streams[0],
            StreamDescriptor::video(0, "h264", Some("yuv420p"))
        );
        assert_eq!(inventory.streams[1], StreamDescriptor::audio(1, "aac", Some(6)));
        assert_eq!(inventory.streams[2], StreamDescriptor::subtitle(2, "subrip"));
        assert_eq!(inventory.format_name.as_deref(), Some("matroska,webm"));
    }

    #[test]
    fn test_parse_ignores_type_mismatched_fields() {
        let raw = r#"{"streams": [{"index": 0, "codec_name": "aac", "codec_type": "audio", "pix_fmt": "fltp", "channels": 2}]}"#;
        let streams = parse_streams(raw).unwrap();
        assert_eq!(streams[0].pixel_format, None);
        assert_eq!(streams[0].channel_count, Some(2));
    }

    #[test]
    fn test_missing_required_fields_are_malformed() {
        for raw in [
            r#"{"streams": [{"codec_name": "h264", "codec_type": "video"}]}"#,
            r#"{"streams": [{"index": 0, "codec_name": "h264"}]}"#,
            r#"{"streams": [{"index": 0, "codec_type": "video"}]}"#,
            r#"{"format": {}}"#,
            "not json",
        ] {
            let err = parse_streams(raw).unwrap_err();
            assert!(
                matches!(err, CoreError::MalformedProbeOutput(_)),
                "expected malformed probe output for {raw}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_duplicate_and_negative_indices_are_malformed() {
        let duplicate = r#"{"streams": [
            {"index": 0, "codec_name": "h264", "codec_type": "video"},
            {"index": 0, "codec_name": "aac", "codec_type": "audio"}
        ]}"#;
        assert!(matches!(
            parse_streams(duplicate),
            Err(CoreError::MalformedProbeOutput(_))
        ));

        let negative = r#"{"streams": [{"index": -1, "codec_name": "h264", "codec_type": "video"}]}"#;
        assert!(matches!(
            parse_streams(negative),
            Err(CoreError::MalformedProbeOutput(_))
        ));
    }

    #[test]
    fn test_attachment_streams_are_data() {
        let raw = r#"{"streams": [{"index": 3, "codec_name": "ttf", "codec_type": "attachment"}]}"#;
        let streams = parse_streams(raw).unwrap();
        assert_eq!(streams[0].codec_type, CodecType::Data);
    }

    #[test]
    fn test_empty_stream_list_is_valid() {
        let inventory = Inventory::parse(r#"{"streams": []}"#).unwrap();
        assert!(inventory.streams.is_empty());
        assert_eq!(inventory.format_name, None);
    }
}
