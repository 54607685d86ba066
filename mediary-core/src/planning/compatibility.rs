// ============================================================================
// mediary-core/src/planning/compatibility.rs
// ============================================================================
//
// COMPATIBILITY TABLES: Static codec and container knowledge
//
// KEY COMPONENTS:
// - Bitmap subtitle classification (bitmap vs. text)
// - Container alias normalization
// - Container/codec support table
//
// Containers or stream types missing from the table are unrestricted.

// ---- External crate imports ----
use once_cell::sync::Lazy;

// ---- Standard library imports ----
use std::collections::{HashMap, HashSet};

// ---- Internal crate imports ----
use crate::media::CodecType;

/// Subtitle codecs that carry images rather than text.
static BITMAP_SUBTITLE_CODECS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "hdmv_pgs_subtitle",
        "pgssub",
        "dvd_subtitle",
        "dvdsub",
        "dvb_subtitle",
        "dvbsub",
        "xsub",
        "dvb_teletext",
    ]
    .into_iter()
    .collect()
});

/// Codecs each container can carry, per stream type.
type CodecTable = HashMap<&'static str, HashMap<CodecType, HashSet<&'static str>>>;

static CONTAINER_CODECS: Lazy<CodecTable> =
    Lazy::new(|| {
        let entries: &[(&str, CodecType, &[&str])] = &[
            (
                "mp4",
                CodecType::Video,
                &["h264", "hevc", "av1", "vp9", "mpeg4", "mpeg2video", "mjpeg"],
            ),
            (
                "mp4",
                CodecType::Audio,
                &["aac", "mp3", "ac3", "eac3", "alac", "opus", "flac"],
            ),
            ("mp4", CodecType::Subtitle, &["mov_text"]),
            ("mp4", CodecType::Data, &["tmcd"]),
            (
                "mov",
                CodecType::Video,
                &["h264", "hevc", "prores", "mpeg4", "mjpeg", "av1"],
            ),
            (
                "mov",
                CodecType::Audio,
                &["aac", "alac", "mp3", "ac3", "eac3", "pcm_s16le", "pcm_s24le"],
            ),
            ("mov", CodecType::Subtitle, &["mov_text"]),
            ("mov", CodecType::Data, &["tmcd"]),
            ("webm", CodecType::Video, &["vp8", "vp9", "av1"]),
            ("webm", CodecType::Audio, &["opus", "vorbis"]),
            ("webm", CodecType::Subtitle, &["webvtt"]),
            ("webm", CodecType::Data, &[]),
            ("mpegts", CodecType::Video, &["h264", "hevc", "mpeg2video", "mpeg1video"]),
            (
                "mpegts",
                CodecType::Audio,
                &["aac", "mp2", "mp3", "ac3", "eac3", "opus"],
            ),
            (
                "mpegts",
                CodecType::Subtitle,
                &["dvb_subtitle", "dvb_teletext"],
            ),
        ];

        let mut table = CodecTable::new();
        for (container, codec_type, codecs) in entries {
            table
                .entry(*container)
                .or_default()
                .insert(*codec_type, codecs.iter().copied().collect());
        }
        table
    });

/// Returns true if the subtitle codec is image based.
#[must_use]
pub fn is_bitmap_subtitle(codec: &str) -> bool {
    BITMAP_SUBTITLE_CODECS.contains(codec)
}

/// Returns true if converting between the two subtitle codecs would cross the
/// bitmap/text boundary, which no transcoder can do without OCR or rendering.
#[must_use]
pub fn crosses_subtitle_class(current: &str, desired: &str) -> bool {
    is_bitmap_subtitle(current) != is_bitmap_subtitle(desired)
}

/// Maps container aliases (file extensions and short names) to the muxer name.
#[must_use]
pub fn normalize_container(name: &str) -> &str {
    match name {
        "mkv" | "mka" | "mks" => "matroska",
        "m4v" | "m4a" => "mp4",
        "ts" | "m2ts" => "mpegts",
        "qt" => "mov",
        other => other,
    }
}

/// Returns true if `container` can carry a stream of `codec_type` encoded with `codec`.
///
/// Unknown containers or stream types are treated as unrestricted.
#[must_use]
pub fn container_supports(container: &str, codec_type: CodecType, codec: &str) -> bool {
    let container = normalize_container(container);
    match CONTAINER_CODECS
        .get(container)
        .and_then(|by_type| by_type.get(&codec_type))
    {
        Some(codecs) => codecs.contains(codec),
        None => true,
    }
}

/// Returns true if the prober's format name (e.g. "mov,mp4,m4a,3gp,3g2,mj2")
/// already names the given container.
#[must_use]
pub fn format_matches_container(format_name: &str, container: &str) -> bool {
    let container = normalize_container(container);
    format_name
        .split(',')
        .any(|name| normalize_container(name.trim()) == container)
}
