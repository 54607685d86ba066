// mediary-core/tests/planning_tests.rs

use mediary_core::planning::{Resource, WarningKind};
use mediary_core::*;

fn requirements(tokens: &[&str]) -> RequirementSet {
    resolve(&[tokens.to_vec()]).unwrap()
}

#[test]
fn test_stereo_downmix_is_synthesized_next_to_surround_source() {
    let inventory = Inventory::parse(
        r#"{
            "streams": [
                {"index": 0, "codec_type": "video", "codec_name": "h264", "pix_fmt": "yuv420p"},
                {"index": 1, "codec_type": "audio", "codec_name": "aac", "channels": 6}
            ],
            "format": {"format_name": "matroska,webm"}
        }"#,
    )
    .unwrap();
    let plan = plan(
        &inventory,
        &requirements(&["-codec:v", "h264", "-codec:a", "aac", "-ac", "2"]),
    );

    assert_eq!(plan.streams[0].action, StreamAction::Copy);
    assert_eq!(plan.streams[1].action, StreamAction::Copy);
    let synthesized = plan.synthesized.as_ref().unwrap();
    assert_eq!(synthesized.source_index, 1);
    assert_eq!(synthesized.output_index, 2);
    assert_eq!(synthesized.channel_count, 2);
    assert_eq!(synthesized.codec.as_deref(), Some("aac"));

    let candidates = explore(&plan, &[HardwareBackend::Nvenc]);
    assert_eq!(candidates.len(), 1);
    let args = CommandCompiler::new("ffmpeg", "in.mkv", "out.mkv")
        .compile(&plan, &candidates, 0)
        .unwrap();
    let line = args.join(" ");
    assert!(line.contains("-map 0 -map 0:1 -codec copy"));
    assert!(line.contains("-codec:2 aac -ac:2 2"));
    assert!(!line.contains("-codec:0"));
    assert!(!line.contains("-codec:v"));
}

#[test]
fn test_hevc_mono_input_is_transcoded_and_upmixed() {
    let inventory = Inventory::from_streams(vec![
        StreamDescriptor::video(0, "hevc", Some("yuv420p")),
        StreamDescriptor::audio(1, "aac", Some(1)),
    ]);
    let plan = plan(&inventory, &requirements(&["-codec:v", "h264", "-ac", "2"]));

    assert!(matches!(
        &plan.streams[0].action,
        StreamAction::Transcode { codec, .. } if codec == "h264"
    ));
    assert!(plan.streams[0].resources.contains(Resource::Disk));
    assert!(plan.streams[0].resources.contains(Resource::Processor));
    assert_eq!(plan.resources.to_string(), "disk+processor");

    let synthesized = plan.synthesized.as_ref().unwrap();
    assert_eq!(synthesized.source_index, 1);
    assert_eq!(synthesized.channel_count, 2);
    assert!(!plan.is_compliant());
}

#[test]
fn test_bitmap_subtitle_is_kept_when_text_is_required() {
    let inventory = Inventory::from_streams(vec![
        StreamDescriptor::video(0, "h264", Some("yuv420p")),
        StreamDescriptor::subtitle(1, "hdmv_pgs_subtitle"),
    ]);
    let plan = plan(
        &inventory,
        &requirements(&["-f", "mp4", "-codec:s", "webvtt"]),
    );

    assert_eq!(plan.streams[1].action, StreamAction::Copy);
    assert_eq!(plan.warnings.len(), 1);
    assert_eq!(plan.warnings[0].stream_index, Some(1));
    assert!(matches!(
        plan.warnings[0].kind,
        WarningKind::SubtitleClassMismatch { .. }
    ));
    assert!(plan.remux_required);
}

#[test]
fn test_planning_the_same_input_twice_is_identical() {
    let inventory = Inventory::from_streams(vec![
        StreamDescriptor::video(0, "vp9", Some("yuv420p10le")),
        StreamDescriptor::audio(1, "opus", Some(2)),
        StreamDescriptor::audio(2, "opus", Some(6)),
        StreamDescriptor::subtitle(3, "ass"),
    ]);
    let requirements = requirements(&["-f", "mp4", "-codec:v", "h264", "-codec:a", "aac"]);

    let first = plan(&inventory, &requirements);
    let second = plan(&inventory, &requirements);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_unrecognized_option_is_rejected_before_planning() {
    let err = resolve(&[vec!["-codec:v", "h264", "--"]]).unwrap_err();
    assert!(matches!(err, CoreError::UnrecognizedOption(_)));
}

#[test]
fn test_builtin_arg_sets_layer_left_to_right() {
    let lists =
        requirements::load_arg_sets(&["default", "compact", "mp4"], &[]).unwrap();
    let requirements = resolve(&lists).unwrap();

    assert_eq!(requirements.codec_for(CodecType::Video), Some("hevc"));
    assert_eq!(requirements.codec_for(CodecType::Audio), Some("aac"));
    assert_eq!(requirements.codec_for(CodecType::Subtitle), Some("mov_text"));
    assert_eq!(requirements.channel_count, Some(2));
    assert_eq!(requirements.container_format.as_deref(), Some("mp4"));
    assert_eq!(
        requirements.output_option_tokens(),
        vec!["-movflags", "+faststart"]
    );
}
