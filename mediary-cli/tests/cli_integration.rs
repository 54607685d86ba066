use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

const HEVC_MONO: &str = r#"{
    "streams": [
        {"index": 0, "codec_type": "video", "codec_name": "hevc", "pix_fmt": "yuv420p"},
        {"index": 1, "codec_type": "audio", "codec_name": "aac", "channels": 1}
    ],
    "format": {"format_name": "matroska,webm"}
}"#;

const COMPLIANT: &str = r#"{
    "streams": [
        {"index": 0, "codec_type": "video", "codec_name": "h264", "pix_fmt": "yuv420p"},
        {"index": 1, "codec_type": "audio", "codec_name": "aac", "channels": 2}
    ],
    "format": {"format_name": "matroska,webm"}
}"#;

// Helper function to get the path to the compiled binary
fn mediary_cmd() -> Command {
    let mut cmd = Command::cargo_bin("mediary").expect("Failed to find mediary binary");
    cmd.env_remove("MEDIARY_FFMPEG")
        .env_remove("MEDIARY_FFPROBE")
        .env_remove("MEDIARY_ARG_SET_DIR");
    cmd
}

/// Writes a probe report and a placeholder input file into a fresh directory.
fn fixture(report: &str) -> Result<(TempDir, PathBuf, PathBuf), Box<dyn Error>> {
    let dir = tempdir()?;
    let probe = dir.path().join("probe.json");
    fs::write(&probe, report)?;
    let input = dir.path().join("movie.mkv");
    fs::write(&input, "not really a movie")?;
    Ok((dir, probe, input))
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

#[test]
fn test_arg_sets_lists_builtins() -> Result<(), Box<dyn Error>> {
    mediary_cmd()
        .arg("arg-sets")
        .assert()
        .success()
        .stdout(contains("default"))
        .stdout(contains("compact"))
        .stdout(contains("-f mp4 -codec:s mov_text -movflags +faststart"));
    Ok(())
}

#[test]
fn test_plan_from_captured_probe_report() -> Result<(), Box<dyn Error>> {
    let (_dir, probe, input) = fixture(HEVC_MONO)?;

    mediary_cmd()
        .args(["plan", path_arg(&input), "--probe-output", path_arg(&probe), "--no-hwaccel"])
        .assert()
        .success()
        .stdout(contains("transcode to h264"))
        .stdout(contains("2 channel audio from #1"))
        .stdout(contains("Compliant: no"))
        .stdout(contains("1. software"))
        .stdout(contains("-codec:0 h264"));
    Ok(())
}

#[test]
fn test_plan_json_lists_candidates_in_order() -> Result<(), Box<dyn Error>> {
    let (_dir, probe, input) = fixture(HEVC_MONO)?;

    let output = mediary_cmd()
        .args([
            "plan",
            path_arg(&input),
            "--probe-output",
            path_arg(&probe),
            "--hwaccel",
            "nvenc,qsv",
            "--output",
            "out.mkv",
            "--json",
        ])
        .output()?;
    assert!(output.status.success());

    let document: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(document["compliant"], false);
    assert_eq!(document["plan"]["streams"][0]["action"], "transcode");
    assert_eq!(document["plan"]["streams"][0]["codec"], "h264");
    assert_eq!(document["plan"]["synthesized"]["channel_count"], 2);

    let labels: Vec<_> = document["candidates"]
        .as_array()
        .expect("candidates array")
        .iter()
        .map(|c| c["label"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(labels, vec!["nvenc", "qsv", "software"]);
    assert!(
        document["candidates"][2]["command"]
            .as_array()
            .is_some_and(|command| command[0] == "ffmpeg")
    );
    Ok(())
}

#[test]
fn test_probe_prints_inventory() -> Result<(), Box<dyn Error>> {
    let (_dir, probe, input) = fixture(HEVC_MONO)?;

    mediary_cmd()
        .args(["probe", path_arg(&input), "--probe-output", path_arg(&probe)])
        .assert()
        .success()
        .stdout(contains("\"codec_name\": \"hevc\""))
        .stdout(contains("\"format_name\": \"matroska,webm\""));
    Ok(())
}

#[test]
fn test_convert_dry_run_prints_first_candidate() -> Result<(), Box<dyn Error>> {
    let (dir, probe, input) = fixture(HEVC_MONO)?;
    let output = dir.path().join("movie.out.mkv");

    mediary_cmd()
        .args([
            "convert",
            path_arg(&input),
            path_arg(&output),
            "--probe-output",
            path_arg(&probe),
            "--hwaccel",
            "nvenc",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(contains("Dry run (nvenc encoders)"))
        .stdout(contains("-hwaccel cuda"))
        .stdout(contains("-codec:0 h264_nvenc"));
    assert!(!output.exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_convert_skips_compliant_input() -> Result<(), Box<dyn Error>> {
    let (dir, probe, input) = fixture(COMPLIANT)?;
    let output = dir.path().join("movie.out.mkv");

    // `true` stands in for ffmpeg; it only has to pass the availability check.
    mediary_cmd()
        .args([
            "convert",
            path_arg(&input),
            path_arg(&output),
            "--probe-output",
            path_arg(&probe),
            "--ffmpeg",
            "true",
        ])
        .assert()
        .success()
        .stdout(contains("already satisfies the requirements"))
        .stdout(contains("-codec copy"))
        .stdout(contains("-codec:").not());
    assert!(!output.exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_output_args_keep_compliant_input_skipped() -> Result<(), Box<dyn Error>> {
    let (dir, probe, input) = fixture(COMPLIANT)?;
    let tuning = dir.path().join("tuning.txt");
    fs::write(&tuning, "-crf 18\n-preset slow\n")?;
    let output = dir.path().join("movie.out.mkv");

    mediary_cmd()
        .args([
            "convert",
            path_arg(&input),
            path_arg(&output),
            "--probe-output",
            path_arg(&probe),
            "--required-args",
            "default",
            "--output-args",
            path_arg(&tuning),
            "--ffmpeg",
            "true",
        ])
        .assert()
        .success()
        .stdout(contains("already satisfies the requirements"))
        .stdout(contains("-crf 18 -preset slow"));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_plan_shows_output_args_in_commands_only() -> Result<(), Box<dyn Error>> {
    let (dir, probe, input) = fixture(HEVC_MONO)?;
    let tuning = dir.path().join("tuning.txt");
    fs::write(&tuning, "-preset slow\n")?;

    let output = mediary_cmd()
        .args([
            "plan",
            path_arg(&input),
            "--probe-output",
            path_arg(&probe),
            "--no-hwaccel",
            "--output-args",
            path_arg(&tuning),
            "--json",
        ])
        .output()?;
    assert!(output.status.success());

    let document: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(document["plan"]["output_options"], serde_json::json!([]));
    let command: Vec<&str> = document["candidates"][0]["command"]
        .as_array()
        .expect("command array")
        .iter()
        .filter_map(|token| token.as_str())
        .collect();
    assert!(command.windows(2).any(|pair| pair == ["-preset", "slow"]));
    Ok(())
}

#[test]
fn test_stream_index_codec_option_fails() -> Result<(), Box<dyn Error>> {
    let (dir, probe, input) = fixture(HEVC_MONO)?;
    let set = dir.path().join("indexed.txt");
    fs::write(&set, "-codec:0 hevc\n")?;

    mediary_cmd()
        .args(["plan", path_arg(&input), "--probe-output", path_arg(&probe), "-a", path_arg(&set)])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("stream type specifier"));
    Ok(())
}

#[test]
fn test_arg_set_directory_is_searched() -> Result<(), Box<dyn Error>> {
    let (dir, probe, input) = fixture(HEVC_MONO)?;
    fs::write(dir.path().join("keep.txt"), "-codec:v copy\n-codec:a copy\n")?;

    mediary_cmd()
        .args(["plan", path_arg(&input), "--probe-output", path_arg(&probe), "-a", "keep"])
        .env("MEDIARY_ARG_SET_DIR", dir.path())
        .assert()
        .success()
        .stdout(contains("Compliant: yes"));
    Ok(())
}

#[test]
fn test_unknown_arg_set_fails() -> Result<(), Box<dyn Error>> {
    let (_dir, probe, input) = fixture(HEVC_MONO)?;

    mediary_cmd()
        .args(["plan", path_arg(&input), "--probe-output", path_arg(&probe), "-a", "no-such-set"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Argument set not found"));
    Ok(())
}

#[test]
fn test_unrecognized_option_in_arg_set_fails() -> Result<(), Box<dyn Error>> {
    let (dir, probe, input) = fixture(HEVC_MONO)?;
    let set = dir.path().join("broken.txt");
    fs::write(&set, "-codec:v h264 --\n")?;

    mediary_cmd()
        .args(["plan", path_arg(&input), "--probe-output", path_arg(&probe), "-a", path_arg(&set)])
        .assert()
        .failure()
        .stderr(contains("Unrecognized option"));
    Ok(())
}

#[test]
fn test_malformed_probe_report_fails() -> Result<(), Box<dyn Error>> {
    let (_dir, probe, input) = fixture(r#"{"format": {"format_name": "mp4"}}"#)?;

    mediary_cmd()
        .args(["plan", path_arg(&input), "--probe-output", path_arg(&probe)])
        .assert()
        .failure()
        .stderr(contains("Malformed probe output"));
    Ok(())
}

#[test]
fn test_convert_non_existent_input() -> Result<(), Box<dyn Error>> {
    let (dir, probe, _input) = fixture(HEVC_MONO)?;

    mediary_cmd()
        .args([
            "convert",
            "surely/this/does/not/exist/input.mkv",
            path_arg(&dir.path().join("out.mkv")),
            "--probe-output",
            path_arg(&probe),
            "--dry-run",
        ])
        .assert()
        .failure()
        .stderr(contains("Input file does not exist"));
    Ok(())
}
