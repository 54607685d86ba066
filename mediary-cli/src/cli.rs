// mediary-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use mediary_core::HardwareBackend;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Mediary: requirement-driven media conversion",
    long_about = "Plans per-stream copy/transcode/drop decisions from ffmpeg-style requirement \
                  arguments and runs ffmpeg with hardware encoders first, software last."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "log_dir")]
    pub log_file: Option<PathBuf>,

    /// Write logs to a timestamped file in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts one file so it satisfies the requirement arguments
    Convert(ConvertArgs),
    /// Prints the transcode plan and candidate commands without running ffmpeg
    Plan(PlanArgs),
    /// Prints the stream inventory of a file
    Probe(ProbeArgs),
    /// Lists the built-in argument sets
    ArgSets,
}

/// Options shared by every command that plans a conversion.
#[derive(Args, Debug, Clone)]
pub struct RequirementArgs {
    /// Argument set the output must satisfy: a built-in name, a name in
    /// --arg-set-dir, or a file path. Repeatable; later sets override earlier ones.
    #[arg(short = 'a', long = "args", visible_alias = "required-args", value_name = "SET")]
    pub arg_sets: Vec<String>,

    /// Argument set added to the ffmpeg command only (encoder tuning, metadata
    /// handling). Never makes an input non-compliant. Repeatable.
    #[arg(long = "output-args", value_name = "SET")]
    pub output_arg_sets: Vec<String>,

    /// Directory searched for <name>.txt argument sets
    #[arg(long, value_name = "DIR", env = "MEDIARY_ARG_SET_DIR")]
    pub arg_set_dir: Option<PathBuf>,

    /// Comma-separated hardware backends to try, in order (videotoolbox, nvenc, qsv, vaapi)
    #[arg(long, value_delimiter = ',', value_name = "LIST", conflicts_with = "no_hwaccel")]
    pub hwaccel: Option<Vec<HardwareBackend>>,

    /// Only use software encoders
    #[arg(long, default_value_t = false)]
    pub no_hwaccel: bool,

    /// ffmpeg executable
    #[arg(long, value_name = "PATH", env = "MEDIARY_FFMPEG")]
    pub ffmpeg: Option<String>,

    /// ffprobe executable
    #[arg(long, value_name = "PATH", env = "MEDIARY_FFPROBE")]
    pub ffprobe: Option<String>,

    /// Use a captured `ffprobe -print_format json -show_format -show_streams`
    /// report instead of running ffprobe
    #[arg(long, value_name = "JSON")]
    pub probe_output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input media file
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// Output media file
    #[arg(required = true, value_name = "OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub requirements: RequirementArgs,

    /// Print the command for the first candidate without running it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Fail instead of overwriting an existing output file
    #[arg(long, default_value_t = false)]
    pub no_overwrite: bool,

    /// Run ffmpeg even when the input already satisfies the requirements
    #[arg(long, default_value_t = false)]
    pub always_run: bool,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Input media file
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub requirements: RequirementArgs,

    /// Output path used in the rendered commands (defaults to INPUT with a
    /// `.converted` suffix before the extension)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the plan as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input media file
    #[arg(required = true, value_name = "INPUT")]
    pub input: PathBuf,

    /// ffprobe executable
    #[arg(long, value_name = "PATH", env = "MEDIARY_FFPROBE")]
    pub ffprobe: Option<String>,

    /// Use a captured ffprobe JSON report instead of running ffprobe
    #[arg(long, value_name = "JSON")]
    pub probe_output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert_args() {
        let cli = Cli::parse_from([
            "mediary", "convert", "in.mkv", "out.mp4", "-a", "default", "--args", "mp4",
            "--hwaccel", "nvenc,qsv", "--dry-run",
        ]);

        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.input, PathBuf::from("in.mkv"));
                assert_eq!(args.output, PathBuf::from("out.mp4"));
                assert_eq!(args.requirements.arg_sets, vec!["default", "mp4"]);
                assert_eq!(
                    args.requirements.hwaccel,
                    Some(vec![HardwareBackend::Nvenc, HardwareBackend::Qsv])
                );
                assert!(args.dry_run);
                assert!(!args.no_overwrite);
                assert!(!args.always_run);
            }
            other => panic!("Expected Convert command, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["mediary", "plan", "in.mkv", "--json", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Plan(PlanArgs { json: true, .. })));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result = Cli::try_parse_from(["mediary", "plan", "in.mkv", "--hwaccel", "amf"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_hwaccel_conflicts_with_no_hwaccel() {
        let result = Cli::try_parse_from([
            "mediary", "plan", "in.mkv", "--hwaccel", "qsv", "--no-hwaccel",
        ]);
        assert!(result.is_err());
    }
}
