//! Plans a conversion from a captured ffprobe report and prints the commands
//! each codec candidate would run.
//!
//! ```text
//! ffprobe -v quiet -print_format json -show_format -show_streams movie.mkv > probe.json
//! cargo run --example plan_report -- probe.json movie.mkv default mp4
//! ```

use mediary_core::config::CoreConfigBuilder;
use mediary_core::external::ReplayFfprobeExecutor;
use mediary_core::fallback::HardwareBackend;
use mediary_core::{ConversionRequest, CoreResult, format_command, prepare};
use std::env;

fn main() -> CoreResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let (Some(report), Some(input)) = (args.next(), args.next()) else {
        eprintln!("usage: plan_report <probe.json> <input> [arg-set...]");
        std::process::exit(2);
    };
    let mut arg_sets: Vec<String> = args.collect();
    if arg_sets.is_empty() {
        arg_sets.push("default".to_string());
    }

    let config = CoreConfigBuilder::new()
        .arg_sets(arg_sets)
        .hardware_backends(HardwareBackend::ALL.to_vec())
        .build();
    let prober = ReplayFfprobeExecutor::new(report);
    let prepared = prepare(&config, &prober, &ConversionRequest::new(&input, "output.mkv"))?;

    for stream in &prepared.plan.streams {
        println!(
            "#{} {} {}: {}",
            stream.input_index, stream.codec_type, stream.source_codec, stream.action
        );
    }
    for warning in &prepared.plan.warnings {
        println!("warning: {warning}");
    }
    println!("resources: {}", prepared.plan.resources);

    for (index, candidate) in prepared.candidates.iter().enumerate() {
        println!("[{}] {}", candidate.label, format_command(&prepared.command(index)?));
    }
    Ok(())
}
