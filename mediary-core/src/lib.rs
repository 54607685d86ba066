//! Core library for requirement-driven media conversion using ffmpeg and ffprobe.
//!
//! This crate turns a set of ffmpeg-style requirement arguments and a probed
//! stream inventory into a per-stream transcode plan, orders hardware and
//! software codec candidates for that plan, compiles each candidate into an
//! ffmpeg argument vector, and runs the candidates until one succeeds.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use mediary_core::config::CoreConfigBuilder;
//! use mediary_core::external::{CommandFfprobeExecutor, SidecarSpawner};
//! use mediary_core::{ConversionRequest, Converter};
//!
//! let config = CoreConfigBuilder::new()
//!     .arg_sets(vec!["default".to_string(), "mp4".to_string()])
//!     .build();
//! config.validate().unwrap();
//!
//! let prober = CommandFfprobeExecutor::new(&config.ffprobe_path);
//! let converter = Converter::new(&config, &SidecarSpawner, &prober);
//! let report = converter
//!     .convert(&ConversionRequest::new("input.mkv", "output.mp4"))
//!     .unwrap();
//! println!("Converted with {} encoders", report.candidate);
//! ```

pub mod compile;
pub mod config;
pub mod convert;
pub mod error;
pub mod external;
pub mod fallback;
pub mod media;
pub mod planning;
pub mod requirements;

// Re-exports for public API
pub use compile::{CommandCompiler, format_command};
pub use config::{CoreConfig, CoreConfigBuilder};
pub use convert::{
    ConversionOutcome, ConversionReport, ConversionRequest, Converter, PreparedConversion,
    convert_file, prepare,
};
pub use error::{AttemptRecord, CoreError, CoreResult};
pub use external::check_dependency;
pub use fallback::{CodecCandidate, HardwareBackend, explore};
pub use media::{CodecType, Inventory, StreamDescriptor, parse_streams};
pub use planning::{StreamAction, TranscodePlan, plan};
pub use requirements::{RequirementSet, resolve};
