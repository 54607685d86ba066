//! Configuration structures and constants for the mediary-core library.
//!
//! A [`CoreConfig`] is built once per invocation by the consumer (e.g.
//! mediary-cli) and passed explicitly into the conversion driver. Nothing in
//! the library reads configuration from global state.

mod builder;

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};
use crate::fallback::HardwareBackend;

pub use builder::CoreConfigBuilder;

// Default constants

/// Default ffmpeg executable, resolved through `PATH`.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Default ffprobe executable, resolved through `PATH`.
pub const DEFAULT_FFPROBE: &str = "ffprobe";

/// Argument set used when none is given.
pub const DEFAULT_ARG_SET: &str = "default";

/// Main configuration structure for the mediary-core library.
///
/// # Examples
///
/// ```rust
/// use mediary_core::config::CoreConfigBuilder;
/// use mediary_core::fallback::HardwareBackend;
///
/// let config = CoreConfigBuilder::new()
///     .ffmpeg_path("/usr/local/bin/ffmpeg")
///     .arg_sets(vec!["default".to_string(), "mp4".to_string()])
///     .hardware_backends(vec![HardwareBackend::Nvenc])
///     .overwrite(false)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// ffmpeg executable name or path
    pub ffmpeg_path: String,

    /// ffprobe executable name or path
    pub ffprobe_path: String,

    /// Argument-set sources (built-in names, names in `arg_set_dirs`, or file
    /// paths), lowest precedence first
    pub arg_sets: Vec<String>,

    /// Output argument-set sources, resolved like `arg_sets`. Their options are
    /// added to the compiled command but never change the plan or the
    /// compliance check
    pub output_arg_sets: Vec<String>,

    /// Directories searched for `<name>.txt` argument sets
    pub arg_set_dirs: Vec<PathBuf>,

    /// Hardware backends to try before the software encoders, in order
    pub hardware_backends: Vec<HardwareBackend>,

    /// Overwrite an existing output file
    pub overwrite: bool,

    /// Do not invoke ffmpeg when the input already satisfies the requirements
    pub skip_compliant: bool,

    /// Compile the first candidate's command without running it
    pub dry_run: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: DEFAULT_FFMPEG.to_string(),
            ffprobe_path: DEFAULT_FFPROBE.to_string(),
            arg_sets: vec![DEFAULT_ARG_SET.to_string()],
            output_arg_sets: Vec::new(),
            arg_set_dirs: Vec::new(),
            hardware_backends: HardwareBackend::detect(),
            overwrite: true,
            skip_compliant: true,
            dry_run: false,
        }
    }
}

impl CoreConfig {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the configuration is usable
    /// * `Err(CoreError::Config)` - If an executable path is empty, an
    ///   argument-set directory does not exist, or a backend is listed twice
    pub fn validate(&self) -> CoreResult<()> {
        if self.ffmpeg_path.trim().is_empty() {
            return Err(CoreError::Config("ffmpeg path must not be empty".to_string()));
        }
        if self.ffprobe_path.trim().is_empty() {
            return Err(CoreError::Config("ffprobe path must not be empty".to_string()));
        }

        for dir in &self.arg_set_dirs {
            if !dir.is_dir() {
                return Err(CoreError::Config(format!(
                    "Argument set directory does not exist: {}",
                    dir.display()
                )));
            }
        }

        let mut seen = HashSet::new();
        for backend in &self.hardware_backends {
            if !seen.insert(*backend) {
                return Err(CoreError::Config(format!(
                    "Hardware backend '{backend}' is listed more than once"
                )));
            }
        }

        Ok(())
    }
}
