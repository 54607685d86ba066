// ============================================================================
// mediary-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// This module implements the builder pattern for the CoreConfig structure,
// providing a fluent API for creating CoreConfig instances. Every field has a
// default, so `CoreConfigBuilder::new().build()` equals `CoreConfig::default()`.
//
// KEY COMPONENTS:
// - CoreConfigBuilder: Builder struct for creating CoreConfig instances

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::CoreConfig;
use crate::fallback::HardwareBackend;

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use mediary_core::config::CoreConfigBuilder;
///
/// let config = CoreConfigBuilder::new()
///     .ffprobe_path("/opt/ffmpeg/bin/ffprobe")
///     .skip_compliant(false)
///     .dry_run(true)
///     .build();
/// assert!(config.dry_run);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    ///
    /// # Returns
    ///
    /// * A new CoreConfigBuilder instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ffmpeg executable.
    ///
    /// # Arguments
    ///
    /// * `path` - Executable name or path
    ///
    /// # Returns
    ///
    /// * Self for method chaining
    pub fn ffmpeg_path(mut self, path: impl Into<String>) -> Self {
        self.config.ffmpeg_path = path.into();
        self
    }

    /// Sets the ffprobe executable.
    ///
    /// # Arguments
    ///
    /// * `path` - Executable name or path
    ///
    /// # Returns
    ///
    /// * Self for method chaining
    pub fn ffprobe_path(mut self, path: impl Into<String>) -> Self {
        self.config.ffprobe_path = path.into();
        self
    }

    /// Replaces the argument-set sources.
    ///
    /// # Arguments
    ///
    /// * `sources` - Built-in names, names in the set directories, or file
    ///   paths, lowest precedence first
    ///
    /// # Returns
    ///
    /// * Self for method chaining
    pub fn arg_sets(mut self, sources: Vec<String>) -> Self {
        self.config.arg_sets = sources;
        self
    }

    /// Replaces the output argument-set sources.
    pub fn output_arg_sets(mut self, sources: Vec<String>) -> Self {
        self.config.output_arg_sets = sources;
        self
    }

    /// Adds a directory searched for named argument sets.
    pub fn arg_set_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.arg_set_dirs.push(dir.into());
        self
    }

    /// Replaces the hardware backends tried before the software encoders.
    pub fn hardware_backends(mut self, backends: Vec<HardwareBackend>) -> Self {
        self.config.hardware_backends = backends;
        self
    }

    /// Sets whether an existing output file is overwritten.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config.overwrite = overwrite;
        self
    }

    /// Sets whether an already compliant input skips the ffmpeg invocation.
    pub fn skip_compliant(mut self, skip: bool) -> Self {
        self.config.skip_compliant = skip;
        self
    }

    /// Sets dry-run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Builds the CoreConfig.
    ///
    /// # Returns
    ///
    /// * The configured CoreConfig instance
    pub fn build(self) -> CoreConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_defaults() {
        let config = CoreConfigBuilder::new()
            .ffmpeg_path("/opt/bin/ffmpeg")
            .arg_sets(vec!["compact".to_string()])
            .output_arg_sets(vec!["tuning.txt".to_string()])
            .arg_set_dir("/etc/mediary")
            .hardware_backends(vec![HardwareBackend::Vaapi])
            .overwrite(false)
            .skip_compliant(false)
            .build();

        assert_eq!(config.ffmpeg_path, "/opt/bin/ffmpeg");
        assert_eq!(config.ffprobe_path, super::super::DEFAULT_FFPROBE);
        assert_eq!(config.arg_sets, vec!["compact"]);
        assert_eq!(config.output_arg_sets, vec!["tuning.txt"]);
        assert_eq!(config.arg_set_dirs, vec![PathBuf::from("/etc/mediary")]);
        assert_eq!(config.hardware_backends, vec![HardwareBackend::Vaapi]);
        assert!(!config.overwrite);
        assert!(!config.skip_compliant);
        assert!(!config.dry_run);
    }
}
