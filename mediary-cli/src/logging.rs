// ============================================================================
// mediary-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and file logging for the CLI
//
// The core library only uses the `log` facade; the binary decides where the
// records go. Without a log file, env_logger writes to stderr and honours
// RUST_LOG. With --log-file or --log-dir, log4rs writes the same records to
// stderr and to the file.
//
// KEY COMPONENTS:
// - get_timestamp: Timestamp for log file names
// - log_file_path: Resolves --log-file / --log-dir
// - init_logging: Installs the global logger

// ---- External crate imports ----
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

// ---- Internal crate imports ----
use crate::error::{CliErrorContext, CliResult};
use mediary_core::CoreError;

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let log_filename = format!("mediary_{}.log", mediary_cli::logging::get_timestamp());
/// assert!(log_filename.starts_with("mediary_"));
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Resolves the log file from the `--log-file` and `--log-dir` options.
///
/// # Returns
///
/// * `Some(PathBuf)` - The explicit file, or `mediary_<timestamp>.log` in the
///   directory
/// * `None` - If neither option was given
pub fn log_file_path(log_file: Option<&Path>, log_dir: Option<&Path>) -> Option<PathBuf> {
    log_file
        .map(Path::to_path_buf)
        .or_else(|| log_dir.map(|dir| dir.join(format!("mediary_{}.log", get_timestamp()))))
}

/// Installs the global logger.
///
/// # Arguments
///
/// * `verbose` - Log at debug level instead of info
/// * `log_file` - Also write records to this file
///
/// # Returns
///
/// * `Ok(())` - If the logger was installed
/// * `Err(CoreError)` - If the log file cannot be created or a logger is
///   already installed
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> CliResult<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let Some(log_file) = log_file else {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(level.as_str().to_ascii_lowercase()),
        )
        .format_target(false)
        .try_init()
        .map_err(|e| CoreError::Config(format!("Failed to initialize logger: {e}")))?;
        return Ok(());
    };

    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .cli_with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{h({l})}] {m}{n}")))
        .build();

    // File appender with clean format for log files
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}",
        )))
        .build(log_file)
        .cli_with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .appender(Appender::builder().build("file", Box::new(file)))
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(level),
        )
        .map_err(|e| CoreError::Config(format!("Invalid logging configuration: {e}")))?;

    log4rs::init_config(config)
        .map_err(|e| CoreError::Config(format!("Failed to initialize logger: {e}")))?;

    log::debug!("Logging to {}", log_file.display());
    Ok(())
}
