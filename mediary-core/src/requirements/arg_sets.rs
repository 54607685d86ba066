// ============================================================================
// mediary-core/src/requirements/arg_sets.rs
// ============================================================================
//
// ARGUMENT SETS: Named and file-based requirement sources
//
// An argument set is a list of option tokens describing what the output should
// look like. Sets are either built into the library, found by name in one of
// the configured directories (`<dir>/<name>.txt`), or read from an explicit
// file path. Files hold one or more options per line; blank lines and lines
// starting with `#` are ignored.

// ---- Standard library imports ----
use std::fs;
use std::path::{Path, PathBuf};

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

/// File extension for argument sets looked up by name.
pub const ARG_SET_EXTENSION: &str = "txt";

/// An argument set compiled into the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinArgSet {
    pub name: &'static str,
    pub description: &'static str,
    pub tokens: &'static [&'static str],
}

/// Built-in argument sets, in display order.
pub const BUILTIN_ARG_SETS: &[BuiltinArgSet] = &[
    BuiltinArgSet {
        name: "default",
        description: "Widely compatible H.264 video with stereo AAC audio",
        tokens: &["-codec:v", "h264", "-codec:a", "aac", "-ac", "2"],
    },
    BuiltinArgSet {
        name: "compact",
        description: "HEVC video with stereo AAC audio for smaller files",
        tokens: &["-codec:v", "hevc", "-codec:a", "aac", "-ac", "2"],
    },
    BuiltinArgSet {
        name: "mp4",
        description: "MP4 container with text subtitles and a front-loaded index",
        tokens: &["-f", "mp4", "-codec:s", "mov_text", "-movflags", "+faststart"],
    },
];

/// Looks up a built-in argument set by name.
pub fn builtin(name: &str) -> Option<&'static BuiltinArgSet> {
    BUILTIN_ARG_SETS.iter().find(|set| set.name == name)
}

/// Splits the contents of an argument-set file into tokens.
pub fn parse_arg_set_file(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

fn read_arg_set_file(path: &Path) -> CoreResult<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    log::debug!("Loaded argument set from {}", path.display());
    Ok(parse_arg_set_file(&contents))
}

/// Resolves one argument-set source into its option tokens.
///
/// # Arguments
///
/// * `source` - A built-in set name, a set name to look up in `dirs`, or a file path
/// * `dirs` - Directories searched for `<source>.txt`, in order
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The set's option tokens
/// * `Err(CoreError::ArgSetNotFound)` - If no built-in, directory entry or file matches
pub fn load_arg_set(source: &str, dirs: &[PathBuf]) -> CoreResult<Vec<String>> {
    if let Some(set) = builtin(source) {
        return Ok(set.tokens.iter().map(|t| t.to_string()).collect());
    }

    for dir in dirs {
        let candidate = dir.join(format!("{source}.{ARG_SET_EXTENSION}"));
        if candidate.is_file() {
            return read_arg_set_file(&candidate);
        }
    }

    let path = Path::new(source);
    if path.is_file() {
        return read_arg_set_file(path);
    }

    Err(CoreError::ArgSetNotFound(source.to_string()))
}

/// Resolves every source, preserving declaration order.
pub fn load_arg_sets<S: AsRef<str>>(sources: &[S], dirs: &[PathBuf]) -> CoreResult<Vec<Vec<String>>> {
    sources
        .iter()
        .map(|source| load_arg_set(source.as_ref(), dirs))
        .collect()
}
