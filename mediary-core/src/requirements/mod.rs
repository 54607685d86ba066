// ============================================================================
// mediary-core/src/requirements/mod.rs
// ============================================================================
//
// REQUIREMENT SET: Typed output constraints
//
// This module turns one or more option token lists into the typed constraints
// the planner works with. Lists are merged left to right (later lists win), so
// callers can layer a site-wide argument set under a per-file one.
//
// KEY COMPONENTS:
// - CodecMap: Required codec per stream type
// - RequirementSet: Codecs, pixel format, channel count, container, extras
// - resolve: Ordered token lists -> RequirementSet
// - resolve_output_options: Ordered token lists -> extra command tokens
//
// A RequirementSet is built fresh for every planning call and never mutated
// afterwards.

pub mod arg_sets;
pub mod options;

// ---- External crate imports ----
use serde::Serialize;

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::media::CodecType;

pub use arg_sets::{BUILTIN_ARG_SETS, BuiltinArgSet, load_arg_set, load_arg_sets};
pub use options::{OptionBindings, OptionValue, parse_option_tokens};

/// Codec value meaning "keep whatever the stream already has".
pub const COPY_CODEC: &str = "copy";

/// Required codec per stream type. `None` means the stream is left as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodecMap {
    pub video: Option<String>,
    pub audio: Option<String>,
    pub subtitle: Option<String>,
    pub data: Option<String>,
}

impl CodecMap {
    pub fn get(&self, codec_type: CodecType) -> Option<&str> {
        match codec_type {
            CodecType::Video => self.video.as_deref(),
            CodecType::Audio => self.audio.as_deref(),
            CodecType::Subtitle => self.subtitle.as_deref(),
            CodecType::Data => self.data.as_deref(),
        }
    }

    /// Sets the requirement for one stream type. `copy` clears it.
    pub fn set(&mut self, codec_type: CodecType, codec: &str) {
        let value = (codec != COPY_CODEC).then(|| codec.to_string());
        match codec_type {
            CodecType::Video => self.video = value,
            CodecType::Audio => self.audio = value,
            CodecType::Subtitle => self.subtitle = value,
            CodecType::Data => self.data = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        CodecType::ALL.iter().all(|t| self.get(*t).is_none())
    }
}

/// Typed output constraints for one planning call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementSet {
    pub codecs: CodecMap,
    /// Required pixel format for video streams.
    pub pixel_format: Option<String>,
    /// Required audio channel count.
    pub channel_count: Option<u32>,
    /// Required container format (the `-f` value).
    pub container_format: Option<String>,
    /// Options without typed meaning, passed through to the transcoder as
    /// global output options in binding order.
    pub output_options: OptionBindings,
    /// Bare tokens, bound as `arg_1`, `arg_2`, ... They have no effect on the
    /// plan.
    pub positionals: Vec<(String, String)>,
}

impl RequirementSet {
    /// Builds a requirement set from already-parsed bindings.
    ///
    /// # Returns
    ///
    /// * `Err(CoreError::UnrecognizedOption)` - If a typed option has the wrong
    ///   arity or an invalid value
    pub fn from_bindings(bindings: &OptionBindings) -> CoreResult<Self> {
        let mut requirements = RequirementSet::default();

        // `-codec` and `-codec:v` overlap, so codecs are applied in write order
        for (name, value) in bindings.iter_by_last_write() {
            match codec_target(name)? {
                Some(CodecTarget::All) => {
                    let codec = single_value(name, value)?;
                    for codec_type in CodecType::ALL {
                        requirements.codecs.set(codec_type, codec);
                    }
                }
                Some(CodecTarget::Type(codec_type)) => {
                    requirements.codecs.set(codec_type, single_value(name, value)?);
                }
                None => {}
            }
        }

        for (name, value) in bindings.iter() {
            if codec_target(name)?.is_some() {
                continue;
            }

            match name {
                "pix_fmt" => {
                    requirements.pixel_format = Some(single_value(name, value)?.to_string());
                }
                "ac" => {
                    let raw = single_value(name, value)?;
                    let count = raw
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| options::invalid_value(name, value, "a positive integer"))?;
                    requirements.channel_count = Some(count);
                }
                "f" => {
                    requirements.container_format = Some(single_value(name, value)?.to_string());
                }
                _ if options::is_positional(name) => {
                    if let OptionValue::Single(token) = value {
                        requirements.positionals.push((name.to_string(), token.clone()));
                    }
                }
                _ => requirements.output_options.insert(name, value.clone()),
            }
        }

        Ok(requirements)
    }

    /// Returns the codec required for a stream type, if any.
    pub fn codec_for(&self, codec_type: CodecType) -> Option<&str> {
        self.codecs.get(codec_type)
    }

    /// Flattens the pass-through options back into tokens.
    pub fn output_option_tokens(&self) -> Vec<String> {
        self.output_options
            .iter()
            .flat_map(|(name, value)| options::render_option(name, value))
            .collect()
    }
}

enum CodecTarget {
    All,
    Type(CodecType),
}

const CODEC_KEYS: [&str; 6] = ["codec", "c", "vcodec", "acodec", "scodec", "dcodec"];

/// Classifies a codec option name. Codec options only take a stream type
/// specifier; `-codec:0` or `-c:v:1` would bind a single input stream and are
/// rejected.
fn codec_target(name: &str) -> CoreResult<Option<CodecTarget>> {
    let target = match name {
        "codec" | "c" => CodecTarget::All,
        "vcodec" => CodecTarget::Type(CodecType::Video),
        "acodec" => CodecTarget::Type(CodecType::Audio),
        "scodec" => CodecTarget::Type(CodecType::Subtitle),
        "dcodec" => CodecTarget::Type(CodecType::Data),
        _ => {
            let Some((key, spec)) = name.split_once(':') else {
                return Ok(None);
            };
            if !CODEC_KEYS.contains(&key) {
                return Ok(None);
            }
            match CodecType::from_specifier(spec) {
                Some(codec_type) if key == "codec" || key == "c" => CodecTarget::Type(codec_type),
                _ => {
                    return Err(CoreError::UnrecognizedOption(format!(
                        "-{name} (codec options take only a stream type specifier: v, a, s or d)"
                    )));
                }
            }
        }
    };
    Ok(Some(target))
}

/// Returns true if `name` is an option the planner interprets.
fn is_typed_option(name: &str) -> bool {
    let key = name.split_once(':').map_or(name, |(key, _)| key);
    CODEC_KEYS.contains(&key) || matches!(key, "pix_fmt" | "ac" | "f")
}

fn single_value<'a>(name: &str, value: &'a OptionValue) -> CoreResult<&'a str> {
    value
        .as_single()
        .ok_or_else(|| options::invalid_value(name, value, "a single value"))
}

/// Resolves ordered option token lists into a requirement set.
///
/// # Arguments
///
/// * `lists` - Token lists in precedence order; later lists override earlier ones
///
/// # Returns
///
/// * `Ok(RequirementSet)` - The merged, typed requirements
/// * `Err(CoreError::UnrecognizedOption)` - If a token cannot be classified or a
///   typed option has an invalid value
///
/// # Examples
///
/// ```rust
/// use mediary_core::media::CodecType;
/// use mediary_core::requirements::resolve;
///
/// let requirements = resolve(&[vec!["-codec:v", "h264", "-ac", "2"]]).unwrap();
/// assert_eq!(requirements.codec_for(CodecType::Video), Some("h264"));
/// assert_eq!(requirements.channel_count, Some(2));
/// ```
pub fn resolve<T: AsRef<str>>(lists: &[Vec<T>]) -> CoreResult<RequirementSet> {
    let mut merged = OptionBindings::new();
    for list in lists {
        merged.merge(parse_option_tokens(list)?);
    }
    let requirements = RequirementSet::from_bindings(&merged)?;
    log::debug!(
        "Resolved requirements from {} source(s): {:?}",
        lists.len(),
        requirements
    );
    Ok(requirements)
}

/// Resolves output argument lists into tokens for the compiled command.
///
/// Output arguments tune how the output is written (encoder presets, metadata
/// handling) and never change what the output must satisfy, so they play no
/// part in planning or in the compliance check. Lists merge left to right like
/// requirement lists.
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The merged options, rendered in binding order
/// * `Err(CoreError::UnrecognizedOption)` - If a list contains a token made
///   only of dashes, a bare token, or an option the planner interprets
///   (codec, `-pix_fmt`, `-ac`, `-f`), which belongs in a requirement list
pub fn resolve_output_options<T: AsRef<str>>(lists: &[Vec<T>]) -> CoreResult<Vec<String>> {
    let mut merged = OptionBindings::new();
    for list in lists {
        merged.merge(parse_option_tokens(list)?);
    }

    let mut tokens = Vec::new();
    for (name, value) in merged.iter() {
        if options::is_positional(name) {
            let token = value.as_single().unwrap_or(name);
            return Err(CoreError::UnrecognizedOption(format!(
                "{token} (output arguments must be options)"
            )));
        }
        if is_typed_option(name) {
            return Err(CoreError::UnrecognizedOption(format!(
                "-{name} (affects the plan, use a required argument set)"
            )));
        }
        tokens.extend(options::render_option(name, value));
    }
    Ok(tokens)
}
