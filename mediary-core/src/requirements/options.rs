// ============================================================================
// mediary-core/src/requirements/options.rs
// ============================================================================
//
// OPTION TOKENS: Free-form option list parsing
//
// Argument sets are written in the transcoder's own option grammar, so there is
// no fixed schema to parse them against. The arity of each option is inferred
// by looking ahead: an option followed by another option (or nothing) is a
// flag, otherwise it takes every value up to the next option.
//
// KEY COMPONENTS:
// - OptionValue: Flag / Single / Multi value of one option
// - OptionBindings: Ordered, last-writer-wins option map
// - parse_option_tokens: Token list -> OptionBindings

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

/// Prefix used for bindings of bare (non-option) tokens.
pub const POSITIONAL_PREFIX: &str = "arg_";

/// Value bound to a single option name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// The option was given without values.
    Flag,
    /// The option was followed by exactly one value.
    Single(String),
    /// The option was followed by several values.
    Multi(Vec<String>),
}

impl OptionValue {
    /// Returns the value if exactly one was given.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            OptionValue::Single(value) => Some(value),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            OptionValue::Flag => "no value".to_string(),
            OptionValue::Single(value) => format!("'{value}'"),
            OptionValue::Multi(values) => format!("{} values", values.len()),
        }
    }
}

/// Ordered map from option name (without leading dashes) to its value.
///
/// Re-binding a name replaces its value but keeps its original position, so
/// iteration order is the order in which names were first seen. Each binding
/// also remembers when it was last written; see
/// [`OptionBindings::iter_by_last_write`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionBindings {
    entries: Vec<Binding>,
    writes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    name: String,
    value: OptionValue,
    written: u64,
}

impl OptionBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `value`, replacing any earlier binding.
    pub fn insert(&mut self, name: impl Into<String>, value: OptionValue) {
        let name = name.into();
        self.writes += 1;
        let written = self.writes;
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => {
                entry.value = value;
                entry.written = written;
            }
            None => self.entries.push(Binding {
                name,
                value,
                written,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), &entry.value))
    }

    /// Iterates bindings oldest write first. Options that overlap (`-codec`
    /// and `-codec:v`) must be applied in this order for the last writer to win.
    pub fn iter_by_last_write(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        let mut ordered: Vec<&Binding> = self.entries.iter().collect();
        ordered.sort_by_key(|entry| entry.written);
        ordered
            .into_iter()
            .map(|entry| (entry.name.as_str(), &entry.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges `other` into `self`; bindings in `other` win and count as newer
    /// than every binding already in `self`.
    pub fn merge(&mut self, other: OptionBindings) {
        let mut incoming = other.entries;
        incoming.sort_by_key(|entry| entry.written);
        for entry in incoming {
            self.insert(entry.name, entry.value);
        }
    }
}

/// Returns true if `name` is the binding of a bare token (`arg_1`, `arg_2`, ...).
pub fn is_positional(name: &str) -> bool {
    name.strip_prefix(POSITIONAL_PREFIX)
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

fn is_option_token(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}

/// Parses a free-form option token list into bindings.
///
/// # Arguments
///
/// * `tokens` - Tokens in the transcoder's option grammar, e.g.
///   `["-codec:v", "h264", "-ac", "2"]`
///
/// # Returns
///
/// * `Ok(OptionBindings)` - One binding per distinct option name
/// * `Err(CoreError::UnrecognizedOption)` - If a token consists only of dashes
pub fn parse_option_tokens<T: AsRef<str>>(tokens: &[T]) -> CoreResult<OptionBindings> {
    let mut bindings = OptionBindings::new();
    let mut positional = 1;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_ref();
        i += 1;

        if !is_option_token(token) {
            bindings.insert(
                format!("{POSITIONAL_PREFIX}{positional}"),
                OptionValue::Single(token.to_string()),
            );
            positional += 1;
            continue;
        }

        let name = token.trim_start_matches('-');
        if name.is_empty() {
            return Err(CoreError::UnrecognizedOption(token.to_string()));
        }

        let mut values = Vec::new();
        while i < tokens.len() && !is_option_token(tokens[i].as_ref()) {
            values.push(tokens[i].as_ref().to_string());
            i += 1;
        }

        let value = match values.len() {
            0 => OptionValue::Flag,
            1 => OptionValue::Single(values.remove(0)),
            _ => OptionValue::Multi(values),
        };
        bindings.insert(name, value);
    }

    Ok(bindings)
}

/// Renders a binding back into tokens, e.g. `("movflags", Single)` ->
/// `["-movflags", "+faststart"]`.
pub fn render_option(name: &str, value: &OptionValue) -> Vec<String> {
    let mut tokens = vec![format!("-{name}")];
    match value {
        OptionValue::Flag => {}
        OptionValue::Single(v) => tokens.push(v.clone()),
        OptionValue::Multi(vs) => tokens.extend(vs.iter().cloned()),
    }
    tokens
}

pub(crate) fn invalid_value(name: &str, value: &OptionValue, expected: &str) -> CoreError {
    CoreError::UnrecognizedOption(format!(
        "-{name} expects {expected}, got {}",
        value.describe()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_is_inferred_by_lookahead() {
        let bindings =
            parse_option_tokens(&["--foo", "qux", "grault", "--corge", "--bar", "garply"]).unwrap();

        assert_eq!(
            bindings.get("foo"),
            Some(&OptionValue::Multi(vec!["qux".into(), "grault".into()]))
        );
        assert_eq!(bindings.get("corge"), Some(&OptionValue::Flag));
        assert_eq!(bindings.get("bar"), Some(&OptionValue::Single("garply".into())));
    }

    #[test]
    fn test_trailing_option_is_flag() {
        let bindings = parse_option_tokens(&["-codec:v", "h264", "-y"]).unwrap();
        assert_eq!(bindings.get("y"), Some(&OptionValue::Flag));
    }

    #[test]
    fn test_leading_bare_tokens_are_positional() {
        let bindings = parse_option_tokens(&["input.mkv", "-", "-ac", "2"]).unwrap();
        assert_eq!(
            bindings.get("arg_1"),
            Some(&OptionValue::Single("input.mkv".into()))
        );
        assert_eq!(bindings.get("arg_2"), Some(&OptionValue::Single("-".into())));
        assert_eq!(bindings.get("ac"), Some(&OptionValue::Single("2".into())));
        assert!(is_positional("arg_2"));
        assert!(!is_positional("arg_"));
        assert!(!is_positional("ac"));
    }

    #[test]
    fn test_dash_only_token_is_rejected() {
        let err = parse_option_tokens(&["-ac", "2", "--"]).unwrap_err();
        assert!(matches!(err, CoreError::UnrecognizedOption(ref t) if t == "--"));
    }

    #[test]
    fn test_last_writer_wins_keeps_first_position() {
        let bindings =
            parse_option_tokens(&["-ac", "2", "-f", "mp4", "-ac", "6"]).unwrap();
        let names: Vec<&str> = bindings.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["ac", "f"]);
        assert_eq!(bindings.get("ac"), Some(&OptionValue::Single("6".into())));
    }

    #[test]
    fn test_merge_prefers_later_bindings() {
        let mut base = parse_option_tokens(&["-codec:a", "aac", "-ac", "2"]).unwrap();
        let over = parse_option_tokens(&["-ac", "6", "-sn"]).unwrap();
        base.merge(over);
        assert_eq!(base.len(), 3);
        assert_eq!(base.get("ac"), Some(&OptionValue::Single("6".into())));
        assert_eq!(base.get("sn"), Some(&OptionValue::Flag));
    }

    #[test]
    fn test_last_write_order_follows_rebinding() {
        let mut base = parse_option_tokens(&["-codec:v", "h264", "-codec", "aac"]).unwrap();
        let over = parse_option_tokens(&["-codec:v", "hevc"]).unwrap();
        base.merge(over);

        let by_write: Vec<&str> = base.iter_by_last_write().map(|(name, _)| name).collect();
        assert_eq!(by_write, vec!["codec", "codec:v"]);
        let by_position: Vec<&str> = base.iter().map(|(name, _)| name).collect();
        assert_eq!(by_position, vec!["codec:v", "codec"]);
    }

    #[test]
    fn test_empty_tokens() {
        let tokens: [&str; 0] = [];
        assert!(parse_option_tokens(&tokens).unwrap().is_empty());
    }

    #[test]
    fn test_render_option() {
        assert_eq!(render_option("sn", &OptionValue::Flag), vec!["-sn"]);
        assert_eq!(
            render_option("movflags", &OptionValue::Single("+faststart".into())),
            vec!["-movflags", "+faststart"]
        );
    }
}
