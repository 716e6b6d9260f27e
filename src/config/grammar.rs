//! Path and selector grammar.
//!
//! Paths are identifiers separated by single slashes, e.g. `block1/seed`.
//! Selectors are sequences of identifiers or regular expressions separated
//! by single or double slashes, where a double slash matches zero or more
//! levels of the hierarchy, e.g. `//W.*/init_fun`.
//!
//! Both forms may be given as several fragments which are joined with `/`
//! before being split into segments, so `["block1", "sb2/seed"]` addresses
//! the same path as `"block1/sb2/seed"`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::ConfigError;

/// Display form of a wildcard segment.
pub const WILDCARD: &str = "//";

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\d\W]\w*$").unwrap());

static IDENTIFIER_CHAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\d\W]\w*(?:/[^\d\W]\w*)*$").unwrap());

static SLASH_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/{2,}").unwrap());

/// Returns `true` if `s` is a single legal path element.
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER.is_match(s)
}

/// Validates selector fragments.
///
/// A fragment must be non-empty, must not begin or end with a single `/`
/// and must not contain three or more consecutive slashes.
pub fn validate_selector_parts<S: AsRef<str>>(parts: &[S]) -> Result<(), ConfigError> {
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() {
            return Err(ConfigError::selector(part, "selector fragments can not be empty"));
        }
        if part.starts_with('/') && !part.starts_with(WILDCARD) {
            return Err(ConfigError::selector(
                part,
                "selector fragments can't begin with a single /, use // to match all descendants",
            ));
        }
        if part.ends_with('/') && !part.ends_with(WILDCARD) {
            return Err(ConfigError::selector(
                part,
                "selector fragments can't end with a single /",
            ));
        }
        if part.contains("///") {
            return Err(ConfigError::selector(
                part,
                "selector fragments can't contain more than two consecutive /",
            ));
        }
    }
    Ok(())
}

/// Validates path fragments: identifiers separated by single slashes.
pub fn validate_path_parts<S: AsRef<str>>(parts: &[S]) -> Result<(), ConfigError> {
    for part in parts {
        let part = part.as_ref();
        if part.is_empty() {
            return Err(ConfigError::path(part, "path fragments can not be empty"));
        }
        if !IDENTIFIER_CHAIN.is_match(part) {
            return Err(ConfigError::path(
                part,
                "path fragments must be identifiers separated by single slashes",
            ));
        }
    }
    Ok(())
}

/// Splits already validated fragments into segment tokens.
///
/// Every run of empty splits (a `//`) becomes a single [`WILDCARD`] token.
pub fn split_segments<S: AsRef<str>>(parts: &[S]) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for piece in parts.iter().flat_map(|p| p.as_ref().split('/')) {
        if !piece.is_empty() {
            tokens.push(piece.to_string());
        } else if tokens.last().map(String::as_str) != Some(WILDCARD) {
            tokens.push(WILDCARD.to_string());
        }
    }
    tokens
}

/// Joins already validated fragments with `/`.
///
/// Joining wildcard-ending and wildcard-starting fragments can produce runs
/// of up to five slashes; every such run collapses to exactly `//`.
pub fn join_valid<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/");
    SLASH_RUN.replace_all(&joined, WILDCARD).into_owned()
}

/// Validates a selector string and returns its normalized form.
pub fn normalize_selector(selector: &str) -> Result<String, ConfigError> {
    validate_selector_parts(&[selector])?;
    Ok(join_valid(&split_segments(&[selector])))
}

/// Validates path fragments and splits them into path elements.
pub fn parse_path<S: AsRef<str>>(parts: &[S]) -> Result<Vec<String>, ConfigError> {
    validate_path_parts(parts)?;
    Ok(split_segments(parts))
}

/// A single compiled selector segment.
#[derive(Debug, Clone)]
pub enum Segment {
    /// A plain identifier, matching only itself.
    Literal(String),
    /// A regular expression anchored to a whole path element.
    Pattern(Pattern),
    /// `//`, matching zero or more whole path elements.
    Wildcard,
}

impl Segment {
    /// Compiles one token produced by [`split_segments`].
    ///
    /// Tokens never contain `/`, so a pattern can only ever span a single
    /// path element.
    pub fn compile(token: &str) -> Result<Self, ConfigError> {
        if token == WILDCARD {
            Ok(Segment::Wildcard)
        } else if is_identifier(token) {
            Ok(Segment::Literal(token.to_string()))
        } else {
            Pattern::new(token).map(Segment::Pattern)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Segment::Literal(name) => name,
            Segment::Pattern(pattern) => pattern.as_str(),
            Segment::Wildcard => WILDCARD,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard)
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Segment {}

/// A regular-expression segment.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    fn new(source: &str) -> Result<Self, ConfigError> {
        let invalid = |e| ConfigError::InvalidPattern {
            fragment: source.to_string(),
            source: e,
        };
        // The bare source must compile on its own so that it cannot escape
        // the anchoring group below.
        Regex::new(source).map_err(invalid)?;
        let regex = Regex::new(&format!("^(?:{source})$")).map_err(invalid)?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// A compiled selector together with its normalized string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    segments: Vec<Segment>,
}

impl Selector {
    /// Validates, joins and compiles selector fragments.
    ///
    /// A trailing wildcard is accepted here; stores reject it on insertion.
    pub fn parse<S: AsRef<str>>(parts: &[S]) -> Result<Self, ConfigError> {
        validate_selector_parts(parts)?;
        let tokens = split_segments(parts);
        let segments = tokens
            .iter()
            .map(|t| Segment::compile(t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: join_valid(&tokens),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn ends_with_wildcard(&self) -> bool {
        self.segments.last().is_some_and(Segment::is_wildcard)
    }

    /// The final segment, if it is a literal.
    pub fn leaf(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Literal(name)) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// A path or selector given as one or more fragments.
///
/// `"block1/sb2"`, `["block1", "sb2"]` and `vec!["block1/sb2"]` all address
/// the same location; fragments are validated and grammar-joined by the
/// operation that receives them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Key(Vec<String>);

impl Key {
    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Fragments of `prefix` followed by this key's fragments.
    pub(crate) fn prefixed<S: AsRef<str>>(&self, prefix: &[S]) -> Vec<String> {
        prefix
            .iter()
            .map(|p| p.as_ref().to_string())
            .chain(self.0.iter().cloned())
            .collect()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key(vec![s.to_string()])
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key(vec![s])
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key(vec![s.clone()])
    }
}

impl From<&[&str]> for Key {
    fn from(parts: &[&str]) -> Self {
        Key(parts.iter().map(|p| p.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Key {
    fn from(parts: [&str; N]) -> Self {
        Key(parts.iter().map(|p| p.to_string()).collect())
    }
}

impl From<Vec<&str>> for Key {
    fn from(parts: Vec<&str>) -> Self {
        Key(parts.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Key {
    fn from(parts: Vec<String>) -> Self {
        Key(parts)
    }
}

/// Renders a segment list back into normalized selector form.
pub fn render(segments: &[Segment]) -> String {
    join_valid(&segments.iter().map(Segment::as_str).collect::<Vec<_>>())
}
