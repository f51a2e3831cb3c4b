//! Pattern compiler
//!
//! Turns a single grammar line of the form
//!
//! ```text
//! "<pattern>"<spaces><tag>
//! ```
//!
//! into a [`Matcher`]. The pattern body is everything between the first and the
//! last double quote on the line, so quotes inside the body need no escaping:
//!
//! ```text
//! ""(.*)""    string
//! "[0-9]+"    int
//! "\pZ*"      @skip
//! ```

use crate::error::ErrorKind;
use once_cell::sync::Lazy;
use regex::Regex;
use regex_automata::meta;
use regex_automata::{Anchored, Input};
use std::fmt;
use tracing::trace;

/// Whole-line shape: quoted body, unicode separators, tag to end of line
static LANG_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"(.*)"\p{Z}+(.*)$"#).expect("grammar line regex is valid"));

/// A tag is a run with no quotes and no whitespace
static TOKEN_TYPE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[^"\s]+$"#).expect("token type regex is valid"));

pub const SKIP_TAG: &str = "@skip";
pub const FAIL_TAG: &str = "@fail";
pub const CONC_TAG: &str = "@conc";

/// Classification attached to a matcher
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `@skip`: recognized and discarded
    Skip,
    /// `@fail`: recognized input is illegal
    Fail,
    /// `@conc`: emitted like a named tag; marks tokens the caller may concatenate
    Conc,
    /// Caller-defined tag
    Named(String),
}

impl Tag {
    /// Parse a tag that already passed the shape check.
    fn parse(tag: &str) -> Result<Self, ErrorKind> {
        match tag {
            SKIP_TAG => Ok(Tag::Skip),
            FAIL_TAG => Ok(Tag::Fail),
            CONC_TAG => Ok(Tag::Conc),
            other if other.starts_with('@') => Err(ErrorKind::ReservedTokenType(other.to_string())),
            other => Ok(Tag::Named(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Tag::Skip => SKIP_TAG,
            Tag::Fail => FAIL_TAG,
            Tag::Conc => CONC_TAG,
            Tag::Named(name) => name,
        }
    }

    pub fn is_reserved(&self) -> bool {
        !matches!(self, Tag::Named(_))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled, prefix-anchored pattern paired with its tag
///
/// The pattern is compiled exactly as written; anchoring happens at search
/// time, so flags such as `(?x)` apply to the whole body.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: String,
    regex: meta::Regex,
    tag: Tag,
}

/// Result of applying a matcher to the start of a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch<'t> {
    /// Whole matched prefix
    pub text: &'t str,
    /// Capture group if present and participating, else the whole prefix
    pub value: &'t str,
}

impl Matcher {
    /// Compile a pattern body and tag.
    ///
    /// Diagnostics come from `regex`, which quotes the body as the grammar
    /// author wrote it.
    pub fn new(pattern: &str, tag: &str) -> Result<Self, ErrorKind> {
        let checked = Regex::new(pattern).map_err(|e| ErrorKind::Regexp(e.to_string()))?;

        if !TOKEN_TYPE_REGEX.is_match(tag) {
            return Err(ErrorKind::MisformattedTokenType);
        }

        // captures_len counts the implicit whole-match group
        if checked.captures_len() > 2 {
            return Err(ErrorKind::MultipleCapturingGroups);
        }

        let tag = Tag::parse(tag)?;
        let regex = meta::Regex::new(pattern).map_err(|e| ErrorKind::Regexp(e.to_string()))?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            tag,
        })
    }

    /// Compile one trimmed, non-comment grammar line.
    pub fn from_line(line: &str) -> Result<Self, ErrorKind> {
        let caps = LANG_LINE_REGEX
            .captures(line)
            .ok_or(ErrorKind::MisformattedLine)?;
        let (pattern, tag) = match (caps.get(1), caps.get(2)) {
            (Some(pattern), Some(tag)) => (pattern.as_str(), tag.as_str()),
            _ => return Err(ErrorKind::MisformattedLine),
        };

        let matcher = Self::new(pattern, tag)?;
        trace!(target: "lexdef::grammar", pattern, tag, "Compiled matcher");
        Ok(matcher)
    }

    /// Try to match at the very start of `text`.
    pub fn match_prefix<'t>(&self, text: &'t str) -> Option<PrefixMatch<'t>> {
        let input = Input::new(text).anchored(Anchored::Yes);
        let mut caps = self.regex.create_captures();
        self.regex.search_captures(&input, &mut caps);

        let whole = caps.get_match()?.span();
        let value = caps.get_group(1).unwrap_or(whole);

        Some(PrefixMatch {
            text: &text[whole.range()],
            value: &text[value.range()],
        })
    }

    /// The pattern body as written in the grammar
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    /// Whether the pattern has a capturing group
    pub fn has_capture(&self) -> bool {
        self.regex.captures_len() > 1
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.tag == other.tag
    }
}

impl Eq for Matcher {}
