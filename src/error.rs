//! Error types shared by grammar loading and scanning
//!
//! Every failure in lexdef is terminal: loading stops at the first bad grammar
//! line and scanning stops at the first bad input position. A [`ParseError`]
//! carries enough context to be shown to a user as-is:
//!
//! ```text
//! Lang def: Line 3: Misformatted token type
//! Input: Line 12: Could not extract token from $$
//! ```

use std::fmt;
use std::io;

/// Which of the two text streams an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSource {
    /// The grammar definition
    LangDef,
    /// The text being tokenized
    Input,
}

impl ErrorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSource::LangDef => "Lang def",
            ErrorSource::Input => "Input",
        }
    }
}

impl fmt::Display for ErrorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The specific cause of a [`ParseError`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Grammar line is not `"<pattern>"<spaces><tag>`
    MisformattedLine,
    /// Pattern body failed to compile; holds the regex diagnostic
    Regexp(String),
    /// Tag contains a quote or whitespace
    MisformattedTokenType,
    /// Pattern has more than one capturing group
    MultipleCapturingGroups,
    /// Tag starts with `@` but is not one of the reserved tags
    ReservedTokenType(String),
    /// Input matched an `@fail` rule; holds the token value
    IllegalToken(String),
    /// No rule matched; holds the unmatched remainder of the line
    NoMatch(String),
    /// The underlying stream could not be read
    Io(String),
    /// The producer task was cancelled before it finished, e.g. by runtime shutdown
    Cancelled,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MisformattedLine => write!(f, "Misformatted line"),
            ErrorKind::Regexp(msg) => write!(f, "Regexp:\n\t{}", msg),
            ErrorKind::MisformattedTokenType => write!(f, "Misformatted token type"),
            ErrorKind::MultipleCapturingGroups => {
                write!(f, "Multiple capturing groups exist in regexp")
            }
            ErrorKind::ReservedTokenType(tag) => write!(f, "Token type {} is reserved", tag),
            ErrorKind::IllegalToken(value) => write!(f, "Found illegal token: {}", value),
            ErrorKind::NoMatch(rest) => write!(f, "Could not extract token from {}", rest),
            ErrorKind::Io(msg) => write!(f, "{}", msg),
            ErrorKind::Cancelled => write!(f, "Token producer was cancelled"),
        }
    }
}

/// A terminal grammar or input error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    source: ErrorSource,
    line: Option<usize>,
    kind: ErrorKind,
}

impl ParseError {
    pub fn new(source: ErrorSource, line: Option<usize>, kind: ErrorKind) -> Self {
        Self { source, line, kind }
    }

    /// Grammar error at a 1-based grammar line
    pub fn lang_def(line: usize, kind: ErrorKind) -> Self {
        Self::new(ErrorSource::LangDef, Some(line), kind)
    }

    /// Input error at a 1-based input line
    pub fn input(line: usize, kind: ErrorKind) -> Self {
        Self::new(ErrorSource::Input, Some(line), kind)
    }

    /// Read fault of a stream. These carry no line context.
    pub fn io(source: ErrorSource, err: &io::Error) -> Self {
        Self::new(source, None, ErrorKind::Io(err.to_string()))
    }

    pub fn source_kind(&self) -> ErrorSource {
        self.source
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The cause, without source or line prefix
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) if line > 0 => write!(f, "{}: Line {}: {}", self.source, line, self.kind),
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for ParseError {}
