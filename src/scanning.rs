//! Scan engine
//!
//! Applies a [`Grammar`] to one line of input at a time. At every position the
//! matchers are tried in order against what remains of the line; the first
//! one that matches decides what happens:
//!
//! - `@skip`: the matched text is consumed and nothing is emitted
//! - `@fail`: scanning stops with an illegal token error
//! - anything else (including `@conc`): a [`Token`] is emitted
//!
//! A zero-length match consumes one character so the scanner always makes
//! progress. If no matcher matches, scanning stops with an error naming the
//! unmatched remainder of the line.
//!
//! Each token costs up to one regex attempt per matcher, so a scan is
//! O(matchers × tokens).

use crate::error::{ErrorKind, ParseError};
use crate::grammar::{Grammar, Tag};
use crate::token::Token;
use tracing::trace;

/// Lazily yields the tokens of a single line.
///
/// Yields `Err` at most once; the iterator is exhausted afterwards.
pub struct LineScanner<'g, 'l> {
    grammar: &'g Grammar,
    rest: &'l str,
    line_num: usize,
    failed: bool,
}

impl<'g, 'l> LineScanner<'g, 'l> {
    pub fn new(grammar: &'g Grammar, line: &'l str, line_num: usize) -> Self {
        Self {
            grammar,
            rest: line,
            line_num,
            failed: false,
        }
    }

    /// The part of the line not yet consumed
    pub fn remaining(&self) -> &'l str {
        self.rest
    }

    pub fn line_num(&self) -> usize {
        self.line_num
    }

    fn fail(&mut self, kind: ErrorKind) -> ParseError {
        self.failed = true;
        ParseError::input(self.line_num, kind)
    }

    /// Drop the matched prefix, or a single character for an empty match.
    fn advance(&mut self, matched_len: usize) {
        let step = if matched_len > 0 {
            matched_len
        } else {
            self.rest.chars().next().map_or(0, char::len_utf8)
        };
        self.rest = &self.rest[step..];
    }
}

impl<'g, 'l> Iterator for LineScanner<'g, 'l> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.failed && !self.rest.is_empty() {
            let Some((matcher, m)) = self.grammar.first_match(self.rest) else {
                let rest = self.rest.to_string();
                return Some(Err(self.fail(ErrorKind::NoMatch(rest))));
            };

            let token = match matcher.tag() {
                Tag::Skip => None,
                Tag::Fail => {
                    let value = m.value.to_string();
                    return Some(Err(self.fail(ErrorKind::IllegalToken(value))));
                }
                tag => Some(Token::new(tag.as_str(), m.value)),
            };

            self.advance(m.text.len());

            if let Some(token) = token {
                trace!(
                    target: "lexdef::scan",
                    line = self.line_num,
                    token_type = %token.token_type,
                    value = %token.value,
                    "Emitting token"
                );
                return Some(Ok(token));
            }
        }

        None
    }
}

impl std::iter::FusedIterator for LineScanner<'_, '_> {}

/// Scan one line, handing each token to `emit` as it is produced.
pub fn scan_line<F>(
    grammar: &Grammar,
    line: &str,
    line_num: usize,
    mut emit: F,
) -> Result<usize, ParseError>
where
    F: FnMut(Token),
{
    let mut count = 0;
    for token in LineScanner::new(grammar, line, line_num) {
        emit(token?);
        count += 1;
    }
    Ok(count)
}

impl Grammar {
    /// Tokenize an in-memory text, one line at a time.
    ///
    /// Lines are numbered from 1 and split as [`str::lines`] does, so both
    /// `\n` and `\r\n` terminators are stripped.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        for (idx, line) in input.lines().enumerate() {
            scan_line(self, line, idx + 1, |token| tokens.push(token))?;
        }
        Ok(tokens)
    }
}
