//! Grammar loader
//!
//! Reads a grammar source line by line and compiles every rule line through
//! [`Matcher::from_line`]. Blank lines and lines starting with `#` (after
//! trimming) are skipped without validation but still count towards the line
//! numbers used in diagnostics.

use super::matcher::Matcher;
use crate::error::{ErrorSource, ParseError};
use std::io::BufRead;
use tracing::debug;

/// Whether a trimmed grammar line carries no rule
fn is_comment_or_blank(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Compile every rule of a grammar source, stopping at the first error.
pub fn load_matchers<R: BufRead>(reader: R) -> Result<Vec<Matcher>, ParseError> {
    let mut matchers = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.map_err(|e| ParseError::io(ErrorSource::LangDef, &e))?;
        let line = line.trim();

        if is_comment_or_blank(line) {
            continue;
        }

        let matcher = Matcher::from_line(line).map_err(|kind| {
            debug!(target: "lexdef::grammar", line = line_num, error = %kind, "Rejected grammar line");
            ParseError::lang_def(line_num, kind)
        })?;
        matchers.push(matcher);
    }

    debug!(target: "lexdef::grammar", matchers = matchers.len(), "Loaded grammar");
    Ok(matchers)
}
