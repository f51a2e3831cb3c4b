//! Grammar definitions
//!
//! A grammar is an ordered table of [`Matcher`]s compiled from text such as:
//!
//! ```text
//! # strings keep only what is between the quotes
//! ""(.*)""    string
//! "[0-9]+"    int
//! "\pZ+"      @skip
//! ```
//!
//! Order is priority: when scanning, the first matcher that matches the
//! remaining input wins, even if a later one would match more text. Put more
//! specific rules first.
//!
//! A [`Grammar`] is immutable once loaded and can be shared (e.g. behind an
//! `Arc`) by any number of concurrent scans.

pub mod loader;
pub mod matcher;

pub use matcher::{Matcher, PrefixMatch, Tag, CONC_TAG, FAIL_TAG, SKIP_TAG};

use crate::error::ParseError;
use std::io::BufRead;
use std::str::FromStr;

/// An ordered matcher table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Grammar {
    matchers: Vec<Matcher>,
}

impl Grammar {
    /// Build a grammar from already compiled matchers, keeping their order.
    pub fn new(matchers: Vec<Matcher>) -> Self {
        Self { matchers }
    }

    /// Load a grammar definition from any buffered reader.
    pub fn load<R: BufRead>(reader: R) -> Result<Self, ParseError> {
        loader::load_matchers(reader).map(Self::new)
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Matcher> {
        self.matchers.iter()
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// The first matcher, in priority order, that matches the start of `text`
    pub fn first_match<'g, 't>(
        &'g self,
        text: &'t str,
    ) -> Option<(&'g Matcher, PrefixMatch<'t>)> {
        self.matchers
            .iter()
            .find_map(|matcher| matcher.match_prefix(text).map(|m| (matcher, m)))
    }
}

impl FromStr for Grammar {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::load(s.as_bytes())
    }
}

impl<'g> IntoIterator for &'g Grammar {
    type Item = &'g Matcher;
    type IntoIter = std::slice::Iter<'g, Matcher>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
