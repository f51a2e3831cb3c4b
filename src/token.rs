//! Tokens emitted by the scanner

use serde::{Deserialize, Serialize};
use std::fmt;

/// A piece of recognized input
///
/// `token_type` is the tag of the rule that matched (a caller-defined tag, or
/// `@conc`). `value` is the rule's capture group when it has one, otherwise the
/// whole matched text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub token_type: String,
    pub value: String,
}

impl Token {
    pub fn new(token_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            token_type: token_type.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.token_type, self.value)
    }
}
