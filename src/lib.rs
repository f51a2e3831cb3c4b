//! # lexdef
//!
//! A table-driven lexer. Instead of hand-writing a scanner, describe the token
//! kinds of a language as an ordered list of regex rules:
//!
//! ```text
//! # pattern         tag
//! ""(.*)""          string
//! "[0-9]+"          int
//! "\pZ+"            @skip
//! "[^\pZ]"          @fail
//! ```
//!
//! Each rule is a double-quoted pattern followed by a tag. The scanner walks
//! every input line, and at each position the first rule whose pattern matches
//! decides the token. Three tags are reserved:
//!
//! - `@skip` discards the matched text
//! - `@fail` reports the matched text as illegal and stops
//! - `@conc` is emitted like any other tag; it marks tokens that the consumer
//!   may want to concatenate
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lexdef::{stream, Grammar};
//! use std::sync::Arc;
//!
//! let grammar: Arc<Grammar> = Arc::new(GRAMMAR.parse()?);
//!
//! // Synchronous, in memory
//! let tokens = grammar.tokenize("\"Hello\"   367")?;
//!
//! // Streaming, on a tokio task
//! let mut tokens = stream::lex(grammar.clone(), reader, 64);
//! while let Some(token) = tokens.next().await {
//!     println!("{}", token);
//! }
//! tokens.finish().await?;
//! ```
//!
//! Diagnostics are already formatted for users, e.g.
//! `Lang def: Line 2: Misformatted token type` or
//! `Input: Line 7: Could not extract token from $`.
//!
//! Events are emitted through `tracing` under the `lexdef::grammar`,
//! `lexdef::scan` and `lexdef::stream` targets.

pub mod config;
pub mod error;
pub mod grammar;
pub mod scanning;
pub mod stream;
pub mod token;

pub use config::{ConfigLoader, LexdefConfig, StreamConfig};
pub use error::{ErrorKind, ErrorSource, ParseError};
pub use grammar::{Grammar, Matcher, Tag};
pub use scanning::{scan_line, LineScanner};
pub use stream::{lex, lex_blocking, BlockingTokenStream, LexHandle, ScanStats, TokenStream};
pub use token::Token;
