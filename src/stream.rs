//! Token stream producer
//!
//! Runs the scan engine over a whole input source and delivers tokens through a
//! bounded channel while scanning is still in progress. The consumer reads from
//! the channel concurrently; when the channel is full the producer waits, so no
//! token is ever dropped.
//!
//! The channel is closed exactly once, when the producer stops for any reason:
//! end of input, a scan error, a read fault, or the consumer going away. The
//! outcome is reported separately through [`TokenStream::finish`] (or
//! [`LexHandle::join`]), so an error is never silently swallowed.
//!
//! Two flavours share these semantics:
//!
//! - [`lex`] spawns a tokio task and reads an [`AsyncBufRead`] source
//! - [`lex_blocking`] spawns an OS thread and reads a [`BufRead`] source; it
//!   needs no runtime, but its consumer side must not be driven from inside one

use crate::config::StreamConfig;
use crate::error::{ErrorKind, ErrorSource, ParseError};
use crate::grammar::Grammar;
use crate::scanning::LineScanner;
use crate::token::Token;
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Counters for a finished scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Input lines read
    pub lines: usize,
    /// Tokens delivered to the channel
    pub tokens: usize,
}

/// Handle on a running async producer
#[derive(Debug)]
pub struct LexHandle {
    inner: JoinHandle<Result<ScanStats, ParseError>>,
}

impl LexHandle {
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// Wait for the producer and return its outcome.
    ///
    /// A panic inside the producer is resumed on the caller.
    pub async fn join(self) -> Result<ScanStats, ParseError> {
        match self.inner.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Err(ParseError::new(ErrorSource::Input, None, ErrorKind::Cancelled)),
        }
    }
}

/// Tokens of an input being scanned by a tokio task
#[derive(Debug)]
pub struct TokenStream {
    receiver: mpsc::Receiver<Token>,
    handle: LexHandle,
}

impl TokenStream {
    /// Next token, or `None` once the producer has stopped and the buffer is drained
    pub async fn next(&mut self) -> Option<Token> {
        self.receiver.recv().await
    }

    /// Scan the rest of the input, discarding tokens not yet received, and
    /// return the outcome for the whole input.
    ///
    /// Use [`TokenStream::close`] to stop without reading further.
    pub async fn finish(mut self) -> Result<ScanStats, ParseError> {
        while self.receiver.recv().await.is_some() {}
        self.handle.join().await
    }

    /// Stop the producer at its next send and return the stats of what it did.
    ///
    /// Errors further along the input are never reached, so this only fails
    /// for an error the producer hit before noticing the closed channel.
    pub async fn close(self) -> Result<ScanStats, ParseError> {
        drop(self.receiver);
        self.handle.join().await
    }

    /// Receive every token, then return them if the scan succeeded.
    pub async fn collect(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.receiver.recv().await {
            tokens.push(token);
        }
        self.handle.join().await?;
        Ok(tokens)
    }

    pub fn into_parts(self) -> (mpsc::Receiver<Token>, LexHandle) {
        (self.receiver, self.handle)
    }
}

/// Scan `input` on a new tokio task.
///
/// Must be called from within a tokio runtime. A `capacity` of zero is treated
/// as one.
pub fn lex<R>(grammar: Arc<Grammar>, input: R, capacity: usize) -> TokenStream
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let inner = tokio::spawn(produce(grammar, input, sender));

    TokenStream {
        receiver,
        handle: LexHandle { inner },
    }
}

async fn produce<R>(
    grammar: Arc<Grammar>,
    input: R,
    sender: mpsc::Sender<Token>,
) -> Result<ScanStats, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    debug!(target: "lexdef::stream", matchers = grammar.len(), "Starting scan");
    let mut stats = ScanStats::default();
    let mut lines = input.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| scan_failed(ParseError::io(ErrorSource::Input, &e)))?
    {
        stats.lines += 1;
        for token in LineScanner::new(&grammar, &line, stats.lines) {
            let token = token.map_err(scan_failed)?;
            if sender.send(token).await.is_err() {
                return Ok(consumer_gone(stats));
            }
            stats.tokens += 1;
        }
    }

    debug!(target: "lexdef::stream", lines = stats.lines, tokens = stats.tokens, "Finished scan");
    Ok(stats)
}

/// Tokens of an input being scanned by a background thread
#[derive(Debug)]
pub struct BlockingTokenStream {
    receiver: mpsc::Receiver<Token>,
    handle: thread::JoinHandle<Result<ScanStats, ParseError>>,
}

impl BlockingTokenStream {
    /// Scan the rest of the input, discarding tokens not yet received, and
    /// return the outcome for the whole input.
    pub fn finish(mut self) -> Result<ScanStats, ParseError> {
        while self.receiver.blocking_recv().is_some() {}
        Self::join(self.handle)
    }

    /// Stop the producer at its next send and return the stats of what it did.
    pub fn close(self) -> Result<ScanStats, ParseError> {
        drop(self.receiver);
        Self::join(self.handle)
    }

    fn join(handle: thread::JoinHandle<Result<ScanStats, ParseError>>) -> Result<ScanStats, ParseError> {
        match handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

impl Iterator for BlockingTokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.receiver.blocking_recv()
    }
}

/// Scan `input` on a new OS thread.
///
/// A `capacity` of zero is treated as one.
pub fn lex_blocking<R>(grammar: Arc<Grammar>, input: R, capacity: usize) -> BlockingTokenStream
where
    R: BufRead + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let handle = thread::spawn(move || produce_blocking(&grammar, input, sender));

    BlockingTokenStream { receiver, handle }
}

fn produce_blocking<R: BufRead>(
    grammar: &Grammar,
    input: R,
    sender: mpsc::Sender<Token>,
) -> Result<ScanStats, ParseError> {
    debug!(target: "lexdef::stream", matchers = grammar.len(), "Starting blocking scan");
    let mut stats = ScanStats::default();

    for line in input.lines() {
        let line = line.map_err(|e| scan_failed(ParseError::io(ErrorSource::Input, &e)))?;
        stats.lines += 1;
        for token in LineScanner::new(grammar, &line, stats.lines) {
            let token = token.map_err(scan_failed)?;
            if sender.blocking_send(token).is_err() {
                return Ok(consumer_gone(stats));
            }
            stats.tokens += 1;
        }
    }

    debug!(target: "lexdef::stream", lines = stats.lines, tokens = stats.tokens, "Finished blocking scan");
    Ok(stats)
}

fn scan_failed(err: ParseError) -> ParseError {
    debug!(target: "lexdef::stream", error = %err, "Scan failed");
    err
}

fn consumer_gone(stats: ScanStats) -> ScanStats {
    debug!(
        target: "lexdef::stream",
        lines = stats.lines,
        tokens = stats.tokens,
        "Token receiver dropped, stopping scan"
    );
    stats
}

impl Grammar {
    /// Scan `input` on a tokio task, buffering as configured.
    pub fn lex<R>(self: Arc<Self>, input: R, config: &StreamConfig) -> TokenStream
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        lex(self, input, config.capacity)
    }

    /// Scan `input` on an OS thread, buffering as configured.
    pub fn lex_blocking<R>(self: Arc<Self>, input: R, config: &StreamConfig) -> BlockingTokenStream
    where
        R: BufRead + Send + 'static,
    {
        lex_blocking(self, input, config.capacity)
    }
}
