//! Typed errors for the pipeline library. Application code wraps these in `anyhow`.

use thiserror::Error;

/// Failure of a blocking channel operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// The calling task's cancel token fired while it was blocked. Nothing was enqueued/dequeued.
    #[error("channel operation cancelled")]
    Cancelled,
    /// Every peer on the other side is gone.
    #[error("channel disconnected")]
    Disconnected,
}

/// Errors raised while configuring or starting a pipeline.
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("channel capacity must be at least 1")]
    ZeroCapacity,

    #[error("worker count must be at least 1")]
    ZeroWorkers,

    #[error("invalid name pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("only one of name, glob or regex may be set")]
    ConflictingNameFilters,

    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        role: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} thread panicked")]
    Panicked(&'static str),
}
