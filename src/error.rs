//! Search engine error types

use thiserror::Error;

/// Failures local to one search attempt. There is no retry policy;
/// the caller decides whether to submit a fresh request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A search is already live; the new request is rejected, not queued.
    #[error("a search is already running")]
    AlreadyRunning,

    /// The request was rejected before any search state was created.
    #[error("invalid search request: {0}")]
    InvalidInput(String),

    /// The nonce counter reached u64::MAX without exceeding the target.
    /// Surfaced instead of wrapping, which would revisit nonces and
    /// report a duplicate result.
    #[error("nonce space exhausted before the target difficulty was exceeded")]
    SearchExhausted,

    /// No completed search has produced a result yet.
    #[error("no completed search result is available")]
    NoResult,
}
