//! runpow Prover Library
//!
//! A proof-of-work-style search: given a text prefix, find a decimal
//! nonce suffix whose SHA-256 digest contains a longer run of
//! identical hex nibbles than any seen so far.
//!
//! # Overview
//!
//! The heavy lifting lives in two places:
//!
//! - [`algorithm`] (the `runpow-core` crate): the nibble run-length
//!   scorer and the incremental prefix digest.
//! - [`engine`]: the background search task that ratchets the
//!   difficulty, with a polling-style status interface for hosts.
//!
//! # Example
//!
//! ```rust
//! use runpow::{SearchEngine, SearchRequest};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = SearchEngine::new();
//! engine
//!     .start_search(SearchRequest {
//!         prefix: "my block text ".to_string(),
//!         starting_nonce: 0,
//!         target_difficulty: 1,
//!     })
//!     .unwrap();
//!
//! while engine.poll_status().running {
//!     tokio::task::yield_now().await;
//! }
//!
//! let result = engine.result().unwrap();
//! assert!(result.final_nonce > 0);
//! # }
//! ```

// Re-export the core algorithm
pub use runpow_core as algorithm;

pub mod engine;
pub mod error;

// Convenience re-exports
pub use engine::{SearchEngine, SearchRequest, SearchResult, SearchStatus};
pub use error::EngineError;
