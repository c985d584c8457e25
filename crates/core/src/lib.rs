//! # runpow Core Algorithm
//!
//! Run-length proof-of-work scoring: the difficulty of a message is
//! the length of the longest run of a single repeated hex nibble in
//! its SHA-256 digest. A search appends an incrementing decimal nonce
//! to a fixed text prefix until the digest strictly beats a target
//! run length.
//!
//! ## Input Format
//!
//! Hash inputs are the prefix bytes followed immediately by the
//! canonical decimal rendering of the nonce:
//!
//! ```text
//! input = prefix || decimal(nonce)
//!         ^^^^^^    ^^^^^^^^^^^^^^
//!         any len   no leading zeros, no sign
//! ```
//!
//! Any separator between prefix and nonce is the host's business and
//! belongs inside the prefix.
//!
//! ## Example
//!
//! ```rust
//! use runpow_core::{PrefixDigest, exceeds_difficulty, hash, longest_run};
//!
//! // Single-shot scoring
//! let score = longest_run(&hash(b"block text 42"));
//! assert!(score >= 1);
//!
//! // Incremental digests for a nonce search: the prefix is absorbed
//! // once, each nonce only hashes its short decimal suffix.
//! let prefix = PrefixDigest::new(b"block text ");
//! assert_eq!(prefix.digest_nonce(42), hash(b"block text 42"));
//!
//! if exceeds_difficulty(&prefix.digest_nonce(43), score) {
//!     println!("nonce 43 beats the current difficulty");
//! }
//! ```
//!
//! ## no_std Support
//!
//! This crate supports `no_std` environments:
//!
//! ```toml
//! [dependencies]
//! runpow-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

mod digest;
mod params;
mod score;

pub use digest::{PrefixDigest, encode_decimal, hash};
pub use params::*;
pub use score::{RunSpan, exceeds_difficulty, longest_run, longest_run_span};
