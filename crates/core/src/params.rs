//! Algorithm parameters for run-length proof-of-work scoring.
//!
//! Scoring is fixed at nibble granularity: one hex character of the
//! rendered digest is one 4-bit symbol.

/// SHA-256 digest size in bytes
pub const DIGEST_SIZE: usize = 32;

/// Nibbles (4-bit symbols) per digest, two per byte
pub const DIGEST_NIBBLES: usize = DIGEST_SIZE * 2;

/// Maximum attainable run-length score for a full digest
pub const MAX_SCORE: u32 = DIGEST_NIBBLES as u32;

/// Width of a canonical decimal u64 rendering
/// (u64::MAX is 18446744073709551615, 20 digits)
pub const DECIMAL_MAX_DIGITS: usize = 20;
