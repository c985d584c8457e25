//! SHA-256 digests over `prefix ∥ decimal(nonce)` inputs.
//!
//! The search loop hashes a large constant prefix followed by a short
//! varying decimal suffix. [`PrefixDigest`] absorbs the prefix once
//! and clones the saved compression state per nonce, so each
//! iteration only pays for the suffix. The output is byte-identical
//! to one-shot hashing of the concatenated input.

use sha2::{Digest, Sha256};

use crate::params::{DECIMAL_MAX_DIGITS, DIGEST_SIZE};

/// One-shot SHA-256 of `input`.
#[inline]
pub fn hash(input: &[u8]) -> [u8; DIGEST_SIZE] {
    Sha256::digest(input).into()
}

/// SHA-256 state pre-absorbed with a fixed prefix.
///
/// Reuse one instance for a whole nonce search; constructing it is
/// the only place the prefix is hashed.
#[derive(Clone)]
pub struct PrefixDigest {
    state: Sha256,
}

impl PrefixDigest {
    /// Absorb `prefix` into a fresh SHA-256 state.
    pub fn new(prefix: &[u8]) -> Self {
        let mut state = Sha256::new();
        state.update(prefix);
        Self { state }
    }

    /// Digest of `prefix ∥ decimal(nonce)` without re-absorbing the
    /// prefix.
    #[inline]
    pub fn digest_nonce(&self, nonce: u64) -> [u8; DIGEST_SIZE] {
        let mut buf = [0u8; DECIMAL_MAX_DIGITS];
        let mut state = self.state.clone();
        state.update(encode_decimal(nonce, &mut buf));
        state.finalize().into()
    }
}

/// Canonical decimal rendering of `nonce` into `buf`.
///
/// Returns the used tail of `buf`: no leading zeros, no sign, zero
/// renders as `"0"`. Canonical form keeps hash inputs reproducible
/// bit-for-bit across implementations.
pub fn encode_decimal(nonce: u64, buf: &mut [u8; DECIMAL_MAX_DIGITS]) -> &[u8] {
    if nonce == 0 {
        buf[DECIMAL_MAX_DIGITS - 1] = b'0';
        return &buf[DECIMAL_MAX_DIGITS - 1..];
    }

    let mut rest = nonce;
    let mut start = DECIMAL_MAX_DIGITS;
    while rest > 0 {
        start -= 1;
        buf[start] = b'0' + (rest % 10) as u8;
        rest /= 10;
    }

    &buf[start..]
}
