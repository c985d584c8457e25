//! Longest-run scoring over digest nibbles.
//!
//! The difficulty of a digest is the length of its longest run of a
//! single repeated nibble. Granularity is nibble-level throughout:
//! each byte contributes two symbols, high nibble first, which makes
//! the score identical to scanning the lowercase hex rendering of the
//! digest character by character. Byte-level and nibble-level scores
//! differ and must never be mixed within one deployment; this crate
//! only implements the nibble variant.

/// Position and symbol of a maximal run, for display highlighting.
///
/// `start` is a nibble index (hex-character index in the rendered
/// digest), not a byte index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSpan {
    /// The repeated nibble value, in `0..=0xF`
    pub symbol: u8,
    /// Nibble index where the run begins
    pub start: usize,
    /// Run length in nibbles
    pub len: u32,
}

/// Length of the longest run of a single repeated nibble in `digest`.
///
/// Single linear scan; the first symbol always starts a run of
/// length 1, and an empty digest scores 0. The result is in
/// `[0, 2 * digest.len()]`.
#[inline]
pub fn longest_run(digest: &[u8]) -> u32 {
    let mut current_symbol = 0u8;
    let mut current_len = 0u32;
    let mut max_len = 0u32;

    for &byte in digest {
        for symbol in [byte >> 4, byte & 0x0F] {
            if current_len > 0 && symbol == current_symbol {
                current_len += 1;
            } else {
                current_symbol = symbol;
                current_len = 1;
            }
            if current_len > max_len {
                max_len = current_len;
            }
        }
    }

    max_len
}

/// The first maximal run in `digest`, or `None` for empty input.
///
/// Same recurrence as [`longest_run`], additionally tracking where
/// the winning run begins. Later runs of equal length do not displace
/// an earlier winner.
pub fn longest_run_span(digest: &[u8]) -> Option<RunSpan> {
    let mut current_symbol = 0u8;
    let mut current_len = 0u32;
    let mut best: Option<RunSpan> = None;

    for (index, symbol) in nibbles(digest) {
        if current_len > 0 && symbol == current_symbol {
            current_len += 1;
        } else {
            current_symbol = symbol;
            current_len = 1;
        }

        if best.map_or(true, |span| current_len > span.len) {
            best = Some(RunSpan {
                symbol: current_symbol,
                start: index + 1 - current_len as usize,
                len: current_len,
            });
        }
    }

    best
}

/// Check whether a digest strictly beats the required difficulty.
///
/// The search contract is strict: a digest whose longest run merely
/// equals the target does not qualify.
#[inline]
pub fn exceeds_difficulty(digest: &[u8], difficulty: u32) -> bool {
    longest_run(digest) > difficulty
}

/// Iterate the nibbles of `digest` with their nibble indices,
/// high nibble of each byte first.
fn nibbles(digest: &[u8]) -> impl Iterator<Item = (usize, u8)> + '_ {
    digest
        .iter()
        .flat_map(|&byte| [byte >> 4, byte & 0x0F])
        .enumerate()
}
