use crate::error::MathError;
use crate::math::bit_math::{least_significant_bit, most_significant_bit};
use crate::math::tick_math::{MAX_TICK, MIN_TICK};
use crate::FastMap;
use alloy_primitives::U256;

/// Bitmap coordinates of a tick: the 256-bit word it lives in and its
/// bit within that word.
pub fn position(tick: i32) -> (i16, u8) {
    ((tick >> 8) as i16, tick.rem_euclid(256) as u8)
}

/// The bitmap word stored at `word_pos`, zero when absent.
pub fn word_at(bitmap: &FastMap<i16, U256>, word_pos: i16) -> U256 {
    bitmap.get(&word_pos).copied().unwrap_or_default()
}

/// Toggles the initialized bit of `tick`. Callers only flip ticks that
/// changed between zero and non-zero gross liquidity.
pub fn flip_tick(bitmap: &mut FastMap<i16, U256>, tick: i32) {
    debug_assert!(
        (MIN_TICK..=MAX_TICK).contains(&tick),
        "tick outside the addressable range"
    );

    let (word_pos, bit_pos) = position(tick);
    let mask = U256::ONE << bit_pos;
    let word = bitmap.entry(word_pos).or_default();
    *word ^= mask;
}

/// Finds the next initialized tick no further than one bitmap word
/// away. With `lte` the scan runs downward starting at `tick` itself,
/// otherwise upward starting just above it.
///
/// When the word holds no initialized tick in the scan direction the
/// word's boundary tick is returned with `false`, which caps the work
/// a single swap step can do.
pub fn next_initialized_tick_within_one_word(
    bitmap: &FastMap<i16, U256>,
    tick: i32,
    lte: bool,
) -> Result<(i32, bool), MathError> {
    if lte {
        let (word_pos, bit_pos) = position(tick);

        // bits at or below bit_pos
        let mask = (U256::ONE << bit_pos) - U256::ONE + (U256::ONE << bit_pos);
        let masked = word_at(bitmap, word_pos) & mask;

        let initialized = !masked.is_zero();
        let next = if initialized {
            tick - (bit_pos - most_significant_bit(masked)?) as i32
        } else {
            tick - bit_pos as i32
        };
        Ok((next, initialized))
    } else {
        let (word_pos, bit_pos) = position(tick + 1);

        // bits at or above bit_pos
        let mask = !((U256::ONE << bit_pos) - U256::ONE);
        let masked = word_at(bitmap, word_pos) & mask;

        let initialized = !masked.is_zero();
        let next = if initialized {
            tick + 1 + (least_significant_bit(masked)? - bit_pos) as i32
        } else {
            tick + 1 + (255 - bit_pos) as i32
        };
        Ok((next, initialized))
    }
}
