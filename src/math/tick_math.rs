use crate::error::StateError;
use alloy_primitives::{uint, I256, U256};

/// Lowest tick representable with a Q64.96 sqrt price in 160 bits.
pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = -MIN_TICK;

/// `get_sqrt_ratio_at_tick(MIN_TICK)`.
pub const MIN_SQRT_RATIO: U256 = uint!(4295128739_U256);
/// `get_sqrt_ratio_at_tick(MAX_TICK)`. Valid sqrt prices are below it.
pub const MAX_SQRT_RATIO: U256 =
    uint!(1461446703485210103287273052203988822378723970342_U256);

/// `2^64 / log2(sqrt(1.0001))`, Q64 fixed point.
const SQRT_10001: I256 = I256::from_raw(uint!(255738958999603826347141_U256));
const TICK_LOW_CORRECTION: I256 =
    I256::from_raw(uint!(3402992956809132418596140100660247210_U256));
const TICK_HIGH_CORRECTION: I256 =
    I256::from_raw(uint!(291339464771989622907027621153398088495_U256));

/// Q128.128 multipliers for `sqrt(1.0001)^(-2^k)`, one per bit of the
/// tick magnitude.
const TICK_MULTIPLIERS: [(u32, U256); 19] = [
    (0x2, uint!(0xfff97272373d413259a46990580e213a_U256)),
    (0x4, uint!(0xfff2e50f5f656932ef12357cf3c7fdcc_U256)),
    (0x8, uint!(0xffe5caca7e10e4e61c3624eaa0941cd0_U256)),
    (0x10, uint!(0xffcb9843d60f6159c9db58835c926644_U256)),
    (0x20, uint!(0xff973b41fa98c081472e6896dfb254c0_U256)),
    (0x40, uint!(0xff2ea16466c96a3843ec78b326b52861_U256)),
    (0x80, uint!(0xfe5dee046a99a2a811c461f1969c3053_U256)),
    (0x100, uint!(0xfcbe86c7900a88aedcffc83b479aa3a4_U256)),
    (0x200, uint!(0xf987a7253ac413176f2b074cf7815e54_U256)),
    (0x400, uint!(0xf3392b0822b70005940c7a398e4b70f3_U256)),
    (0x800, uint!(0xe7159475a2c29b7443b29c7fa6e889d9_U256)),
    (0x1000, uint!(0xd097f3bdfd2022b8845ad8f792aa5825_U256)),
    (0x2000, uint!(0xa9f746462d870fdf8a65dc1f90e061e5_U256)),
    (0x4000, uint!(0x70d869a156d2a1b890bb3df62baf32f7_U256)),
    (0x8000, uint!(0x31be135f97d08fd981231505542fcfa6_U256)),
    (0x10000, uint!(0x9aa508b5b7a84e1c677de54f3e99bc9_U256)),
    (0x20000, uint!(0x5d6af8dedb81196699c329225ee604_U256)),
    (0x40000, uint!(0x2216e584f5fa1ea926041bedfe98_U256)),
    (0x80000, uint!(0x48a170391f7dc42444e8fa2_U256)),
];

/// Returns the Q64.96 sqrt price at a tick index, the least `r` such
/// that [`get_tick_at_sqrt_ratio`]`(r) == tick`.
///
/// The magnitude is assembled as a product of precomputed Q128.128
/// factors selected by the bits of `|tick|`, inverted for positive
/// ticks, then narrowed to Q64.96 rounding up on a non-zero remainder.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, StateError> {
    let abs_tick = tick.unsigned_abs();

    if abs_tick > MAX_TICK as u32 {
        return Err(StateError::TickOutOfRange);
    }

    let mut ratio = if abs_tick & 1 != 0 {
        uint!(0xfffcb933bd6fad37aa2d162d1a594001_U256)
    } else {
        uint!(0x100000000000000000000000000000000_U256)
    };

    for (bit, multiplier) in TICK_MULTIPLIERS {
        if abs_tick & bit != 0 {
            ratio = ratio.wrapping_mul(multiplier) >> 128;
        }
    }

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    let truncated = !(ratio & uint!(0xffffffff_U256)).is_zero();
    Ok((ratio >> 32) + U256::from(truncated as u8))
}

/// Returns the greatest tick whose sqrt ratio is at most
/// `sqrt_price_x96`. Inverse of [`get_sqrt_ratio_at_tick`] on
/// `[MIN_SQRT_RATIO, MAX_SQRT_RATIO)`.
///
/// Computes `log2(sqrt_price)` to 14 fractional bits, rescales into
/// tick space, and disambiguates the two candidate ticks with one
/// forward evaluation.
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, StateError> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(StateError::SqrtPriceOutOfRange);
    }

    let ratio: U256 = sqrt_price_x96 << 32;
    let msb = (255 - ratio.leading_zeros()) as usize;

    // normalize into [2^127, 2^128)
    let mut r = if msb >= 128 {
        ratio >> (msb - 127)
    } else {
        ratio << (127 - msb)
    };

    let mut log_2: I256 = (I256::from_raw(U256::from(msb)) - I256::from_raw(U256::from(128u8))) << 64;

    for shift in (50usize..=63).rev() {
        r = r.wrapping_mul(r) >> 127;
        let f: U256 = r >> 128; // 0 or 1
        log_2 = log_2 | I256::from_raw(f << shift);
        r >>= f.as_limbs()[0] as usize;
    }

    let log_sqrt10001: I256 = log_2.wrapping_mul(SQRT_10001);
    let tick_low_shifted: I256 = (log_sqrt10001 - TICK_LOW_CORRECTION) >> 128;
    let tick_low = tick_low_shifted.into_raw().as_limbs()[0] as i32;
    let tick_high_shifted: I256 = (log_sqrt10001 + TICK_HIGH_CORRECTION) >> 128;
    let tick_high = tick_high_shifted.into_raw().as_limbs()[0] as i32;

    Ok(if tick_low == tick_high {
        tick_low
    } else if get_sqrt_ratio_at_tick(tick_high)? <= sqrt_price_x96 {
        tick_high
    } else {
        tick_low
    })
}
