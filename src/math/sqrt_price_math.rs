use crate::math::math_helpers::{div_rounding_up, mul_div, mul_div_rounding_up};
use crate::{
    error::{Error, MathError, StateError},
    Q96, RESOLUTION, U160_MAX,
};
use alloy_primitives::{I256, U256};

/// Amount of token0 spanned by `liquidity` between two sqrt prices:
/// `L * 2^96 * (B - A) / (A * B)`, with the caller choosing the
/// rounding direction.
pub fn get_amount_0_delta_unsigned(
    mut sqrt_ratio_a_x96: U256,
    mut sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, Error> {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96) = (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    };

    if sqrt_ratio_a_x96.is_zero() {
        return Err(StateError::SqrtRatioIsZero.into());
    }

    let numerator1 = U256::from(liquidity) << RESOLUTION;
    let numerator2 = sqrt_ratio_b_x96 - sqrt_ratio_a_x96;

    if round_up {
        Ok(div_rounding_up(
            mul_div_rounding_up(numerator1, numerator2, sqrt_ratio_b_x96)?,
            sqrt_ratio_a_x96,
        ))
    } else {
        Ok(mul_div(numerator1, numerator2, sqrt_ratio_b_x96)? / sqrt_ratio_a_x96)
    }
}

/// Amount of token1 spanned by `liquidity` between two sqrt prices:
/// `L * (B - A) / 2^96`, with the caller choosing the rounding
/// direction.
pub fn get_amount_1_delta_unsigned(
    mut sqrt_ratio_a_x96: U256,
    mut sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, MathError> {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96) = (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    };
    let liquidity = U256::from(liquidity);

    if round_up {
        mul_div_rounding_up(liquidity, sqrt_ratio_b_x96 - sqrt_ratio_a_x96, Q96)
    } else {
        mul_div(liquidity, sqrt_ratio_b_x96 - sqrt_ratio_a_x96, Q96)
    }
}

/// Signed token0 delta for a signed liquidity change. Positive
/// liquidity is owed by the caller and rounds up; negative liquidity is
/// owed to the caller and rounds down.
pub fn get_amount_0_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: i128,
) -> Result<I256, Error> {
    if liquidity < 0 {
        Ok(-I256::from_raw(get_amount_0_delta_unsigned(
            sqrt_ratio_a_x96,
            sqrt_ratio_b_x96,
            liquidity.unsigned_abs(),
            false,
        )?))
    } else {
        Ok(I256::from_raw(get_amount_0_delta_unsigned(
            sqrt_ratio_a_x96,
            sqrt_ratio_b_x96,
            liquidity as u128,
            true,
        )?))
    }
}

/// Signed token1 delta for a signed liquidity change, with the same
/// rounding convention as [`get_amount_0_delta`].
pub fn get_amount_1_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: i128,
) -> Result<I256, Error> {
    if liquidity < 0 {
        Ok(-I256::from_raw(get_amount_1_delta_unsigned(
            sqrt_ratio_a_x96,
            sqrt_ratio_b_x96,
            liquidity.unsigned_abs(),
            false,
        )?))
    } else {
        Ok(I256::from_raw(get_amount_1_delta_unsigned(
            sqrt_ratio_a_x96,
            sqrt_ratio_b_x96,
            liquidity as u128,
            true,
        )?))
    }
}

/// Price after consuming `amount` of token0, rounded up so the pool
/// never undercharges: `ceil(L * Q96 * sqrtP / (L * Q96 + amount * sqrtP))`.
fn next_sqrt_price_from_amount_0_rounding_up(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount: U256,
) -> Result<U256, Error> {
    if amount.is_zero() {
        return Ok(sqrt_p_x96);
    }

    let numerator = U256::from(liquidity) << RESOLUTION;

    let (product, overflowed) = amount.overflowing_mul(sqrt_p_x96);
    if !overflowed {
        if let Some(denominator) = numerator.checked_add(product) {
            return mul_div_rounding_up(numerator, sqrt_p_x96, denominator).map_err(Error::from);
        }
    }

    // denominator does not fit in 256 bits; divide through by sqrtP first
    Ok(div_rounding_up(
        numerator,
        (numerator / sqrt_p_x96) + amount,
    ))
}

/// Price after consuming `amount` of token1, rounded down:
/// `sqrtP + floor(amount * Q96 / L)`.
fn next_sqrt_price_from_amount_1_rounding_down(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount: U256,
) -> Result<U256, Error> {
    let liquidity = U256::from(liquidity);

    let quotient = if amount <= U160_MAX {
        (amount << RESOLUTION) / liquidity
    } else {
        mul_div(amount, Q96, liquidity)?
    };

    let result = sqrt_p_x96
        .checked_add(quotient)
        .ok_or(MathError::Overflow)?;
    if result <= U160_MAX {
        Ok(result)
    } else {
        Err(MathError::Overflow.into())
    }
}

/// Price reached by swapping `amount_in` into the pool, choosing the
/// token0 or token1 branch by direction.
pub fn get_next_sqrt_price_from_input(
    sqrt_p_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, Error> {
    if sqrt_p_x96.is_zero() {
        return Err(StateError::SqrtPriceIsZero.into());
    }
    if liquidity == 0 {
        return Err(StateError::LiquidityIsZero.into());
    }

    if zero_for_one {
        next_sqrt_price_from_amount_0_rounding_up(sqrt_p_x96, liquidity, amount_in)
    } else {
        next_sqrt_price_from_amount_1_rounding_down(sqrt_p_x96, liquidity, amount_in)
    }
}
