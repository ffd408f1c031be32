use crate::error::Error;
use crate::math::sqrt_price_math::{
    get_amount_0_delta_unsigned, get_amount_1_delta_unsigned, get_next_sqrt_price_from_input,
};
use alloy_primitives::U256;

/// Advances the price by one step of a swap, from `sqrt_price_x96`
/// toward `sqrt_price_target_x96`, consuming at most
/// `amount_remaining` of the input token against `liquidity`.
///
/// Returns `(sqrt_price_next_x96, amount_in, amount_out)`. The step
/// ends at the target when the remaining input covers the whole
/// distance, otherwise at the price that consumes the input exactly.
/// Both amounts round up.
pub fn compute_swap_step(
    sqrt_price_x96: U256,
    sqrt_price_target_x96: U256,
    liquidity: u128,
    amount_remaining: U256,
    zero_for_one: bool,
) -> Result<(U256, U256, U256), Error> {
    let mut amount_in = if zero_for_one {
        get_amount_0_delta_unsigned(sqrt_price_target_x96, sqrt_price_x96, liquidity, true)?
    } else {
        get_amount_1_delta_unsigned(sqrt_price_x96, sqrt_price_target_x96, liquidity, true)?
    };

    let sqrt_price_next_x96 = if amount_remaining >= amount_in {
        sqrt_price_target_x96
    } else {
        let next = get_next_sqrt_price_from_input(
            sqrt_price_x96,
            liquidity,
            amount_remaining,
            zero_for_one,
        )?;
        amount_in = if zero_for_one {
            get_amount_0_delta_unsigned(next, sqrt_price_x96, liquidity, true)?
        } else {
            get_amount_1_delta_unsigned(sqrt_price_x96, next, liquidity, true)?
        };
        next
    };

    let amount_out = if zero_for_one {
        get_amount_1_delta_unsigned(sqrt_price_next_x96, sqrt_price_x96, liquidity, true)?
    } else {
        get_amount_0_delta_unsigned(sqrt_price_x96, sqrt_price_next_x96, liquidity, true)?
    };

    Ok((sqrt_price_next_x96, amount_in, amount_out))
}
