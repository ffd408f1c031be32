use crate::error::{Error, MathError, PoolError};
use crate::math::liquidity_math::add_delta;
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_bitmap::next_initialized_tick_within_one_word;
use crate::math::tick_math::{
    get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio, MAX_TICK, MIN_TICK,
};
use crate::pool::tick::cross;
use crate::pool::{Pool, PoolHost};
use alloy_primitives::{Address, I256, U256};

/// Current price of the pool: the Q64.96 sqrt price and the tick it
/// falls in.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
}

// the top level state of the swap, written back at the end
struct SwapState {
    // input amount still to be consumed
    amount_specified_remaining: U256,
    // output amount produced so far
    amount_calculated: U256,
    // current sqrt(price)
    sqrt_price_x96: U256,
    // the tick associated with the current price
    tick: i32,
    // working liquidity: crossings retune it for pricing, it never
    // feeds back into the pool's stored liquidity
    liquidity: u128,
}

#[derive(Default)]
struct StepComputations {
    // the price at the beginning of the step
    sqrt_price_start_x96: U256,
    // the next tick to swap to from the current tick in the swap direction
    tick_next: i32,
    // whether tick_next is initialized or not
    initialized: bool,
    // sqrt(price) for the next tick (1/0)
    sqrt_price_next_x96: U256,
    // how much is being swapped in in this step
    amount_in: U256,
    // how much is being swapped out
    amount_out: U256,
}

impl Pool {
    /// Swaps `amount_specified` of the input token for the other token,
    /// walking the liquidity curve one initialized tick at a time.
    /// `zero_for_one` sells token0 and moves the price down; otherwise
    /// token1 is sold and the price moves up.
    ///
    /// Returns the signed `(amount0, amount1)` deltas from the pool's
    /// perspective: positive amounts the pool received, negative
    /// amounts it paid to `recipient`. The input is collected through
    /// [`PoolHost::on_swap_deltas`] and verified by balance sampling;
    /// on any failure the pool state is left untouched.
    pub fn swap<H: PoolHost>(
        &mut self,
        host: &mut H,
        recipient: Address,
        zero_for_one: bool,
        amount_specified: U256,
        data: &[u8],
    ) -> Result<(I256, I256), Error> {
        if amount_specified.is_zero() {
            return Ok((I256::ZERO, I256::ZERO));
        }

        log::debug!(
            "swap: recipient={recipient} zero_for_one={zero_for_one} \
             amount_specified={amount_specified}"
        );

        let mut state = SwapState {
            amount_specified_remaining: amount_specified,
            amount_calculated: U256::ZERO,
            sqrt_price_x96: self.slot0.sqrt_price_x96,
            tick: self.slot0.tick,
            liquidity: self.liquidity,
        };

        while !state.amount_specified_remaining.is_zero() {
            let mut step = StepComputations {
                sqrt_price_start_x96: state.sqrt_price_x96,
                ..StepComputations::default()
            };

            (step.tick_next, step.initialized) =
                next_initialized_tick_within_one_word(&self.bitmap, state.tick, zero_for_one)?;

            step.tick_next = step.tick_next.clamp(MIN_TICK, MAX_TICK);
            step.sqrt_price_next_x96 = get_sqrt_ratio_at_tick(step.tick_next)?;

            (state.sqrt_price_x96, step.amount_in, step.amount_out) = compute_swap_step(
                state.sqrt_price_x96,
                step.sqrt_price_next_x96,
                state.liquidity,
                state.amount_specified_remaining,
                zero_for_one,
            )?;

            state.amount_specified_remaining = state
                .amount_specified_remaining
                .checked_sub(step.amount_in)
                .ok_or(MathError::Underflow)?;
            state.amount_calculated += step.amount_out;

            if state.sqrt_price_x96 == step.sqrt_price_next_x96 {
                if step.initialized {
                    let mut liquidity_net = cross(&self.ticks, step.tick_next);
                    if zero_for_one {
                        liquidity_net = -liquidity_net;
                    }
                    state.liquidity = add_delta(state.liquidity, liquidity_net)?;
                    log::trace!(
                        "swap: crossed tick {} net={liquidity_net} liquidity={}",
                        step.tick_next,
                        state.liquidity
                    );
                }
                state.tick = if zero_for_one {
                    step.tick_next - 1
                } else {
                    step.tick_next
                };
            } else if state.sqrt_price_x96 != step.sqrt_price_start_x96 {
                state.tick = get_tick_at_sqrt_ratio(state.sqrt_price_x96)?;
                break;
            } else {
                break;
            }

            if state.liquidity == 0 && !state.amount_specified_remaining.is_zero() {
                return Err(PoolError::NotEnoughLiquidity.into());
            }
        }

        let amount_used = amount_specified - state.amount_specified_remaining;
        let (amount0, amount1) = if zero_for_one {
            (
                I256::from_raw(amount_used),
                -I256::from_raw(state.amount_calculated),
            )
        } else {
            (
                -I256::from_raw(state.amount_calculated),
                I256::from_raw(amount_used),
            )
        };

        let (input_token, input_delta, output_token) = if zero_for_one {
            (self.token0, amount0, self.token1)
        } else {
            (self.token1, amount1, self.token0)
        };

        let balance_before = host.balance(input_token);
        host.pay(output_token, recipient, state.amount_calculated);
        host.on_swap_deltas(amount0, amount1, data);
        if host.balance(input_token) < balance_before.saturating_add(input_delta.into_raw()) {
            return Err(PoolError::InsufficientInputAmount.into());
        }

        if state.tick != self.slot0.tick || state.sqrt_price_x96 != self.slot0.sqrt_price_x96 {
            self.slot0 = Slot0 {
                sqrt_price_x96: state.sqrt_price_x96,
                tick: state.tick,
            };
        }

        log::debug!(
            "swap: amount0={amount0} amount1={amount1} sqrt_price_x96={} tick={}",
            self.slot0.sqrt_price_x96,
            self.slot0.tick
        );

        Ok((amount0, amount1))
    }
}
