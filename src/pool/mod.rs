pub mod position;
pub mod swap;
pub mod tick;

use crate::error::{Error, PoolError};
use crate::math::liquidity_math::add_delta;
use crate::math::sqrt_price_math::{get_amount_0_delta, get_amount_1_delta};
use crate::math::tick_bitmap::{flip_tick, word_at};
use crate::math::tick_math::{get_sqrt_ratio_at_tick, MAX_TICK, MIN_TICK};
use crate::pool::position::{position_key, Position};
use crate::pool::swap::Slot0;
use crate::pool::tick::TickInfo;
use crate::FastMap;
use alloy_primitives::{Address, B256, I256, U256};

/// Capabilities the pool requires from its surroundings: a view of its
/// own token balances, an outbound transfer, and the two operation
/// callbacks through which callers deliver owed funds.
///
/// The pool samples balances before and after each callback and
/// rejects the operation when the owed amounts did not arrive. A
/// callback cannot re-enter the pool: both the pool and the host are
/// held by `&mut` for the whole operation.
pub trait PoolHost {
    /// The pool's current balance of `token`.
    fn balance(&self, token: Address) -> U256;

    /// Transfers `amount` of `token` out of the pool to `to`.
    fn pay(&mut self, token: Address, to: Address, amount: U256);

    /// Asks the caller to deliver the owed deposit for a mint.
    fn on_mint_owed(&mut self, amount0_owed: U256, amount1_owed: U256, data: &[u8]);

    /// Hands the caller the signed swap deltas; positive amounts are
    /// owed to the pool, negative amounts were already paid out.
    fn on_swap_deltas(&mut self, amount0_delta: I256, amount1_delta: I256, data: &[u8]);
}

/// A two-asset concentrated-liquidity pool: tick-indexed liquidity
/// book, initialized-tick bitmap, position book and the current price
/// in `slot0`.
#[derive(Debug)]
pub struct Pool {
    pub token0: Address,
    pub token1: Address,
    pub(crate) slot0: Slot0,
    pub(crate) liquidity: u128,
    pub(crate) ticks: FastMap<i32, TickInfo>,
    pub(crate) bitmap: FastMap<i16, U256>,
    pub(crate) positions: FastMap<B256, Position>,
}

impl Pool {
    /// Creates a pool at the given starting price. The `sqrt_price_x96`
    /// / `tick` pair is taken as given and not cross-checked; callers
    /// must supply a consistent pair.
    pub fn new(token0: Address, token1: Address, sqrt_price_x96: U256, tick: i32) -> Self {
        Self {
            token0,
            token1,
            slot0: Slot0 {
                sqrt_price_x96,
                tick,
            },
            liquidity: 0,
            ticks: FastMap::default(),
            bitmap: FastMap::default(),
            positions: FastMap::default(),
        }
    }

    pub fn slot0(&self) -> Slot0 {
        self.slot0
    }

    /// Liquidity active at the current tick.
    pub fn liquidity(&self) -> u128 {
        self.liquidity
    }

    /// Liquidity held by the position with the given key, zero when the
    /// position does not exist.
    pub fn position(&self, key: B256) -> u128 {
        self.position_info(key).liquidity
    }

    /// Book entry for a tick; an empty entry when it was never
    /// initialized.
    pub fn tick(&self, tick: i32) -> TickInfo {
        self.ticks.get(&tick).copied().unwrap_or_default()
    }

    /// Raw bitmap word, for observation and testing.
    pub fn tick_bitmap(&self, word_pos: i16) -> U256 {
        word_at(&self.bitmap, word_pos)
    }

    /// Deposits `amount` liquidity into `[lower_tick, upper_tick)` for
    /// `owner`, pulling the owed token amounts through
    /// [`PoolHost::on_mint_owed`]. Returns the owed amounts.
    ///
    /// Every mutation is staged first and committed only after the
    /// post-callback balance check passes, so a failing mint leaves the
    /// pool untouched.
    pub fn mint<H: PoolHost>(
        &mut self,
        host: &mut H,
        owner: Address,
        lower_tick: i32,
        upper_tick: i32,
        amount: u128,
        data: &[u8],
    ) -> Result<(U256, U256), Error> {
        if lower_tick >= upper_tick || lower_tick < MIN_TICK || upper_tick > MAX_TICK {
            return Err(PoolError::InvalidTickRange.into());
        }
        if amount == 0 {
            return Err(PoolError::ZeroLiquidity.into());
        }
        let liquidity_delta =
            i128::try_from(amount).map_err(|_| PoolError::LiquidityOverflow)?;

        let (lower_entry, lower_flipped) = self.tick(lower_tick).apply(liquidity_delta, false)?;
        let (upper_entry, upper_flipped) = self.tick(upper_tick).apply(liquidity_delta, true)?;

        let key = position_key(owner, lower_tick, upper_tick);
        let position = self.position_info(key).apply(liquidity_delta)?;

        let (amount0, amount1) =
            self.amounts_for_liquidity(lower_tick, upper_tick, liquidity_delta)?;
        let owed0 = amount0.into_raw();
        let owed1 = amount1.into_raw();

        let liquidity_after = if (lower_tick..upper_tick).contains(&self.slot0.tick) {
            add_delta(self.liquidity, liquidity_delta)?
        } else {
            self.liquidity
        };

        log::debug!(
            "mint: owner={owner} range=[{lower_tick}, {upper_tick}) liquidity={amount} \
             owed0={owed0} owed1={owed1}"
        );

        let balance0_before = host.balance(self.token0);
        let balance1_before = host.balance(self.token1);
        host.on_mint_owed(owed0, owed1, data);
        if host.balance(self.token0) < balance0_before.saturating_add(owed0)
            || host.balance(self.token1) < balance1_before.saturating_add(owed1)
        {
            return Err(PoolError::InsufficientInputAmount.into());
        }

        self.ticks.insert(lower_tick, lower_entry);
        self.ticks.insert(upper_tick, upper_entry);
        if lower_flipped {
            flip_tick(&mut self.bitmap, lower_tick);
        }
        if upper_flipped {
            flip_tick(&mut self.bitmap, upper_tick);
        }
        self.positions.insert(key, position);
        self.liquidity = liquidity_after;

        Ok((owed0, owed1))
    }

    /// Withdraws `amount` liquidity from `owner`'s position over
    /// `[lower_tick, upper_tick)` and pays the freed token amounts,
    /// rounded down, to `owner`. Tick entries whose gross liquidity
    /// reaches zero are removed and their bitmap bits cleared.
    pub fn burn<H: PoolHost>(
        &mut self,
        host: &mut H,
        owner: Address,
        lower_tick: i32,
        upper_tick: i32,
        amount: u128,
    ) -> Result<(U256, U256), Error> {
        if lower_tick >= upper_tick || lower_tick < MIN_TICK || upper_tick > MAX_TICK {
            return Err(PoolError::InvalidTickRange.into());
        }
        if amount == 0 {
            return Err(PoolError::ZeroLiquidity.into());
        }
        let liquidity_delta = i128::try_from(amount)
            .map(|delta| -delta)
            .map_err(|_| PoolError::LiquidityUnderflow)?;

        let (lower_entry, lower_flipped) = self.tick(lower_tick).apply(liquidity_delta, false)?;
        let (upper_entry, upper_flipped) = self.tick(upper_tick).apply(liquidity_delta, true)?;

        let key = position_key(owner, lower_tick, upper_tick);
        let position = self.position_info(key).apply(liquidity_delta)?;

        let (amount0, amount1) =
            self.amounts_for_liquidity(lower_tick, upper_tick, liquidity_delta)?;
        let freed0 = (-amount0).into_raw();
        let freed1 = (-amount1).into_raw();

        let liquidity_after = if (lower_tick..upper_tick).contains(&self.slot0.tick) {
            add_delta(self.liquidity, liquidity_delta)?
        } else {
            self.liquidity
        };

        log::debug!(
            "burn: owner={owner} range=[{lower_tick}, {upper_tick}) liquidity={amount} \
             freed0={freed0} freed1={freed1}"
        );

        if lower_entry.initialized {
            self.ticks.insert(lower_tick, lower_entry);
        } else {
            self.ticks.remove(&lower_tick);
        }
        if upper_entry.initialized {
            self.ticks.insert(upper_tick, upper_entry);
        } else {
            self.ticks.remove(&upper_tick);
        }
        if lower_flipped {
            flip_tick(&mut self.bitmap, lower_tick);
        }
        if upper_flipped {
            flip_tick(&mut self.bitmap, upper_tick);
        }
        self.positions.insert(key, position);
        self.liquidity = liquidity_after;

        if !freed0.is_zero() {
            host.pay(self.token0, owner, freed0);
        }
        if !freed1.is_zero() {
            host.pay(self.token1, owner, freed1);
        }

        Ok((freed0, freed1))
    }

    fn position_info(&self, key: B256) -> Position {
        self.positions.get(&key).copied().unwrap_or_default()
    }

    /// Signed token amounts corresponding to a liquidity change over a
    /// range, split on where the current tick sits relative to it.
    fn amounts_for_liquidity(
        &self,
        lower_tick: i32,
        upper_tick: i32,
        liquidity_delta: i128,
    ) -> Result<(I256, I256), Error> {
        let sqrt_ratio_lower = get_sqrt_ratio_at_tick(lower_tick)?;
        let sqrt_ratio_upper = get_sqrt_ratio_at_tick(upper_tick)?;

        if self.slot0.tick < lower_tick {
            Ok((
                get_amount_0_delta(sqrt_ratio_lower, sqrt_ratio_upper, liquidity_delta)?,
                I256::ZERO,
            ))
        } else if self.slot0.tick < upper_tick {
            Ok((
                get_amount_0_delta(self.slot0.sqrt_price_x96, sqrt_ratio_upper, liquidity_delta)?,
                get_amount_1_delta(sqrt_ratio_lower, self.slot0.sqrt_price_x96, liquidity_delta)?,
            ))
        } else {
            Ok((
                I256::ZERO,
                get_amount_1_delta(sqrt_ratio_lower, sqrt_ratio_upper, liquidity_delta)?,
            ))
        }
    }
}
