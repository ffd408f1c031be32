use crate::error::{Error, MathError, PoolError};
use crate::math::liquidity_math::add_delta;
use crate::math::tick_math::{MAX_TICK, MIN_TICK};
use crate::FastMap;

/// Hard cap on the gross liquidity any single tick may reference, so
/// the sum over every addressable tick cannot overflow a u128.
pub const MAX_LIQUIDITY_PER_TICK: u128 =
    u128::MAX / ((MAX_TICK - MIN_TICK + 1) as u128);

/// Book entry for one tick: how much liquidity references it and the
/// net change in active liquidity when the price crosses it upward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickInfo {
    pub initialized: bool,
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
}

impl TickInfo {
    /// Computes the entry after applying `liquidity_delta` as the lower
    /// or upper endpoint of a position, plus whether the initialized
    /// state flipped.
    ///
    /// Does not mutate: callers stage the result and commit it only
    /// once the whole operation has validated.
    pub fn apply(&self, liquidity_delta: i128, upper: bool) -> Result<(TickInfo, bool), Error> {
        let gross_before = self.liquidity_gross;
        let gross_after = add_delta(gross_before, liquidity_delta).map_err(|e| match e {
            MathError::Underflow => Error::from(PoolError::LiquidityUnderflow),
            other => Error::from(other),
        })?;

        if gross_after > MAX_LIQUIDITY_PER_TICK {
            return Err(PoolError::LiquidityOverflow.into());
        }

        let liquidity_net = if upper {
            self.liquidity_net.checked_sub(liquidity_delta)
        } else {
            self.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or(MathError::Overflow)?;

        let flipped = (gross_after == 0) != (gross_before == 0);

        Ok((
            TickInfo {
                initialized: gross_after > 0,
                liquidity_gross: gross_after,
                liquidity_net,
            },
            flipped,
        ))
    }
}

/// Net liquidity change stored at `tick`, consumed by the swap loop
/// when the price crosses it. Zero for ticks that were never touched.
pub fn cross(ticks: &FastMap<i32, TickInfo>, tick: i32) -> i128 {
    ticks.get(&tick).map(|info| info.liquidity_net).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_liquidity_initializes_and_flips() {
        let (entry, flipped) = TickInfo::default().apply(500, false).unwrap();
        assert!(flipped);
        assert_eq!(
            entry,
            TickInfo {
                initialized: true,
                liquidity_gross: 500,
                liquidity_net: 500,
            }
        );
    }

    #[test]
    fn upper_endpoint_negates_the_net() {
        let (entry, flipped) = TickInfo::default().apply(500, true).unwrap();
        assert!(flipped);
        assert_eq!(entry.liquidity_gross, 500);
        assert_eq!(entry.liquidity_net, -500);
    }

    #[test]
    fn second_position_does_not_flip() {
        let (entry, _) = TickInfo::default().apply(500, false).unwrap();
        let (entry, flipped) = entry.apply(300, true).unwrap();
        assert!(!flipped);
        assert_eq!(entry.liquidity_gross, 800);
        assert_eq!(entry.liquidity_net, 200);
    }

    #[test]
    fn removing_all_liquidity_flips_back() {
        let (entry, _) = TickInfo::default().apply(500, false).unwrap();
        let (entry, flipped) = entry.apply(-500, false).unwrap();
        assert!(flipped);
        assert!(!entry.initialized);
        assert_eq!(entry.liquidity_gross, 0);
        assert_eq!(entry.liquidity_net, 0);
    }

    #[test]
    fn gross_liquidity_is_capped() {
        let near_cap = TickInfo {
            initialized: true,
            liquidity_gross: MAX_LIQUIDITY_PER_TICK,
            liquidity_net: 0,
        };
        let result = near_cap.apply(1, false);
        assert!(matches!(
            result,
            Err(Error::PoolError(PoolError::LiquidityOverflow))
        ));
    }

    #[test]
    fn removing_more_than_gross_underflows() {
        let (entry, _) = TickInfo::default().apply(500, false).unwrap();
        let result = entry.apply(-501, false);
        assert!(matches!(
            result,
            Err(Error::PoolError(PoolError::LiquidityUnderflow))
        ));
    }

    #[test]
    fn cross_returns_zero_for_unknown_ticks() {
        let ticks: FastMap<i32, TickInfo> = FastMap::default();
        assert_eq!(cross(&ticks, 42), 0);
    }

    #[test]
    fn cross_returns_the_stored_net() {
        let mut ticks: FastMap<i32, TickInfo> = FastMap::default();
        let (entry, _) = TickInfo::default().apply(700, true).unwrap();
        ticks.insert(86129, entry);
        assert_eq!(cross(&ticks, 86129), -700);
    }
}
