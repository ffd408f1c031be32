use crate::error::{Error, MathError};
use crate::math::math_helpers::mul_div;
use crate::Q96;
use alloy_primitives::U256;

/// Applies a signed liquidity delta to an unsigned total with explicit
/// overflow and underflow failures.
pub fn add_delta(x: u128, y: i128) -> Result<u128, MathError> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs())
            .ok_or(MathError::Underflow)
    } else {
        x.checked_add(y as u128).ok_or(MathError::Overflow)
    }
}

/// Liquidity obtainable from `amount0` of token0 over the price range
/// `[A, B]`: `floor(amount0 * floor(A * B / Q96) / (B - A))`.
///
/// The two-stage flooring is load-bearing: the pool's reported amounts
/// are sensitive to the low digits of the liquidity figure.
pub fn liquidity_for_amount0(
    mut sqrt_ratio_a_x96: U256,
    mut sqrt_ratio_b_x96: U256,
    amount0: U256,
) -> Result<u128, Error> {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96) = (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    };

    let intermediate = mul_div(sqrt_ratio_a_x96, sqrt_ratio_b_x96, Q96)?;
    let liquidity = mul_div(amount0, intermediate, sqrt_ratio_b_x96 - sqrt_ratio_a_x96)?;
    u128::try_from(liquidity).map_err(|_| MathError::Overflow.into())
}

/// Liquidity obtainable from `amount1` of token1 over `[A, B]`:
/// `floor(amount1 * Q96 / (B - A))`.
pub fn liquidity_for_amount1(
    mut sqrt_ratio_a_x96: U256,
    mut sqrt_ratio_b_x96: U256,
    amount1: U256,
) -> Result<u128, Error> {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96) = (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    };

    let liquidity = mul_div(amount1, Q96, sqrt_ratio_b_x96 - sqrt_ratio_a_x96)?;
    u128::try_from(liquidity).map_err(|_| MathError::Overflow.into())
}

/// Largest liquidity fundable by both token amounts, given the current
/// price relative to the range.
///
/// Below the range only token0 funds the position, above it only
/// token1; inside the range both do and the binding side wins.
pub fn liquidity_for_amounts(
    sqrt_price_x96: U256,
    mut sqrt_ratio_a_x96: U256,
    mut sqrt_ratio_b_x96: U256,
    amount0: U256,
    amount1: U256,
) -> Result<u128, Error> {
    if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96) = (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    };

    if sqrt_price_x96 <= sqrt_ratio_a_x96 {
        liquidity_for_amount0(sqrt_ratio_a_x96, sqrt_ratio_b_x96, amount0)
    } else if sqrt_price_x96 < sqrt_ratio_b_x96 {
        let liquidity0 = liquidity_for_amount0(sqrt_price_x96, sqrt_ratio_b_x96, amount0)?;
        let liquidity1 = liquidity_for_amount1(sqrt_ratio_a_x96, sqrt_price_x96, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        liquidity_for_amount1(sqrt_ratio_a_x96, sqrt_ratio_b_x96, amount1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::get_sqrt_ratio_at_tick;
    use proptest::prelude::*;

    #[test]
    fn add_delta_adds_positive_delta() {
        assert_eq!(add_delta(100, 20).unwrap(), 120);
    }

    #[test]
    fn add_delta_subtracts_negative_delta() {
        assert_eq!(add_delta(100, -20).unwrap(), 80);
    }

    #[test]
    fn add_delta_zero_delta_returns_same() {
        assert_eq!(add_delta(123456789, 0).unwrap(), 123456789);
    }

    #[test]
    fn add_delta_positive_overflow() {
        assert!(matches!(
            add_delta(u128::MAX, 1),
            Err(MathError::Overflow)
        ));
    }

    #[test]
    fn add_delta_to_exactly_zero() {
        assert_eq!(add_delta(1_000, -1_000).unwrap(), 0);
    }

    #[test]
    fn add_delta_negative_underflow() {
        assert!(matches!(add_delta(100, -200), Err(MathError::Underflow)));
    }

    #[test]
    fn liquidity_for_eth_usdc_at_5000() {
        // 1 ETH + 5000 USDC deposited into [4545, 5500] at price 5000
        let sqrt_p = get_sqrt_ratio_at_tick(85176).unwrap();
        let sqrt_a = get_sqrt_ratio_at_tick(84222).unwrap();
        let sqrt_b = get_sqrt_ratio_at_tick(86129).unwrap();

        let liquidity = liquidity_for_amounts(
            sqrt_p,
            sqrt_a,
            sqrt_b,
            U256::from(10u128.pow(18)),
            U256::from(5000 * 10u128.pow(18)),
        )
        .unwrap();
        assert_eq!(liquidity, 1518129116516325614066);

        // the USDC side is the binding one at this price
        let from_usdc =
            liquidity_for_amount1(sqrt_a, sqrt_p, U256::from(5000 * 10u128.pow(18))).unwrap();
        assert_eq!(liquidity, from_usdc);
    }

    #[test]
    fn liquidity_below_range_uses_token0_only() {
        // [5500, 6250] seen from price 5000: token1 contributes nothing
        let sqrt_p = get_sqrt_ratio_at_tick(85176).unwrap();
        let sqrt_a = get_sqrt_ratio_at_tick(86129).unwrap();
        let sqrt_b = get_sqrt_ratio_at_tick(87407).unwrap();

        let liquidity = liquidity_for_amounts(
            sqrt_p,
            sqrt_a,
            sqrt_b,
            U256::from(10u128.pow(18)),
            U256::from(5000 * 10u128.pow(18)),
        )
        .unwrap();
        assert_eq!(liquidity, 1198107969043941799936);
        assert_eq!(
            liquidity,
            liquidity_for_amount0(sqrt_a, sqrt_b, U256::from(10u128.pow(18))).unwrap()
        );
    }

    #[test]
    fn liquidity_above_range_uses_token1_only() {
        // [4000, 4545] seen from price 5000
        let sqrt_p = get_sqrt_ratio_at_tick(85176).unwrap();
        let sqrt_a = get_sqrt_ratio_at_tick(82944).unwrap();
        let sqrt_b = get_sqrt_ratio_at_tick(84222).unwrap();

        let liquidity = liquidity_for_amounts(
            sqrt_p,
            sqrt_a,
            sqrt_b,
            U256::from(10u128.pow(18)),
            U256::from(5000 * 10u128.pow(18)),
        )
        .unwrap();
        assert_eq!(
            liquidity,
            liquidity_for_amount1(sqrt_a, sqrt_b, U256::from(5000 * 10u128.pow(18))).unwrap()
        );
    }

    proptest! {
        #[test]
        fn add_delta_round_trips(x: u128, y in (i128::MIN + 1)..=i128::MAX) {
            if let Ok(applied) = add_delta(x, y) {
                prop_assert_eq!(add_delta(applied, -y).unwrap(), x);
            }
        }
    }
}
