use crate::error::{Error, MathError, PoolError};
use crate::math::liquidity_math::add_delta;
use alloy_primitives::{keccak256, Address, B256};

/// Stable 32-byte identity of a position: the owner and both tick
/// bounds, packed big-endian and hashed.
pub fn position_key(owner: Address, lower_tick: i32, upper_tick: i32) -> B256 {
    let mut packed = [0u8; 28];
    packed[..20].copy_from_slice(owner.as_slice());
    packed[20..24].copy_from_slice(&lower_tick.to_be_bytes());
    packed[24..].copy_from_slice(&upper_tick.to_be_bytes());
    keccak256(packed)
}

/// Liquidity a single owner holds over one tick range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub liquidity: u128,
}

impl Position {
    /// The position after applying a signed liquidity change. Same
    /// stage-then-commit contract as `TickInfo::apply`.
    pub fn apply(&self, liquidity_delta: i128) -> Result<Position, Error> {
        let liquidity = add_delta(self.liquidity, liquidity_delta).map_err(|e| match e {
            MathError::Underflow => Error::from(PoolError::LiquidityUnderflow),
            other => Error::from(other),
        })?;
        Ok(Position { liquidity })
    }
}
