use alloy_primitives::{uint, U256};

pub mod error;
mod hash;
pub mod math;
pub mod pool;

pub use hash::FastMap;
pub use pool::swap::Slot0;
pub use pool::{Pool, PoolHost};

pub const RESOLUTION: u8 = 96;

/// 2^96, the scale factor of Q64.96 fixed-point sqrt prices.
pub const Q96: U256 = uint!(79228162514264337593543950336_U256);

/// Largest value representable in 160 bits; sqrt prices never exceed it.
pub(crate) const U160_MAX: U256 =
    uint!(1461501637330902918203684832716283019655932542975_U256);
