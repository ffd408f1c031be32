use thiserror::Error;

#[derive(Debug, Error)]
pub enum MathError {
    #[error("math error - overflow")]
    Overflow,
    #[error("math error - underflow")]
    Underflow,
    #[error("math error - division by zero")]
    DivisionByZero,
    #[error("bit math error - zero input value")]
    ZeroValue,
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state error - tick out of range")]
    TickOutOfRange,

    #[error("state error - sqrt price out of range")]
    SqrtPriceOutOfRange,

    #[error("state error - sqrt price is 0")]
    SqrtPriceIsZero,

    #[error("state error - sqrt ratio is 0")]
    SqrtRatioIsZero,

    #[error("state error - liquidity is 0")]
    LiquidityIsZero,
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("pool error - zero liquidity")]
    ZeroLiquidity,

    #[error("pool error - invalid tick range")]
    InvalidTickRange,

    #[error("pool error - tick liquidity above per-tick cap")]
    LiquidityOverflow,

    #[error("pool error - liquidity update below zero")]
    LiquidityUnderflow,

    #[error("pool error - not enough liquidity to fill the swap")]
    NotEnoughLiquidity,

    #[error("pool error - insufficient input amount delivered")]
    InsufficientInputAmount,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] crate::error::MathError),

    #[error(transparent)]
    StateError(#[from] crate::error::StateError),

    #[error(transparent)]
    PoolError(#[from] crate::error::PoolError),
}
