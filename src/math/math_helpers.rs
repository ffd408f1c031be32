use crate::error::MathError;
use alloy_primitives::{U256, U512};

/// Computes `floor(a * b / denominator)` with a full 512-bit
/// intermediate product, so the multiplication never truncates even
/// when `a * b` exceeds 256 bits.
///
/// Fails with `DivisionByZero` when `denominator` is zero and with
/// `Overflow` when the quotient does not fit in 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let product = U512::from(a) * U512::from(b);
    let quotient = product / U512::from(denominator);

    let limbs = quotient.as_limbs();
    if limbs[4..].iter().any(|&limb| limb != 0) {
        return Err(MathError::Overflow);
    }
    Ok(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

/// Like [`mul_div`], but rounds the quotient up on a non-zero
/// remainder. The bumped result must still fit in 256 bits.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    let result = mul_div(a, b, denominator)?;

    if a.mul_mod(b, denominator) > U256::ZERO {
        result.checked_add(U256::ONE).ok_or(MathError::Overflow)
    } else {
        Ok(result)
    }
}

/// Divides `a` by `b`, rounding up on a non-zero remainder.
///
/// Panics on `b == 0`, mirroring primitive integer division; callers
/// must guarantee a non-zero divisor.
pub fn div_rounding_up(a: U256, b: U256) -> U256 {
    let (quotient, remainder) = a.div_rem(b);
    if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::ONE
    }
}
