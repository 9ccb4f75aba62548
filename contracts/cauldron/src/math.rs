//! Ray fixed-point helpers.
//!
//! All ratios, rates and prices are scaled by [`RAY`] (1e27). Products are
//! taken in 256 bits before dividing so `a * b / c` never overflows for
//! amounts that themselves fit in an `i128`.

use soroban_sdk::{Env, I256};

use crate::ProtocolError;

pub const RAY: i128 = 1_000_000_000_000_000_000_000_000_000;

/// `floor(a * b / c)` for non-negative operands.
pub fn mul_div(env: &Env, a: i128, b: i128, c: i128) -> Result<i128, ProtocolError> {
    if a < 0 || b < 0 || c <= 0 {
        return Err(ProtocolError::ArithmeticOverflow);
    }
    let product = I256::from_i128(env, a).mul(&I256::from_i128(env, b));
    product
        .div(&I256::from_i128(env, c))
        .to_i128()
        .ok_or(ProtocolError::ArithmeticOverflow)
}

/// `ceil(a * b / c)` for non-negative operands.
pub fn mul_div_up(env: &Env, a: i128, b: i128, c: i128) -> Result<i128, ProtocolError> {
    if a < 0 || b < 0 || c <= 0 {
        return Err(ProtocolError::ArithmeticOverflow);
    }
    let product = I256::from_i128(env, a).mul(&I256::from_i128(env, b));
    product
        .add(&I256::from_i128(env, c - 1))
        .div(&I256::from_i128(env, c))
        .to_i128()
        .ok_or(ProtocolError::ArithmeticOverflow)
}

/// `x * y / RAY`, rounded down.
pub fn rmul(env: &Env, x: i128, y: i128) -> Result<i128, ProtocolError> {
    mul_div(env, x, y, RAY)
}

/// `x * RAY / y`, rounded down.
pub fn rdiv(env: &Env, x: i128, y: i128) -> Result<i128, ProtocolError> {
    mul_div(env, x, RAY, y)
}
