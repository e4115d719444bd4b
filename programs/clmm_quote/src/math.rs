//! Quote Engine Math Library
//!
//! This module implements the fixed-point operations the quote engine is built
//! on: converting between tick indices and sqrt prices, the token amount
//! deltas of a constant-liquidity segment, the sqrt price reached after adding
//! or removing an amount, the liquidity an amount can back, and the fee and
//! slippage adjustments applied to quotes.
//!
//! Prices are Q64.64 fixed-point values (scaled by 2^64). Intermediate products
//! are widened to U256 or U512 and narrowed back with an explicit overflow check,
//! so a result that does not fit in 128 bits is reported as `ArithmeticOverflow`.
use crate::constants::*;
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;
use primitive_types::{U256, U512};

/// `sqrt(1.0001)^(2^k)` in Q64.64, for k = 0..=18
///
/// Bit `k` of a positive tick selects entry `k`. Every entry is truncated, so
/// products of table entries never overestimate the true power.
pub const POWERS: [u128; 19] = [
    0x1000346d6ff11672a,
    0x100068db8bac710cb,
    0x1000d1b9c68abe5f7,
    0x1001a37e4a234cb08,
    0x100347278ab0e92ad,
    0x10068efb00a525480,
    0x100d20a63b4173839,
    0x101a4c11c742dd772,
    0x1034c35c31f64cfa6,
    0x106a34b78c8aaffbf,
    0x10d72a6a46ccd8bce,
    0x11b9a258e63928596,
    0x13a2e2bda04f8379f,
    0x181954be69e0da8fe,
    0x244c2655d185a0290,
    0x525816eeb9f935b1c,
    0x1a7c8d00b551684ff4,
    0x2bd893d0b2df7c97884,
    0x78278e1e19e448cf8b95d,
];

/// `sqrt(1.0001)^(-2^k)` in Q64.64, for k = 0..=18
///
/// Used for negative ticks so that no division is needed.
pub const INVERSE_POWERS: [u128; 19] = [
    0xfffcb933bd6fad37,
    0xfff97272373d4132,
    0xfff2e50f5f656932,
    0xffe5caca7e10e4e6,
    0xffcb9843d60f6159,
    0xff973b41fa98c081,
    0xff2ea16466c96a38,
    0xfe5dee046a99a2a8,
    0xfcbe86c7900a88ae,
    0xf987a7253ac41317,
    0xf3392b0822b70005,
    0xe7159475a2c29b74,
    0xd097f3bdfd2022b8,
    0xa9f746462d870fdf,
    0x70d869a156d2a1b8,
    0x31be135f97d08fd9,
    0x9aa508b5b7a84e1,
    0x5d6af8dedb8119,
    0x2216e584f5fa,
];

/// Narrows a U256 to u128, failing with `ArithmeticOverflow` if it does not fit
#[inline(always)]
pub(crate) fn u256_to_u128(value: U256) -> Result<u128> {
    if value.bits() > 128 {
        return err!(ErrorCode::ArithmeticOverflow);
    }
    Ok(value.as_u128())
}

/// Narrows a U512 to u128, failing with `ArithmeticOverflow` if it does not fit
#[inline(always)]
pub(crate) fn u512_to_u128(value: U512) -> Result<u128> {
    if value.bits() > 128 {
        return err!(ErrorCode::ArithmeticOverflow);
    }
    Ok(value.as_u128())
}

/// Multiplies two Q64.64 numbers, truncating the fractional bits of the product
///
/// The full 256-bit product is computed before shifting, so the only failure
/// is a result of 2^128 or more.
///
/// # Arguments
/// * `a` - The first Q64.64 fixed-point number
/// * `b` - The second Q64.64 fixed-point number
///
/// # Returns
/// * `Result<u128>` - `floor(a * b / 2^64)`
#[inline(always)]
pub fn mul_shift_64(a: u128, b: u128) -> Result<u128> {
    let product = U256::from(a) * U256::from(b);
    u256_to_u128(product >> Q64_RESOLUTION)
}

/// Computes `floor(a * b / denominator)` with a 256-bit intermediate product
pub fn mul_div_floor(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return err!(ErrorCode::ArithmeticOverflow);
    }
    let product = U256::from(a) * U256::from(b);
    u256_to_u128(product / U256::from(denominator))
}

/// Computes `ceil(a * b / denominator)` with a 256-bit intermediate product
pub fn mul_div_ceil(a: u128, b: u128, denominator: u128) -> Result<u128> {
    if denominator == 0 {
        return err!(ErrorCode::ArithmeticOverflow);
    }
    let product = U256::from(a) * U256::from(b);
    let denominator = U256::from(denominator);
    let mut quotient = product / denominator;
    if !(product % denominator).is_zero() {
        quotient += U256::one();
    }
    u256_to_u128(quotient)
}

/// Converts a tick index to its sqrt price, `sqrt(1.0001^tick)` in Q64.64
///
/// The tick's absolute value is decomposed into powers of two and the matching
/// table entries are multiplied together, truncating after each step, so the
/// result never exceeds the exact value.
///
/// # Arguments
/// * `tick` - The tick index, within `[MIN_TICK, MAX_TICK]`
///
/// # Returns
/// * `Result<u128>` - The sqrt price in Q64.64, or `TickOutOfRange`
pub fn tick_to_sqrt_price(tick: i32) -> Result<u128> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return err!(ErrorCode::TickOutOfRange);
    }

    let abs_tick = tick.unsigned_abs();
    let table = if tick >= 0 { &POWERS } else { &INVERSE_POWERS };

    let mut sqrt_price = Q64;
    for (bit, factor) in table.iter().enumerate() {
        if abs_tick & (1u32 << bit) != 0 {
            sqrt_price = mul_shift_64(sqrt_price, *factor)?;
        }
    }

    Ok(sqrt_price)
}

/// Converts a sqrt price to the greatest tick whose sqrt price does not exceed it
///
/// Binary search over `[MIN_TICK, MAX_TICK]` using `tick_to_sqrt_price` as the
/// probe, which makes the two functions exact inverses on tick boundaries:
/// `sqrt_price_to_tick(tick_to_sqrt_price(t)) == t` for every valid tick.
///
/// # Arguments
/// * `sqrt_price` - The sqrt price in Q64.64, within `[MIN_SQRT_PRICE, MAX_SQRT_PRICE]`
///
/// # Returns
/// * `Result<i32>` - The floor tick, or `TickOutOfRange`
pub fn sqrt_price_to_tick(sqrt_price: u128) -> Result<i32> {
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price) {
        return err!(ErrorCode::TickOutOfRange);
    }

    let mut low = MIN_TICK;
    let mut high = MAX_TICK;
    let mut floor_tick = MIN_TICK;

    while low <= high {
        let mid = low + (high - low) / 2;
        if tick_to_sqrt_price(mid)? <= sqrt_price {
            floor_tick = mid;
            low = mid + 1;
        } else {
            high = mid - 1;
        }
    }

    Ok(floor_tick)
}

/// Returns `(lower, upper)` of two sqrt prices
#[inline(always)]
fn ordered(sqrt_price_0: u128, sqrt_price_1: u128) -> (u128, u128) {
    if sqrt_price_0 <= sqrt_price_1 {
        (sqrt_price_0, sqrt_price_1)
    } else {
        (sqrt_price_1, sqrt_price_0)
    }
}

/// Amount of token A between two sqrt prices at constant liquidity
///
/// `ΔA = L * (√Pu - √Pl) / (√Pl * √Pu)`, computed in 512 bits.
///
/// # Arguments
/// * `sqrt_price_0`, `sqrt_price_1` - The segment bounds in Q64.64, in either order
/// * `liquidity` - The liquidity active over the segment
/// * `round_up` - Round up (amounts paid into the pool) or down (amounts paid out)
pub fn get_amount_delta_a(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_0, sqrt_price_1);
    if sqrt_price_lower == sqrt_price_upper || liquidity == 0 {
        return Ok(0);
    }
    if sqrt_price_lower == 0 {
        return err!(ErrorCode::SqrtPriceOutOfBounds);
    }

    let sqrt_price_diff = sqrt_price_upper - sqrt_price_lower;
    let numerator = (U512::from(liquidity) * U512::from(sqrt_price_diff)) << Q64_RESOLUTION;
    let denominator = U512::from(sqrt_price_upper) * U512::from(sqrt_price_lower);

    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let result = if round_up && !remainder.is_zero() {
        quotient + U512::one()
    } else {
        quotient
    };

    u512_to_u128(result)
}

/// Amount of token B between two sqrt prices at constant liquidity
///
/// `ΔB = L * (√Pu - √Pl)`, computed in 256 bits.
///
/// # Arguments
/// * `sqrt_price_0`, `sqrt_price_1` - The segment bounds in Q64.64, in either order
/// * `liquidity` - The liquidity active over the segment
/// * `round_up` - Round up (amounts paid into the pool) or down (amounts paid out)
pub fn get_amount_delta_b(
    sqrt_price_0: u128,
    sqrt_price_1: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_0, sqrt_price_1);
    if sqrt_price_lower == sqrt_price_upper || liquidity == 0 {
        return Ok(0);
    }

    let product = U256::from(liquidity) * U256::from(sqrt_price_upper - sqrt_price_lower);
    let quotient = product >> Q64_RESOLUTION;
    let has_remainder = !(product & U256::from(u64::MAX)).is_zero();
    let result = if round_up && has_remainder {
        quotient + U256::one()
    } else {
        quotient
    };

    u256_to_u128(result)
}

/// Sqrt price reached after adding (input) or removing (output) an amount of token A
///
/// `√P' = L * √P / (L ± ΔA * √P)`, always rounded up so the pool never gives
/// away more than the amount accounts for.
///
/// # Arguments
/// * `sqrt_price` - The starting sqrt price in Q64.64
/// * `liquidity` - The active liquidity
/// * `amount` - The amount of token A
/// * `amount_specified_is_input` - Whether the amount is paid into the pool
pub fn get_next_sqrt_price_from_a_round_up(
    sqrt_price: u128,
    liquidity: u128,
    amount: u128,
    amount_specified_is_input: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price);
    }
    if liquidity == 0 {
        return err!(ErrorCode::InsufficientLiquidity);
    }

    let product = U512::from(amount) * U512::from(sqrt_price);
    let liquidity_shifted = U512::from(liquidity) << Q64_RESOLUTION;
    let numerator = (U512::from(liquidity) * U512::from(sqrt_price)) << Q64_RESOLUTION;

    let denominator = if amount_specified_is_input {
        liquidity_shifted + product
    } else {
        if product >= liquidity_shifted {
            return err!(ErrorCode::InsufficientLiquidity);
        }
        liquidity_shifted - product
    };

    let quotient = numerator / denominator;
    let next = if (numerator % denominator).is_zero() {
        quotient
    } else {
        quotient + U512::one()
    };

    let next = u512_to_u128(next)?;
    require!(
        (MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&next),
        ErrorCode::SqrtPriceOutOfBounds
    );
    Ok(next)
}

/// Sqrt price reached after adding (input) or removing (output) an amount of token B
///
/// `√P' = √P ± ΔB / L`. The quotient is rounded down when adding and the
/// subtracted quotient is rounded up when removing, so the new price always
/// stays on the pool's side.
///
/// # Arguments
/// * `sqrt_price` - The starting sqrt price in Q64.64
/// * `liquidity` - The active liquidity
/// * `amount` - The amount of token B
/// * `amount_specified_is_input` - Whether the amount is paid into the pool
pub fn get_next_sqrt_price_from_b_round_down(
    sqrt_price: u128,
    liquidity: u128,
    amount: u128,
    amount_specified_is_input: bool,
) -> Result<u128> {
    if amount == 0 {
        return Ok(sqrt_price);
    }
    if liquidity == 0 {
        return err!(ErrorCode::InsufficientLiquidity);
    }

    let amount_shifted = U256::from(amount) << Q64_RESOLUTION;
    let liquidity = U256::from(liquidity);
    let sqrt_price = U256::from(sqrt_price);

    let next = if amount_specified_is_input {
        sqrt_price + amount_shifted / liquidity
    } else {
        let mut delta = amount_shifted / liquidity;
        if !(amount_shifted % liquidity).is_zero() {
            delta += U256::one();
        }
        if delta >= sqrt_price {
            return err!(ErrorCode::InsufficientLiquidity);
        }
        sqrt_price - delta
    };

    let next = u256_to_u128(next)?;
    require!(
        (MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&next),
        ErrorCode::SqrtPriceOutOfBounds
    );
    Ok(next)
}

/// Liquidity backed by an amount of token A over a sqrt price range, rounded down
///
/// `L = ΔA * √Pl * √Pu / (√Pu - √Pl)`. An empty range backs no liquidity.
pub fn get_liquidity_from_a(amount_a: u128, sqrt_price_0: u128, sqrt_price_1: u128) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_0, sqrt_price_1);
    if sqrt_price_lower == sqrt_price_upper {
        return Ok(0);
    }

    let numerator =
        U512::from(amount_a) * U512::from(sqrt_price_lower) * U512::from(sqrt_price_upper);
    let denominator = U512::from(sqrt_price_upper - sqrt_price_lower) << Q64_RESOLUTION;
    u512_to_u128(numerator / denominator)
}

/// Liquidity backed by an amount of token B over a sqrt price range, rounded down
///
/// `L = ΔB / (√Pu - √Pl)`. An empty range backs no liquidity.
pub fn get_liquidity_from_b(amount_b: u128, sqrt_price_0: u128, sqrt_price_1: u128) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = ordered(sqrt_price_0, sqrt_price_1);
    if sqrt_price_lower == sqrt_price_upper {
        return Ok(0);
    }

    let numerator = U256::from(amount_b) << Q64_RESOLUTION;
    u256_to_u128(numerator / U256::from(sqrt_price_upper - sqrt_price_lower))
}

/// Applies a signed liquidity delta to an unsigned liquidity value
///
/// Underflow below zero and overflow past `u128::MAX` are both `ArithmeticOverflow`.
pub fn add_liquidity_delta(liquidity: u128, delta: i128) -> Result<u128> {
    let result = if delta >= 0 {
        liquidity.checked_add(delta.unsigned_abs())
    } else {
        liquidity.checked_sub(delta.unsigned_abs())
    };
    result.ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))
}

/// Converts an unsigned liquidity amount into a signed delta
pub fn to_liquidity_delta(liquidity: u128, positive: bool) -> Result<i128> {
    let delta = i128::try_from(liquidity).map_err(|_| error!(ErrorCode::ArithmeticOverflow))?;
    Ok(if positive { delta } else { -delta })
}

/// Validates a fee rate in basis points of the input amount
#[inline(always)]
pub fn validate_fee_rate(fee_rate: u16) -> Result<()> {
    require!(fee_rate <= MAX_FEE_RATE, ErrorCode::InvalidFeeRate);
    Ok(())
}

/// Amount left after the swap fee is taken out of `amount`
///
/// The fee is rounded up, so the net amount is `floor(amount * (10000 - fee_rate) / 10000)`.
pub fn apply_swap_fee(amount: u128, fee_rate: u16) -> Result<u128> {
    validate_fee_rate(fee_rate)?;
    mul_div_floor(amount, BPS_DENOMINATOR - u128::from(fee_rate), BPS_DENOMINATOR)
}

/// Gross amount whose net after the swap fee is at least `amount`
///
/// `ceil(amount * 10000 / (10000 - fee_rate))`.
pub fn reverse_apply_swap_fee(amount: u128, fee_rate: u16) -> Result<u128> {
    validate_fee_rate(fee_rate)?;
    mul_div_ceil(amount, BPS_DENOMINATOR, BPS_DENOMINATOR - u128::from(fee_rate))
}

/// Fee growth per unit of liquidity for a fee amount, in Q64.64
///
/// `(fee << 64) / liquidity`. Zero liquidity earns nothing.
pub fn fee_growth_delta(fee_amount: u128, liquidity: u128) -> Result<u128> {
    if liquidity == 0 {
        return Ok(0);
    }
    let shifted = U256::from(fee_amount) << Q64_RESOLUTION;
    u256_to_u128(shifted / U256::from(liquidity))
}

/// Lowest acceptable output for a slippage tolerance, rounded down
///
/// # Arguments
/// * `amount` - The exact quoted amount
/// * `slippage_tolerance_bps` - The tolerance in basis points, at most 10 000
pub fn min_amount_with_slippage(amount: u128, slippage_tolerance_bps: u16) -> Result<u128> {
    require!(
        slippage_tolerance_bps <= MAX_SLIPPAGE_TOLERANCE,
        ErrorCode::InvalidSlippageTolerance
    );
    mul_div_floor(
        amount,
        BPS_DENOMINATOR - u128::from(slippage_tolerance_bps),
        BPS_DENOMINATOR,
    )
}

/// Highest acceptable input for a slippage tolerance, rounded up
///
/// # Arguments
/// * `amount` - The exact quoted amount
/// * `slippage_tolerance_bps` - The tolerance in basis points, at most 10 000
pub fn max_amount_with_slippage(amount: u128, slippage_tolerance_bps: u16) -> Result<u128> {
    require!(
        slippage_tolerance_bps <= MAX_SLIPPAGE_TOLERANCE,
        ErrorCode::InvalidSlippageTolerance
    );
    mul_div_ceil(
        amount,
        BPS_DENOMINATOR + u128::from(slippage_tolerance_bps),
        BPS_DENOMINATOR,
    )
}
