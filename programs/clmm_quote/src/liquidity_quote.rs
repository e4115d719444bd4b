//! Liquidity quote engine.
//!
//! Given a price range and the pool's current price, computes the token
//! amounts a position needs (open/increase) or returns (decrease). Within its
//! range a position's liquidity is constant, so the amounts follow from the
//! amount-delta formulas over the part of the range on each side of the price.
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::math::*;
use anchor_lang::prelude::*;

/// Where the current price sits relative to a position's range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PricePosition {
    /// The price is below the range; the position holds only token A.
    BelowRange,
    /// The price is inside the range; the position holds both tokens.
    InRange,
    /// The price is at or above the range; the position holds only token B.
    AboveRange,
}

/// Quote for adding liquidity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IncreaseLiquidityQuote {
    pub liquidity_delta: u128,
    pub token_est_a: u128,
    pub token_est_b: u128,
    /// Most token A the deposit may take after slippage.
    pub token_max_a: u128,
    /// Most token B the deposit may take after slippage.
    pub token_max_b: u128,
}

/// Quote for removing liquidity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecreaseLiquidityQuote {
    pub liquidity_delta: u128,
    pub token_est_a: u128,
    pub token_est_b: u128,
    /// Least token A the withdrawal must return after slippage.
    pub token_min_a: u128,
    /// Least token B the withdrawal must return after slippage.
    pub token_min_b: u128,
}

/// Classifies the current tick against `[tick_lower, tick_upper)`.
pub fn price_position(tick_current_index: i32, tick_lower: i32, tick_upper: i32) -> PricePosition {
    if tick_current_index < tick_lower {
        PricePosition::BelowRange
    } else if tick_current_index >= tick_upper {
        PricePosition::AboveRange
    } else {
        PricePosition::InRange
    }
}

/// Checks a range and returns the sqrt prices of its bounds.
fn range_sqrt_prices(tick_lower: i32, tick_upper: i32) -> Result<(u128, u128)> {
    require!(tick_lower < tick_upper, ErrorCode::InvalidTickRange);
    require!(
        tick_lower >= MIN_TICK && tick_upper <= MAX_TICK,
        ErrorCode::TickOutOfRange
    );
    Ok((tick_to_sqrt_price(tick_lower)?, tick_to_sqrt_price(tick_upper)?))
}

/// Token amounts held by `liquidity` over a range at the current price.
///
/// # Arguments
/// * `liquidity` - The position liquidity
/// * `current_sqrt_price` - The pool's sqrt price
/// * `tick_current_index` - The pool's current tick
/// * `tick_lower`, `tick_upper` - The range
/// * `round_up` - Round up for deposits, down for withdrawals
///
/// # Returns
/// * `Result<(u128, u128)>` - `(token_a, token_b)`
pub fn token_amounts_for_liquidity(
    liquidity: u128,
    current_sqrt_price: u128,
    tick_current_index: i32,
    tick_lower: i32,
    tick_upper: i32,
    round_up: bool,
) -> Result<(u128, u128)> {
    let (sqrt_price_lower, sqrt_price_upper) = range_sqrt_prices(tick_lower, tick_upper)?;

    match price_position(tick_current_index, tick_lower, tick_upper) {
        PricePosition::BelowRange => Ok((
            get_amount_delta_a(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?,
            0,
        )),
        PricePosition::AboveRange => Ok((
            0,
            get_amount_delta_b(sqrt_price_lower, sqrt_price_upper, liquidity, round_up)?,
        )),
        PricePosition::InRange => Ok((
            get_amount_delta_a(current_sqrt_price, sqrt_price_upper, liquidity, round_up)?,
            get_amount_delta_b(sqrt_price_lower, current_sqrt_price, liquidity, round_up)?,
        )),
    }
}

/// Largest liquidity a single token amount can back over a range.
///
/// A token the range cannot hold at the current price backs no liquidity.
pub fn liquidity_for_token_amount(
    current_sqrt_price: u128,
    tick_current_index: i32,
    tick_lower: i32,
    tick_upper: i32,
    input_mint_is_a: bool,
    input_amount: u128,
) -> Result<u128> {
    let (sqrt_price_lower, sqrt_price_upper) = range_sqrt_prices(tick_lower, tick_upper)?;

    match (
        price_position(tick_current_index, tick_lower, tick_upper),
        input_mint_is_a,
    ) {
        (PricePosition::BelowRange, true) => {
            get_liquidity_from_a(input_amount, sqrt_price_lower, sqrt_price_upper)
        }
        (PricePosition::AboveRange, false) => {
            get_liquidity_from_b(input_amount, sqrt_price_lower, sqrt_price_upper)
        }
        (PricePosition::InRange, true) => {
            get_liquidity_from_a(input_amount, current_sqrt_price, sqrt_price_upper)
        }
        (PricePosition::InRange, false) => {
            get_liquidity_from_b(input_amount, sqrt_price_lower, current_sqrt_price)
        }
        (PricePosition::BelowRange, false) | (PricePosition::AboveRange, true) => Ok(0),
    }
}

/// Quotes a deposit of `input_amount` of one token into a range.
///
/// Solves for the liquidity the input backs, then back-computes both token
/// amounts rounded up and widens them by the slippage tolerance.
///
/// # Arguments
/// * `current_sqrt_price` - The pool's sqrt price
/// * `tick_current_index` - The pool's current tick
/// * `tick_lower`, `tick_upper` - The range
/// * `input_mint_is_a` - Whether the input amount is token A
/// * `input_amount` - The amount of the input token
/// * `slippage_tolerance_bps` - Tolerance for `token_max_*`
pub fn increase_quote(
    current_sqrt_price: u128,
    tick_current_index: i32,
    tick_lower: i32,
    tick_upper: i32,
    input_mint_is_a: bool,
    input_amount: u128,
    slippage_tolerance_bps: u16,
) -> Result<IncreaseLiquidityQuote> {
    let liquidity = liquidity_for_token_amount(
        current_sqrt_price,
        tick_current_index,
        tick_lower,
        tick_upper,
        input_mint_is_a,
        input_amount,
    )?;
    increase_quote_by_liquidity(
        liquidity,
        current_sqrt_price,
        tick_current_index,
        tick_lower,
        tick_upper,
        slippage_tolerance_bps,
    )
}

/// Quotes a deposit of an exact liquidity amount into a range.
pub fn increase_quote_by_liquidity(
    liquidity: u128,
    current_sqrt_price: u128,
    tick_current_index: i32,
    tick_lower: i32,
    tick_upper: i32,
    slippage_tolerance_bps: u16,
) -> Result<IncreaseLiquidityQuote> {
    let (token_est_a, token_est_b) = token_amounts_for_liquidity(
        liquidity,
        current_sqrt_price,
        tick_current_index,
        tick_lower,
        tick_upper,
        true,
    )?;

    Ok(IncreaseLiquidityQuote {
        liquidity_delta: liquidity,
        token_est_a,
        token_est_b,
        token_max_a: max_amount_with_slippage(token_est_a, slippage_tolerance_bps)?,
        token_max_b: max_amount_with_slippage(token_est_b, slippage_tolerance_bps)?,
    })
}

/// Quotes a withdrawal of `liquidity` from a range.
///
/// Amounts are rounded down and narrowed by the slippage tolerance.
///
/// # Arguments
/// * `current_sqrt_price` - The pool's sqrt price
/// * `tick_current_index` - The pool's current tick
/// * `tick_lower`, `tick_upper` - The range
/// * `liquidity` - The liquidity to remove
/// * `slippage_tolerance_bps` - Tolerance for `token_min_*`
pub fn decrease_quote(
    current_sqrt_price: u128,
    tick_current_index: i32,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    slippage_tolerance_bps: u16,
) -> Result<DecreaseLiquidityQuote> {
    let (token_est_a, token_est_b) = token_amounts_for_liquidity(
        liquidity,
        current_sqrt_price,
        tick_current_index,
        tick_lower,
        tick_upper,
        false,
    )?;

    Ok(DecreaseLiquidityQuote {
        liquidity_delta: liquidity,
        token_est_a,
        token_est_b,
        token_min_a: min_amount_with_slippage(token_est_a, slippage_tolerance_bps)?,
        token_min_b: min_amount_with_slippage(token_est_b, slippage_tolerance_bps)?,
    })
}

/// Quotes a withdrawal sized to return `token_amount` of one token.
///
/// The liquidity is the largest the token amount backs, so the withdrawal
/// returns at most `token_amount` of that token.
pub fn decrease_quote_by_token(
    current_sqrt_price: u128,
    tick_current_index: i32,
    tick_lower: i32,
    tick_upper: i32,
    token_is_a: bool,
    token_amount: u128,
    slippage_tolerance_bps: u16,
) -> Result<DecreaseLiquidityQuote> {
    let liquidity = liquidity_for_token_amount(
        current_sqrt_price,
        tick_current_index,
        tick_lower,
        tick_upper,
        token_is_a,
        token_amount,
    )?;
    decrease_quote(
        current_sqrt_price,
        tick_current_index,
        tick_lower,
        tick_upper,
        liquidity,
        slippage_tolerance_bps,
    )
}
