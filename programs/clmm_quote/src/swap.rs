//! Swap quote engine.
//!
//! A swap is simulated as a sequence of constant-liquidity steps. Each step
//! moves the price toward the next initialized tick (or the price limit),
//! consuming as much of the remaining amount as the segment allows. When a step
//! lands on an initialized tick the tick is crossed: active liquidity changes by
//! its `liquidity_net` and its growth-outside values flip.
//!
//! Rounding always favors the pool: input amounts round up, output amounts
//! round down, and the fee is taken from the input rounded up.
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::math::*;
use crate::state::PoolSnapshot;
use crate::tick::Tick;
use crate::tick_array::{TickArray, TickArraySequence};
use anchor_lang::prelude::*;

/// Parameters of a swap simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapParams {
    /// The specified amount: the exact input, or the exact output.
    pub amount: u128,
    /// Whether token A is paid in (the price moves down).
    pub input_is_a: bool,
    /// Whether `amount` is the exact input rather than the exact output.
    pub amount_specified_is_input: bool,
    /// Price at which the swap stops early; zero means no limit.
    pub sqrt_price_limit: u128,
    /// Slippage tolerance in basis points applied to `other_amount_threshold`.
    pub slippage_tolerance_bps: u16,
}

/// A tick crossed during a swap, with its growth-outside values after the flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossedTick {
    pub tick_index: i32,
    pub tick: Tick,
}

/// Result of a swap simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapQuote {
    /// Total paid in, fees included.
    pub amount_in: u128,
    /// Total paid out.
    pub amount_out: u128,
    /// Minimum output (exact input) or maximum input (exact output) after slippage.
    pub other_amount_threshold: u128,
    pub amount_specified_is_input: bool,
    pub input_is_a: bool,
    /// Total swap fee, in the input token.
    pub fee_amount: u128,
    /// Protocol's share of `fee_amount`.
    pub protocol_fee_amount: u128,
    /// Whether the price limit stopped the swap before the amount was consumed.
    pub sqrt_price_limit_reached: bool,
    pub next_sqrt_price: u128,
    pub next_tick_index: i32,
    pub next_liquidity: u128,
    /// Fee growth global of the input token after the swap.
    pub next_fee_growth_global: u128,
    pub crossed_ticks: Vec<CrossedTick>,
}

/// Result of a single constant-liquidity step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapStepQuote {
    pub amount_in: u128,
    pub amount_out: u128,
    pub next_sqrt_price: u128,
    pub fee_amount: u128,
}

/// The effective price limit: zero selects the global bound in the trade direction.
pub fn resolve_sqrt_price_limit(sqrt_price_limit: u128, a_to_b: bool) -> u128 {
    match (sqrt_price_limit, a_to_b) {
        (0, true) => MIN_SQRT_PRICE,
        (0, false) => MAX_SQRT_PRICE,
        (limit, _) => limit,
    }
}

/// Simulates a swap against a pool snapshot.
///
/// # Arguments
/// * `pool` - The pool snapshot
/// * `tick_arrays` - Tick arrays covering every tick the swap can reach, in any order
/// * `params` - Amount, direction, price limit and slippage tolerance
///
/// # Returns
/// * `Result<SwapQuote>` - The quote; `TickArraySequenceInvalid` if the arrays
///   cannot carry the swap to completion
pub fn simulate_swap(
    pool: &PoolSnapshot,
    tick_arrays: &[TickArray],
    params: SwapParams,
) -> Result<SwapQuote> {
    pool.validate()?;
    require!(params.amount > 0, ErrorCode::ZeroTradableAmount);

    let a_to_b = params.input_is_a;
    let specified_input = params.amount_specified_is_input;
    let sqrt_price_limit = resolve_sqrt_price_limit(params.sqrt_price_limit, a_to_b);

    require!(
        (MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price_limit),
        ErrorCode::SqrtPriceOutOfBounds
    );
    if (a_to_b && sqrt_price_limit >= pool.sqrt_price)
        || (!a_to_b && sqrt_price_limit <= pool.sqrt_price)
    {
        return err!(ErrorCode::InvalidSqrtPriceLimitDirection);
    }

    let sequence = TickArraySequence::new(tick_arrays, pool.tick_spacing)?;

    let mut globals = pool.global_growths();
    let mut amount_remaining = params.amount;
    let mut amount_calculated: u128 = 0;
    let mut current_sqrt_price = pool.sqrt_price;
    let mut current_tick_index = pool.tick_current_index;
    let mut current_liquidity = pool.liquidity;
    let mut fee_amount: u128 = 0;
    let mut protocol_fee_amount: u128 = 0;
    let mut crossed_ticks = Vec::new();

    while amount_remaining > 0 && current_sqrt_price != sqrt_price_limit {
        // The scan only fails when it leaves the supplied arrays.
        let (next_tick, next_tick_index) = sequence
            .next_swap_boundary(current_tick_index, a_to_b)
            .map_err(|_| error!(ErrorCode::TickArraySequenceInvalid))?;

        let next_tick_sqrt_price = tick_to_sqrt_price(next_tick_index)?;
        let target_sqrt_price = if a_to_b {
            next_tick_sqrt_price.max(sqrt_price_limit)
        } else {
            next_tick_sqrt_price.min(sqrt_price_limit)
        };

        let step = compute_swap_step(
            amount_remaining,
            pool.fee_rate,
            current_liquidity,
            current_sqrt_price,
            target_sqrt_price,
            a_to_b,
            specified_input,
        )?;

        if specified_input {
            amount_remaining = amount_remaining
                .checked_sub(step.amount_in)
                .and_then(|amount| amount.checked_sub(step.fee_amount))
                .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;
            amount_calculated = amount_calculated
                .checked_add(step.amount_out)
                .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;
        } else {
            amount_remaining = amount_remaining
                .checked_sub(step.amount_out)
                .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;
            amount_calculated = amount_calculated
                .checked_add(step.amount_in)
                .and_then(|amount| amount.checked_add(step.fee_amount))
                .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;
        }

        let step_protocol_fee = mul_div_floor(
            step.fee_amount,
            u128::from(pool.protocol_fee_rate),
            BPS_DENOMINATOR,
        )?;
        fee_amount = fee_amount
            .checked_add(step.fee_amount)
            .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;
        protocol_fee_amount = protocol_fee_amount
            .checked_add(step_protocol_fee)
            .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;

        if current_liquidity > 0 {
            let growth = fee_growth_delta(step.fee_amount - step_protocol_fee, current_liquidity)?;
            if a_to_b {
                globals.fee_growth_global_a = globals.fee_growth_global_a.wrapping_add(growth);
            } else {
                globals.fee_growth_global_b = globals.fee_growth_global_b.wrapping_add(growth);
            }
        }

        if step.next_sqrt_price == next_tick_sqrt_price {
            if let Some(tick) = next_tick {
                current_liquidity = cross_liquidity(current_liquidity, tick.liquidity_net, a_to_b)?;
                msg!(
                    "Crossed tick {}, liquidity_net: {}. Current pool liquidity: {}",
                    next_tick_index,
                    tick.liquidity_net,
                    current_liquidity
                );
                crossed_ticks.push(CrossedTick {
                    tick_index: next_tick_index,
                    tick: tick.cross(&globals),
                });
            }
            current_tick_index = if a_to_b {
                next_tick_index - 1
            } else {
                next_tick_index
            };
        } else if step.next_sqrt_price != current_sqrt_price {
            current_tick_index = sqrt_price_to_tick(step.next_sqrt_price)?;
        }

        current_sqrt_price = step.next_sqrt_price;
    }

    let swapped_amount = params.amount - amount_remaining;
    let (amount_in, amount_out) = if specified_input {
        (swapped_amount, amount_calculated)
    } else {
        (amount_calculated, swapped_amount)
    };
    let other_amount_threshold = if specified_input {
        min_amount_with_slippage(amount_out, params.slippage_tolerance_bps)?
    } else {
        max_amount_with_slippage(amount_in, params.slippage_tolerance_bps)?
    };

    Ok(SwapQuote {
        amount_in,
        amount_out,
        other_amount_threshold,
        amount_specified_is_input: specified_input,
        input_is_a: a_to_b,
        fee_amount,
        protocol_fee_amount,
        sqrt_price_limit_reached: amount_remaining > 0,
        next_sqrt_price: current_sqrt_price,
        next_tick_index: current_tick_index,
        next_liquidity: current_liquidity,
        next_fee_growth_global: if a_to_b {
            globals.fee_growth_global_a
        } else {
            globals.fee_growth_global_b
        },
        crossed_ticks,
    })
}

/// Quotes a swap of an exact input amount.
///
/// # Arguments
/// * `token_in` - The exact amount paid in
/// * `specified_token_a` - Whether the input token is token A
/// * `slippage_tolerance_bps` - Tolerance for the minimum output
/// * `pool` - The pool snapshot
/// * `tick_arrays` - Tick arrays covering the swap
pub fn swap_quote_by_input_token(
    token_in: u128,
    specified_token_a: bool,
    slippage_tolerance_bps: u16,
    pool: &PoolSnapshot,
    tick_arrays: &[TickArray],
) -> Result<SwapQuote> {
    simulate_swap(
        pool,
        tick_arrays,
        SwapParams {
            amount: token_in,
            input_is_a: specified_token_a,
            amount_specified_is_input: true,
            sqrt_price_limit: 0,
            slippage_tolerance_bps,
        },
    )
}

/// Quotes a swap for an exact output amount.
///
/// # Arguments
/// * `token_out` - The exact amount paid out
/// * `specified_token_a` - Whether the output token is token A
/// * `slippage_tolerance_bps` - Tolerance for the maximum input
/// * `pool` - The pool snapshot
/// * `tick_arrays` - Tick arrays covering the swap
pub fn swap_quote_by_output_token(
    token_out: u128,
    specified_token_a: bool,
    slippage_tolerance_bps: u16,
    pool: &PoolSnapshot,
    tick_arrays: &[TickArray],
) -> Result<SwapQuote> {
    simulate_swap(
        pool,
        tick_arrays,
        SwapParams {
            amount: token_out,
            input_is_a: !specified_token_a,
            amount_specified_is_input: false,
            sqrt_price_limit: 0,
            slippage_tolerance_bps,
        },
    )
}

/// Active liquidity after crossing a tick: up adds `liquidity_net`, down subtracts it.
fn cross_liquidity(liquidity: u128, liquidity_net: i128, a_to_b: bool) -> Result<u128> {
    let delta = if a_to_b {
        liquidity_net
            .checked_neg()
            .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?
    } else {
        liquidity_net
    };
    add_liquidity_delta(liquidity, delta)
}

/// Computes one constant-liquidity swap step from `current_sqrt_price` toward `target_sqrt_price`.
///
/// The specified side of the trade ("fixed" amount) is measured against the
/// remaining amount; if the whole segment fits, the step ends at the target,
/// otherwise it ends at the price the remaining amount reaches. The other side
/// ("unfixed" amount) is then derived from the price move.
///
/// # Arguments
/// * `amount_remaining` - Amount left to swap (input including fee, or output)
/// * `fee_rate` - Swap fee in basis points
/// * `liquidity` - Active liquidity over the segment
/// * `current_sqrt_price` - Start of the segment
/// * `target_sqrt_price` - Furthest price the step may reach
/// * `a_to_b` - Whether token A is paid in
/// * `specified_input` - Whether `amount_remaining` is an input amount
pub fn compute_swap_step(
    amount_remaining: u128,
    fee_rate: u16,
    liquidity: u128,
    current_sqrt_price: u128,
    target_sqrt_price: u128,
    a_to_b: bool,
    specified_input: bool,
) -> Result<SwapStepQuote> {
    // Overflow here only means the whole segment is out of reach.
    let initial_amount_fixed_delta = amount_fixed_delta(
        current_sqrt_price,
        target_sqrt_price,
        liquidity,
        a_to_b,
        specified_input,
    )
    .ok();

    let amount_calculated = if specified_input {
        apply_swap_fee(amount_remaining, fee_rate)?
    } else {
        amount_remaining
    };

    let next_sqrt_price = match initial_amount_fixed_delta {
        Some(delta) if delta <= amount_calculated => target_sqrt_price,
        _ => next_sqrt_price(
            current_sqrt_price,
            liquidity,
            amount_calculated,
            a_to_b,
            specified_input,
        )?,
    };

    let is_max_swap = next_sqrt_price == target_sqrt_price;

    let amount_unfixed = amount_unfixed_delta(
        current_sqrt_price,
        next_sqrt_price,
        liquidity,
        a_to_b,
        specified_input,
    )?;
    let amount_fixed = match initial_amount_fixed_delta {
        Some(delta) if is_max_swap => delta,
        _ => amount_fixed_delta(
            current_sqrt_price,
            next_sqrt_price,
            liquidity,
            a_to_b,
            specified_input,
        )?,
    };

    let (amount_in, mut amount_out) = if specified_input {
        (amount_fixed, amount_unfixed)
    } else {
        (amount_unfixed, amount_fixed)
    };

    if !specified_input && amount_out > amount_remaining {
        amount_out = amount_remaining;
    }

    let fee_amount = if specified_input && !is_max_swap {
        amount_remaining
            .checked_sub(amount_in)
            .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?
    } else {
        reverse_apply_swap_fee(amount_in, fee_rate)? - amount_in
    };

    Ok(SwapStepQuote {
        amount_in,
        amount_out,
        next_sqrt_price,
        fee_amount,
    })
}

/// Amount on the specified side of the trade between two prices.
///
/// Token A when the specified token is A (input A, or output A), token B otherwise.
fn amount_fixed_delta(
    current_sqrt_price: u128,
    target_sqrt_price: u128,
    liquidity: u128,
    a_to_b: bool,
    specified_input: bool,
) -> Result<u128> {
    if a_to_b == specified_input {
        get_amount_delta_a(current_sqrt_price, target_sqrt_price, liquidity, specified_input)
    } else {
        get_amount_delta_b(current_sqrt_price, target_sqrt_price, liquidity, specified_input)
    }
}

/// Amount on the derived side of the trade between two prices.
fn amount_unfixed_delta(
    current_sqrt_price: u128,
    target_sqrt_price: u128,
    liquidity: u128,
    a_to_b: bool,
    specified_input: bool,
) -> Result<u128> {
    if a_to_b == specified_input {
        get_amount_delta_b(current_sqrt_price, target_sqrt_price, liquidity, !specified_input)
    } else {
        get_amount_delta_a(current_sqrt_price, target_sqrt_price, liquidity, !specified_input)
    }
}

fn next_sqrt_price(
    sqrt_price: u128,
    liquidity: u128,
    amount: u128,
    a_to_b: bool,
    specified_input: bool,
) -> Result<u128> {
    if a_to_b == specified_input {
        get_next_sqrt_price_from_a_round_up(sqrt_price, liquidity, amount, specified_input)
    } else {
        get_next_sqrt_price_from_b_round_down(sqrt_price, liquidity, amount, specified_input)
    }
}
