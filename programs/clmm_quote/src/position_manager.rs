/// Position Manager Module
///
/// This module drives a position through its lifecycle against caller-owned
/// copies of the pool snapshot and tick arrays: opening, adding and removing
/// liquidity, crediting fees and rewards, collecting them and closing.
/// Nothing here performs I/O; the caller decides what to do with the updated
/// values.
use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::fee_accrual::{accrue, AccrualQuote};
use crate::liquidity_quote::token_amounts_for_liquidity;
use crate::math::{add_liquidity_delta, to_liquidity_delta};
use crate::position::{validate_tick_range, Position};
use crate::state::PoolSnapshot;
use crate::tick_array::{find_tick, find_tick_mut, TickArray};

/// Opens an empty position in a pool.
///
/// # Parameters
/// * `pool` - The pool snapshot, for its tick spacing
/// * `tick_lower_index` - The lower tick boundary of the position
/// * `tick_upper_index` - The upper tick boundary of the position
///
/// # Returns
/// * `Result<Position>` - The new position, holding no liquidity
pub fn open_position(
    pool: &PoolSnapshot,
    tick_lower_index: i32,
    tick_upper_index: i32,
) -> Result<Position> {
    let position = Position::open(tick_lower_index, tick_upper_index, pool.tick_spacing)?;
    msg!(
        "Opened position [{}, {}) at tick {}",
        tick_lower_index,
        tick_upper_index,
        pool.tick_current_index
    );
    Ok(position)
}

/// Increases liquidity in a position
///
/// # Parameters
/// * `pool` - The pool snapshot; its liquidity grows if the range is active
/// * `tick_arrays` - Tick arrays holding the position's bounding ticks
/// * `position` - The position to modify
/// * `liquidity_delta` - The amount of liquidity to add
///
/// # Returns
/// * `Result<(u128, u128)>` - The amounts of token A and B required, rounded up
pub fn increase_liquidity(
    pool: &mut PoolSnapshot,
    tick_arrays: &mut [TickArray],
    position: &mut Position,
    liquidity_delta: u128,
) -> Result<(u128, u128)> {
    modify_liquidity(
        pool,
        tick_arrays,
        position,
        to_liquidity_delta(liquidity_delta, true)?,
    )?;
    token_amounts_for_liquidity(
        liquidity_delta,
        pool.sqrt_price,
        pool.tick_current_index,
        position.tick_lower_index,
        position.tick_upper_index,
        true,
    )
}

/// Decreases liquidity in a position
///
/// # Parameters
/// * `pool` - The pool snapshot; its liquidity shrinks if the range is active
/// * `tick_arrays` - Tick arrays holding the position's bounding ticks
/// * `position` - The position to modify
/// * `liquidity_delta` - The amount of liquidity to remove
///
/// # Returns
/// * `Result<(u128, u128)>` - The amounts of token A and B returned, rounded down
pub fn decrease_liquidity(
    pool: &mut PoolSnapshot,
    tick_arrays: &mut [TickArray],
    position: &mut Position,
    liquidity_delta: u128,
) -> Result<(u128, u128)> {
    position.ensure_not_closed()?;
    // Ensure we're not removing more liquidity than the position has
    require!(
        position.liquidity >= liquidity_delta,
        ErrorCode::PositionLiquidityTooLow
    );

    modify_liquidity(
        pool,
        tick_arrays,
        position,
        to_liquidity_delta(liquidity_delta, false)?,
    )?;
    token_amounts_for_liquidity(
        liquidity_delta,
        pool.sqrt_price,
        pool.tick_current_index,
        position.tick_lower_index,
        position.tick_upper_index,
        false,
    )
}

/// Applies a liquidity change to the position, its bounding ticks and the pool.
///
/// Fees and rewards are credited against the ticks as they were before the
/// change, so a tick cleared by a full withdrawal still settles what it owed.
/// Every new value is computed before anything is written back, so a failed
/// change leaves the pool, the ticks and the position untouched.
fn modify_liquidity(
    pool: &mut PoolSnapshot,
    tick_arrays: &mut [TickArray],
    position: &mut Position,
    liquidity_delta: i128,
) -> Result<()> {
    position.ensure_not_closed()?;
    require!(liquidity_delta != 0, ErrorCode::ZeroLiquidityDelta);
    validate_tick_range(
        position.tick_lower_index,
        position.tick_upper_index,
        pool.tick_spacing,
    )?;

    let tick_lower = find_tick(tick_arrays, position.tick_lower_index, pool.tick_spacing)?;
    let tick_upper = find_tick(tick_arrays, position.tick_upper_index, pool.tick_spacing)?;
    let quote = accrue(position, pool, &tick_lower, &tick_upper)?;

    let globals = pool.global_growths();
    let mut next_tick_lower = tick_lower;
    next_tick_lower.update_on_liquidity_change(
        position.tick_lower_index,
        pool.tick_current_index,
        liquidity_delta,
        false,
        &globals,
    )?;
    let mut next_tick_upper = tick_upper;
    next_tick_upper.update_on_liquidity_change(
        position.tick_upper_index,
        pool.tick_current_index,
        liquidity_delta,
        true,
        &globals,
    )?;
    let next_position_liquidity = add_liquidity_delta(position.liquidity, liquidity_delta)?;
    let next_pool_liquidity = if position.is_in_range(pool.tick_current_index) {
        add_liquidity_delta(pool.liquidity, liquidity_delta)?
    } else {
        pool.liquidity
    };

    // Both slots were resolved by `find_tick` above
    *find_tick_mut(tick_arrays, position.tick_lower_index, pool.tick_spacing)? = next_tick_lower;
    *find_tick_mut(tick_arrays, position.tick_upper_index, pool.tick_spacing)? = next_tick_upper;
    position.apply_accrual(&quote);
    position.liquidity = next_position_liquidity;
    pool.liquidity = next_pool_liquidity;
    Ok(())
}

/// Credits fees and rewards accrued since the position's last checkpoint.
///
/// # Returns
/// * `Result<AccrualQuote>` - The accrual that was applied to the position
pub fn update_fees_and_rewards(
    pool: &PoolSnapshot,
    tick_arrays: &[TickArray],
    position: &mut Position,
) -> Result<AccrualQuote> {
    position.ensure_not_closed()?;
    let tick_lower = find_tick(tick_arrays, position.tick_lower_index, pool.tick_spacing)?;
    let tick_upper = find_tick(tick_arrays, position.tick_upper_index, pool.tick_spacing)?;

    let quote = accrue(position, pool, &tick_lower, &tick_upper)?;
    position.apply_accrual(&quote);
    Ok(quote)
}

/// Collects accumulated fees from a position
///
/// # Returns
/// * `Result<(u128, u128)>` - The amounts of token A and B fees collected
pub fn collect_fees(position: &mut Position) -> Result<(u128, u128)> {
    position.ensure_not_closed()?;

    let fees = (position.fee_owed_a, position.fee_owed_b);
    position.fee_owed_a = 0;
    position.fee_owed_b = 0;

    Ok(fees)
}

/// Collects the accumulated reward of one slot
///
/// # Returns
/// * `Result<u128>` - The reward collected; `RewardNotInitialized` if the pool
///   has no reward configured in that slot
pub fn collect_reward(
    pool: &PoolSnapshot,
    position: &mut Position,
    reward_index: usize,
) -> Result<u128> {
    position.ensure_not_closed()?;
    let reward_info = pool
        .reward_infos
        .get(reward_index)
        .ok_or_else(|| error!(ErrorCode::InvalidRewardIndex))?;
    require!(reward_info.initialized(), ErrorCode::RewardNotInitialized);

    let info = &mut position.reward_infos[reward_index];
    let amount = info.amount_owed;
    info.amount_owed = 0;
    Ok(amount)
}

/// Closes a position that holds no liquidity and is owed nothing.
pub fn close_position(position: &mut Position) -> Result<()> {
    position.close()?;
    msg!(
        "Closed position [{}, {})",
        position.tick_lower_index,
        position.tick_upper_index
    );
    Ok(())
}
