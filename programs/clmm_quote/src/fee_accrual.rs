//! Fee and reward accrual engine.
//!
//! Fees and rewards are tracked as growth per unit of liquidity. For a range,
//! the growth that happened inside it is the global growth minus the growth
//! recorded outside each of its bounding ticks; a position is owed its
//! liquidity times the change in that inside growth since its checkpoint.
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::math::u256_to_u128;
use crate::position::Position;
use crate::state::PoolSnapshot;
use crate::tick::{GlobalGrowths, Tick};
use anchor_lang::prelude::*;
use primitive_types::U256;

/// Fee and reward growth inside a range, in Q64.64.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowthsInside {
    pub fee_growth_inside_a: u128,
    pub fee_growth_inside_b: u128,
    pub reward_growths_inside: [u128; NUM_REWARDS],
}

/// Amounts owed to a position after accrual.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccrualQuote {
    /// Total token A fees owed, including previously accrued amounts.
    pub fee_owed_a: u128,
    /// Total token B fees owed, including previously accrued amounts.
    pub fee_owed_b: u128,
    /// Total reward owed per slot; `None` for slots with no reward configured.
    pub rewards: [Option<u128>; NUM_REWARDS],
    pub fee_growth_inside_a: u128,
    pub fee_growth_inside_b: u128,
    pub reward_growths_inside: [u128; NUM_REWARDS],
}

impl AccrualQuote {
    /// Reward owed for one slot.
    ///
    /// `RewardNotInitialized` distinguishes an unconfigured slot from a zero reward.
    pub fn reward_owed(&self, reward_index: usize) -> Result<u128> {
        let reward = self
            .rewards
            .get(reward_index)
            .ok_or_else(|| error!(ErrorCode::InvalidRewardIndex))?;
        reward.ok_or_else(|| error!(ErrorCode::RewardNotInitialized))
    }
}

/// Growth inside `[lower, upper)` of one accumulator.
///
/// Below the lower tick: all of the lower tick's outside growth when the
/// price is at or above it, otherwise the complement. Above the upper tick:
/// symmetric. An uninitialized tick (`None`) is read as if it were
/// initialized now, with all growth below it. All arithmetic wraps, since the
/// accumulators do.
fn growth_inside(
    tick_current_index: i32,
    tick_lower_index: i32,
    tick_upper_index: i32,
    global: u128,
    outside_lower: Option<u128>,
    outside_upper: Option<u128>,
) -> u128 {
    let below = match outside_lower {
        None => global,
        Some(outside) if tick_current_index < tick_lower_index => global.wrapping_sub(outside),
        Some(outside) => outside,
    };
    let above = match outside_upper {
        None => 0,
        Some(outside) if tick_current_index < tick_upper_index => outside,
        Some(outside) => global.wrapping_sub(outside),
    };
    global.wrapping_sub(below).wrapping_sub(above)
}

/// Computes fee and reward growth inside a range.
///
/// # Arguments
/// * `tick_current_index` - The pool's current tick
/// * `tick_lower_index`, `tick_lower` - The lower bound and its tick state
/// * `tick_upper_index`, `tick_upper` - The upper bound and its tick state
/// * `globals` - The pool's global growth
pub fn growths_inside(
    tick_current_index: i32,
    tick_lower_index: i32,
    tick_lower: &Tick,
    tick_upper_index: i32,
    tick_upper: &Tick,
    globals: &GlobalGrowths,
) -> GrowthsInside {
    let lower = tick_lower.is_initialized().then_some(tick_lower);
    let upper = tick_upper.is_initialized().then_some(tick_upper);

    let inside = |global: u128, outside_lower: Option<u128>, outside_upper: Option<u128>| {
        growth_inside(
            tick_current_index,
            tick_lower_index,
            tick_upper_index,
            global,
            outside_lower,
            outside_upper,
        )
    };

    let mut reward_growths_inside = [0u128; NUM_REWARDS];
    for (index, growth) in reward_growths_inside.iter_mut().enumerate() {
        *growth = inside(
            globals.reward_growths_global[index],
            lower.map(|tick| tick.reward_growths_outside[index]),
            upper.map(|tick| tick.reward_growths_outside[index]),
        );
    }

    GrowthsInside {
        fee_growth_inside_a: inside(
            globals.fee_growth_global_a,
            lower.map(|tick| tick.fee_growth_outside_a),
            upper.map(|tick| tick.fee_growth_outside_a),
        ),
        fee_growth_inside_b: inside(
            globals.fee_growth_global_b,
            lower.map(|tick| tick.fee_growth_outside_b),
            upper.map(|tick| tick.fee_growth_outside_b),
        ),
        reward_growths_inside,
    }
}

/// Amount earned by `liquidity` for a growth change, truncated toward zero.
///
/// `floor((growth_inside - checkpoint) * liquidity / 2^64)`, with the growth
/// difference taken modulo 2^128.
pub fn owed_delta(growth_inside: u128, checkpoint: u128, liquidity: u128) -> Result<u128> {
    let growth_delta = growth_inside.wrapping_sub(checkpoint);
    u256_to_u128((U256::from(growth_delta) * U256::from(liquidity)) >> Q64_RESOLUTION)
}

/// Computes the fees and rewards owed to a position against a pool snapshot.
///
/// The result contains the totals (previously owed plus newly accrued); the
/// position itself is not modified, so accruing twice against the same
/// snapshot gives the same answer.
///
/// # Arguments
/// * `position` - The position
/// * `pool` - The pool snapshot
/// * `tick_lower`, `tick_upper` - State of the position's bounding ticks
pub fn accrue(
    position: &Position,
    pool: &PoolSnapshot,
    tick_lower: &Tick,
    tick_upper: &Tick,
) -> Result<AccrualQuote> {
    let inside = growths_inside(
        pool.tick_current_index,
        position.tick_lower_index,
        tick_lower,
        position.tick_upper_index,
        tick_upper,
        &pool.global_growths(),
    );

    let add_owed = |owed: u128, growth: u128, checkpoint: u128| -> Result<u128> {
        owed.checked_add(owed_delta(growth, checkpoint, position.liquidity)?)
            .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))
    };

    let mut rewards = [None; NUM_REWARDS];
    for (index, reward) in rewards.iter_mut().enumerate() {
        if !pool.reward_infos[index].initialized() {
            continue;
        }
        let info = &position.reward_infos[index];
        *reward = Some(add_owed(
            info.amount_owed,
            inside.reward_growths_inside[index],
            info.growth_inside_checkpoint,
        )?);
    }

    Ok(AccrualQuote {
        fee_owed_a: add_owed(
            position.fee_owed_a,
            inside.fee_growth_inside_a,
            position.fee_growth_checkpoint_a,
        )?,
        fee_owed_b: add_owed(
            position.fee_owed_b,
            inside.fee_growth_inside_b,
            position.fee_growth_checkpoint_b,
        )?,
        rewards,
        fee_growth_inside_a: inside.fee_growth_inside_a,
        fee_growth_inside_b: inside.fee_growth_inside_b,
        reward_growths_inside: inside.reward_growths_inside,
    })
}

/// Accrues against the pool with reward growth first advanced to `timestamp`.
pub fn accrue_at(
    position: &Position,
    pool: &PoolSnapshot,
    tick_lower: &Tick,
    tick_upper: &Tick,
    timestamp: u64,
) -> Result<AccrualQuote> {
    accrue(
        position,
        &pool.with_rewards_updated(timestamp)?,
        tick_lower,
        tick_upper,
    )
}
