/// Defines the state of a concentrated liquidity position.
///
/// A position provides liquidity over a price range defined by a lower and an
/// upper tick. Besides its liquidity it carries the fee and reward growth it
/// has been credited up to (its checkpoints) and the amounts owed to it but
/// not yet collected.
use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;
use crate::fee_accrual::AccrualQuote;

/// Per-slot reward checkpoint and owed amount of a position.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionRewardInfo {
    /// Reward growth inside the range at the last update, in Q64.64.
    pub growth_inside_checkpoint: u128,
    /// Reward owed and not yet collected.
    pub amount_owed: u128,
}

/// Lifecycle stage of a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionLifecycle {
    /// Opened, holding no liquidity.
    Open,
    /// Holding liquidity.
    Active,
    /// Closed; no further operations are accepted.
    Closed,
}

/// Represents the state of a concentrated liquidity position.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    /// The lower tick boundary. Liquidity is active when the pool's current
    /// tick is at or above this value.
    pub tick_lower_index: i32,
    /// The upper tick boundary. Liquidity is active when the pool's current
    /// tick is below this value.
    pub tick_upper_index: i32,
    /// The liquidity provided by this position.
    pub liquidity: u128,
    /// Fee growth of token A inside the range at the last update, in Q64.64.
    pub fee_growth_checkpoint_a: u128,
    /// Fee growth of token B inside the range at the last update, in Q64.64.
    pub fee_growth_checkpoint_b: u128,
    pub fee_owed_a: u128,
    pub fee_owed_b: u128,
    pub reward_infos: [PositionRewardInfo; NUM_REWARDS],
    pub closed: bool,
}

/// Validates a position range against the tick bounds and spacing.
///
/// # Arguments
/// * `tick_lower_index` - The lower tick of the range.
/// * `tick_upper_index` - The upper tick of the range.
/// * `tick_spacing` - The pool's tick spacing.
pub fn validate_tick_range(
    tick_lower_index: i32,
    tick_upper_index: i32,
    tick_spacing: u16,
) -> Result<()> {
    require!(tick_spacing > 0, ErrorCode::InvalidTickSpacing);
    if tick_lower_index >= tick_upper_index {
        return err!(ErrorCode::InvalidTickRange);
    }
    if tick_lower_index < MIN_TICK || tick_upper_index > MAX_TICK {
        return err!(ErrorCode::TickOutOfRange);
    }
    let spacing = i32::from(tick_spacing);
    if tick_lower_index % spacing != 0 || tick_upper_index % spacing != 0 {
        return err!(ErrorCode::InvalidTickIndex);
    }
    Ok(())
}

impl Position {
    /// Opens an empty position over `[tick_lower_index, tick_upper_index)`.
    ///
    /// # Arguments
    /// * `tick_lower_index` - The lower tick of the position's range.
    /// * `tick_upper_index` - The upper tick of the position's range.
    /// * `tick_spacing` - The pool's tick spacing; both ticks must be multiples of it.
    pub fn open(tick_lower_index: i32, tick_upper_index: i32, tick_spacing: u16) -> Result<Self> {
        validate_tick_range(tick_lower_index, tick_upper_index, tick_spacing)?;
        Ok(Self {
            tick_lower_index,
            tick_upper_index,
            ..Self::default()
        })
    }

    pub fn lifecycle(&self) -> PositionLifecycle {
        if self.closed {
            PositionLifecycle::Closed
        } else if self.liquidity == 0 {
            PositionLifecycle::Open
        } else {
            PositionLifecycle::Active
        }
    }

    /// Whether the position's liquidity is active at `tick_current_index`.
    pub fn is_in_range(&self, tick_current_index: i32) -> bool {
        tick_current_index >= self.tick_lower_index && tick_current_index < self.tick_upper_index
    }

    /// Fails with `PositionClosed` once the position has been closed.
    pub fn ensure_not_closed(&self) -> Result<()> {
        require!(!self.closed, ErrorCode::PositionClosed);
        Ok(())
    }

    /// Whether any fee or reward is still owed to the position.
    pub fn has_amounts_owed(&self) -> bool {
        self.fee_owed_a > 0
            || self.fee_owed_b > 0
            || self.reward_infos.iter().any(|reward| reward.amount_owed > 0)
    }

    /// Stores an accrual: owed amounts become the quoted totals and every
    /// checkpoint moves to the growth inside the quote was computed at.
    pub fn apply_accrual(&mut self, quote: &AccrualQuote) {
        self.fee_owed_a = quote.fee_owed_a;
        self.fee_owed_b = quote.fee_owed_b;
        self.fee_growth_checkpoint_a = quote.fee_growth_inside_a;
        self.fee_growth_checkpoint_b = quote.fee_growth_inside_b;
        for (index, info) in self.reward_infos.iter_mut().enumerate() {
            info.growth_inside_checkpoint = quote.reward_growths_inside[index];
            if let Some(owed) = quote.rewards[index] {
                info.amount_owed = owed;
            }
        }
    }

    /// Marks the position closed.
    ///
    /// Rejected while it holds liquidity (`PositionNotEmpty`) or while fees
    /// or rewards are still owed (`PositionFeesNotCollected`).
    pub fn close(&mut self) -> Result<()> {
        self.ensure_not_closed()?;
        if self.liquidity > 0 {
            return err!(ErrorCode::PositionNotEmpty);
        }
        if self.has_amounts_owed() {
            return err!(ErrorCode::PositionFeesNotCollected);
        }
        self.closed = true;
        Ok(())
    }
}
