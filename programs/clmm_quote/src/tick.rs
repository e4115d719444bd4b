use crate::constants::NUM_REWARDS;
use crate::errors::ErrorCode;
use crate::math::add_liquidity_delta;
/// Defines the state and crossing logic of individual ticks.
///
/// The price range is divided into discrete ticks. A position references a
/// lower and an upper tick; each tick records how much liquidity starts or
/// stops there and the fee/reward growth accumulated on its far side.
use anchor_lang::prelude::*;
use bytemuck::{Pod, Zeroable};

/// Global fee and reward growth accumulators of a pool, in Q64.64
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlobalGrowths {
    pub fee_growth_global_a: u128,
    pub fee_growth_global_b: u128,
    pub reward_growths_global: [u128; NUM_REWARDS],
}

/// State of a single tick.
///
/// Plain old data so tick arrays can be decoded zero-copy from account bytes.
/// A tick is initialized exactly when `liquidity_gross` is nonzero.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Tick {
    /// net liquidity added when the price crosses this tick upward   (offset 0)
    pub liquidity_net: i128,
    /// total liquidity of positions referencing this tick             (offset 16)
    pub liquidity_gross: u128,
    /// fee growth of token A on the other side of this tick           (offset 32)
    pub fee_growth_outside_a: u128,
    /// fee growth of token B on the other side of this tick           (offset 48)
    pub fee_growth_outside_b: u128,
    /// reward growth per slot on the other side of this tick          (offset 64)
    pub reward_growths_outside: [u128; NUM_REWARDS],
}

impl Tick {
    /// 16 (liquidity_net) + 16 (liquidity_gross) + 2 * 16 (fee growth) + 3 * 16 (reward growth) = 112 bytes.
    pub const LEN: usize = 112;

    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross != 0
    }

    /// Returns the tick as it is after the price crosses it.
    ///
    /// Every growth-outside value flips to `global - outside`, so the side that
    /// was "outside" becomes the side the price just left.
    ///
    /// # Arguments
    ///
    /// * `globals` - The pool's global growth at the moment of crossing.
    pub fn cross(&self, globals: &GlobalGrowths) -> Tick {
        let mut crossed = *self;
        crossed.fee_growth_outside_a = globals
            .fee_growth_global_a
            .wrapping_sub(self.fee_growth_outside_a);
        crossed.fee_growth_outside_b = globals
            .fee_growth_global_b
            .wrapping_sub(self.fee_growth_outside_b);
        for (outside, global) in crossed
            .reward_growths_outside
            .iter_mut()
            .zip(globals.reward_growths_global.iter())
        {
            *outside = global.wrapping_sub(*outside);
        }
        crossed
    }

    /// Updates the tick's liquidity values when a position referencing this tick changes.
    ///
    /// A tick that becomes initialized while at or below the current tick
    /// starts with all growth assumed to have happened below it, so its
    /// growth-outside values are set to the current globals. A tick whose
    /// gross liquidity returns to zero is cleared.
    ///
    /// # Arguments
    ///
    /// * `tick_index` - The index of this tick.
    /// * `tick_current_index` - The pool's current tick.
    /// * `liquidity_delta` - The change in liquidity. Positive if adding liquidity,
    ///   negative if removing.
    /// * `is_upper_tick` - True if this tick is the upper boundary of the position,
    ///   false if it's the lower boundary.
    /// * `globals` - The pool's global growth.
    pub fn update_on_liquidity_change(
        &mut self,
        tick_index: i32,
        tick_current_index: i32,
        liquidity_delta: i128,
        is_upper_tick: bool,
        globals: &GlobalGrowths,
    ) -> Result<()> {
        let was_initialized = self.is_initialized();

        self.liquidity_gross = add_liquidity_delta(self.liquidity_gross, liquidity_delta)?;
        self.liquidity_net = if is_upper_tick {
            self.liquidity_net.checked_sub(liquidity_delta)
        } else {
            self.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;

        if !self.is_initialized() {
            *self = Tick::default();
        } else if !was_initialized && tick_index <= tick_current_index {
            self.fee_growth_outside_a = globals.fee_growth_global_a;
            self.fee_growth_outside_b = globals.fee_growth_global_b;
            self.reward_growths_outside = globals.reward_growths_global;
        }
        Ok(())
    }
}
