use crate::constants::*;
use crate::errors::ErrorCode;
use crate::math;
use crate::tick::GlobalGrowths;
use anchor_lang::prelude::*;

/// Emission configuration and accumulated growth of one reward slot.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardInfo {
    /// Mint of the reward token; the default pubkey marks an unused slot.
    pub mint: Pubkey,
    /// Tokens emitted per second, in Q64.64.
    pub emissions_per_second_x64: u128,
    /// Reward growth per unit of liquidity since the slot was configured, in Q64.64.
    pub growth_global_x64: u128,
}

impl RewardInfo {
    pub fn initialized(&self) -> bool {
        self.mint != Pubkey::default()
    }
}

/// Immutable snapshot of a pool's state, as read from the chain.
///
/// The engine treats a snapshot as frozen for the duration of a call; every
/// quote is computed against exactly the values given here.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolSnapshot {
    /// The current square root of the price, in Q64.64 fixed-point format (sqrt(P) * 2^64).
    pub sqrt_price: u128,
    /// The current tick index.
    pub tick_current_index: i32,
    /// The spacing between usable ticks.
    pub tick_spacing: u16,
    /// The total active liquidity within the current tick's price range.
    pub liquidity: u128,
    /// Swap fee in basis points of the input amount (e.g., 30 for 0.3%).
    pub fee_rate: u16,
    /// Protocol share of each swap fee, in basis points of the fee.
    pub protocol_fee_rate: u16,
    /// Fee growth of token A per unit of liquidity, in Q64.64.
    pub fee_growth_global_a: u128,
    /// Fee growth of token B per unit of liquidity, in Q64.64.
    pub fee_growth_global_b: u128,
    /// Unix timestamp at which reward growth was last advanced.
    pub reward_last_updated_timestamp: u64,
    pub reward_infos: [RewardInfo; NUM_REWARDS],
}

/// Parameters for initializing a pool snapshot.
#[derive(Clone, Copy, Debug)]
pub struct InitializePoolParams {
    pub initial_sqrt_price: u128,
    pub tick_spacing: u16,
    pub fee_rate: u16,
    pub protocol_fee_rate: u16,
}

/// Tick spacing of a standard fee tier.
///
/// # Arguments
/// * `fee_rate` - The fee tier in basis points.
///
/// # Returns
/// * `Result<u16>` - The tier's tick spacing, or `InvalidTickSpacing` for an unknown tier.
pub fn tick_spacing_for_fee_rate(fee_rate: u16) -> Result<u16> {
    match fee_rate {
        FEE_TIER_STABLE => Ok(TICK_SPACING_STABLE),
        FEE_TIER_LOW => Ok(TICK_SPACING_LOW),
        FEE_TIER_MEDIUM => Ok(TICK_SPACING_MEDIUM),
        FEE_TIER_HIGH => Ok(TICK_SPACING_HIGH),
        _ => err!(ErrorCode::InvalidTickSpacing),
    }
}

impl PoolSnapshot {
    /// Creates the snapshot of a freshly initialized pool.
    ///
    /// The current tick is derived from the initial sqrt price; liquidity,
    /// fee growth and rewards start at zero.
    ///
    /// # Arguments
    /// * `params` - Initial price, tick spacing and fee rates.
    pub fn initialize(params: InitializePoolParams) -> Result<Self> {
        if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&params.initial_sqrt_price) {
            return err!(ErrorCode::SqrtPriceOutOfBounds);
        }
        if params.tick_spacing == 0 {
            return err!(ErrorCode::InvalidTickSpacing);
        }
        math::validate_fee_rate(params.fee_rate)?;
        require!(
            params.protocol_fee_rate <= MAX_PROTOCOL_FEE_RATE,
            ErrorCode::InvalidFeeRate
        );

        Ok(Self {
            sqrt_price: params.initial_sqrt_price,
            tick_current_index: math::sqrt_price_to_tick(params.initial_sqrt_price)?,
            tick_spacing: params.tick_spacing,
            fee_rate: params.fee_rate,
            protocol_fee_rate: params.protocol_fee_rate,
            ..Self::default()
        })
    }

    /// Checks the snapshot's parameters and that its tick agrees with its price.
    ///
    /// The tick must be the floor tick of the price, or one below it when the
    /// price sits exactly on a tick the pool last crossed downward.
    pub fn validate(&self) -> Result<()> {
        require!(self.tick_spacing > 0, ErrorCode::InvalidTickSpacing);
        math::validate_fee_rate(self.fee_rate)?;
        require!(
            self.protocol_fee_rate <= MAX_PROTOCOL_FEE_RATE,
            ErrorCode::InvalidFeeRate
        );
        require!(
            (MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&self.sqrt_price),
            ErrorCode::SqrtPriceOutOfBounds
        );

        let floor_tick = math::sqrt_price_to_tick(self.sqrt_price)?;
        let consistent = self.tick_current_index == floor_tick
            || (self.tick_current_index == floor_tick - 1
                && math::tick_to_sqrt_price(floor_tick)? == self.sqrt_price);
        require!(consistent, ErrorCode::InvalidPoolState);
        Ok(())
    }

    pub fn reward_growths_global(&self) -> [u128; NUM_REWARDS] {
        let mut growths = [0u128; NUM_REWARDS];
        for (growth, info) in growths.iter_mut().zip(self.reward_infos.iter()) {
            *growth = info.growth_global_x64;
        }
        growths
    }

    pub fn global_growths(&self) -> GlobalGrowths {
        GlobalGrowths {
            fee_growth_global_a: self.fee_growth_global_a,
            fee_growth_global_b: self.fee_growth_global_b,
            reward_growths_global: self.reward_growths_global(),
        }
    }

    /// Returns the snapshot with reward growth advanced to `timestamp`.
    ///
    /// Each initialized slot grows by `elapsed * emissions_per_second_x64 / liquidity`.
    /// With no active liquidity nothing accrues, but the timestamp still moves.
    /// A timestamp at or before the last update leaves the snapshot unchanged.
    pub fn with_rewards_updated(&self, timestamp: u64) -> Result<Self> {
        let mut updated = *self;
        if timestamp <= self.reward_last_updated_timestamp {
            return Ok(updated);
        }

        if self.liquidity > 0 {
            let elapsed = u128::from(timestamp - self.reward_last_updated_timestamp);
            for info in updated.reward_infos.iter_mut() {
                if !info.initialized() {
                    continue;
                }
                let growth_delta =
                    math::mul_div_floor(elapsed, info.emissions_per_second_x64, self.liquidity)?;
                info.growth_global_x64 = info.growth_global_x64.wrapping_add(growth_delta);
            }
            msg!(
                "Reward growth advanced by {}s at liquidity {}",
                elapsed,
                self.liquidity
            );
        }

        updated.reward_last_updated_timestamp = timestamp;
        Ok(updated)
    }
}
