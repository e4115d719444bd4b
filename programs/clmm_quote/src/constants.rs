//! Quote Engine Constants
//!
//! This module defines the fixed architectural bounds of the quote engine: the
//! tick range, the sqrt price range that corresponds to it, the tick array
//! geometry, the number of reward slots and the fee denominators. Per-pool
//! parameters (tick spacing, fee rates) are not constants; they travel with
//! the pool snapshot.

/// The minimum tick index supported by the engine
///
/// At this tick the price is approximately 5.4e-20.
pub const MIN_TICK: i32 = -443636;

/// The maximum tick index supported by the engine
///
/// At this tick the price is approximately 1.8e19.
pub const MAX_TICK: i32 = 443636;

/// Q64.64 representation of 1.0
pub const Q64: u128 = 1u128 << 64;

/// Number of fractional bits in a Q64.64 value
pub const Q64_RESOLUTION: u32 = 64;

/// The square root price at `MIN_TICK`, in Q64.64
///
/// Equal to `tick_to_sqrt_price(MIN_TICK)`; no pool price may go below it.
pub const MIN_SQRT_PRICE: u128 = 4295048016;

/// The square root price at `MAX_TICK`, in Q64.64
///
/// Equal to `tick_to_sqrt_price(MAX_TICK)`; no pool price may go above it.
pub const MAX_SQRT_PRICE: u128 = 79226673515401279963822778343;

/// Number of ticks stored in one tick array
pub const TICK_ARRAY_SIZE: usize = 88;

/// `TICK_ARRAY_SIZE` as a signed tick count
pub const TICK_ARRAY_SIZE_I32: i32 = TICK_ARRAY_SIZE as i32;

/// Number of reward slots carried by pools, ticks and positions
pub const NUM_REWARDS: usize = 3;

/// Denominator for every basis-point quantity (fees and slippage)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Upper bound on a pool's swap fee, 10%
pub const MAX_FEE_RATE: u16 = 1_000;

/// Upper bound on the protocol's share of the swap fee, 25%
pub const MAX_PROTOCOL_FEE_RATE: u16 = 2_500;

/// Upper bound on a slippage tolerance, 100%
pub const MAX_SLIPPAGE_TOLERANCE: u16 = 10_000;

/// Standard fee tiers (in basis points of the input amount)
///
/// Stable fee tier (0.01%), for pegged pairs.
pub const FEE_TIER_STABLE: u16 = 1;

/// Low fee tier (0.05%)
pub const FEE_TIER_LOW: u16 = 5;

/// Medium fee tier (0.3%)
pub const FEE_TIER_MEDIUM: u16 = 30;

/// High fee tier (1%)
pub const FEE_TIER_HIGH: u16 = 100;

/// Tick spacing per fee tier
pub const TICK_SPACING_STABLE: u16 = 1;
pub const TICK_SPACING_LOW: u16 = 8;
pub const TICK_SPACING_MEDIUM: u16 = 64;
pub const TICK_SPACING_HIGH: u16 = 128;

/// Number of positions addressable by one position bundle
pub const POSITION_BUNDLE_SIZE: u16 = 256;

/// Byte length of a position bundle's occupancy bitmap
pub const POSITION_BUNDLE_BITMAP_BYTES: usize = POSITION_BUNDLE_SIZE as usize / 8;
