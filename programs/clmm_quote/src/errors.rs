//! Quote Engine Error Definitions
//!
//! Every failure the engine can report is one variant of [`ErrorCode`]. Errors
//! are returned as `anchor_lang::Result` values; the engine does not panic on
//! representable input, and fixed-point overflow is always reported as
//! `ArithmeticOverflow` rather than wrapped or saturated.
use anchor_lang::prelude::*;

/// Error codes for the quote engine
#[error_code]
pub enum ErrorCode {
    /// Returned when a tick index or sqrt price lies outside the supported range
    ///
    /// The tick range is `[MIN_TICK, MAX_TICK]`; the sqrt price range is
    /// `[MIN_SQRT_PRICE, MAX_SQRT_PRICE]`.
    #[msg("Tick index or sqrt price is outside the supported range")]
    TickOutOfRange,

    /// Returned when a position's lower tick is not strictly below its upper tick
    #[msg("The provided tick range is invalid")]
    InvalidTickRange,

    /// Returned when a tick index is not a multiple of the pool's tick spacing
    #[msg("Tick index is not aligned to the tick spacing")]
    InvalidTickIndex,

    /// Returned when a tick spacing of zero is supplied, or a fee rate has no tier
    #[msg("Invalid tick spacing")]
    InvalidTickSpacing,

    /// Returned when a lookup or scan needs a tick that no supplied tick array covers
    #[msg("No supplied tick array covers the requested tick")]
    MissingTickArray,

    /// Returned when the supplied tick arrays cannot carry a swap to completion
    ///
    /// This occurs when:
    /// - No tick arrays were supplied
    /// - The arrays are not contiguous or not aligned to the tick spacing
    /// - The swap walks past the last supplied array
    #[msg("Tick array sequence is invalid or insufficient for this swap")]
    TickArraySequenceInvalid,

    /// Returned when a tick array's start index is not a multiple of its span
    #[msg("Tick array start index is not aligned")]
    InvalidTickArrayStart,

    /// Returned when raw tick array bytes have the wrong length
    #[msg("Tick array data is malformed")]
    InvalidTickArrayData,

    /// Returned when a 128/256/512-bit computation overflows its result type
    #[msg("Arithmetic overflow in fixed-point math")]
    ArithmeticOverflow,

    /// Returned when a price move would need more liquidity than is available
    #[msg("Insufficient liquidity available")]
    InsufficientLiquidity,

    /// Returned when a swap is requested for an amount of zero
    #[msg("Swap amount must be greater than zero")]
    ZeroTradableAmount,

    /// Returned when the sqrt price limit is not on the trade side of the current price
    #[msg("Sqrt price limit is on the wrong side of the current price")]
    InvalidSqrtPriceLimitDirection,

    /// Returned when a sqrt price falls outside `[MIN_SQRT_PRICE, MAX_SQRT_PRICE]`
    #[msg("Sqrt price is out of bounds")]
    SqrtPriceOutOfBounds,

    /// Returned when a fee rate or protocol fee rate exceeds its maximum
    #[msg("Fee rate exceeds the maximum allowed")]
    InvalidFeeRate,

    /// Returned when a slippage tolerance exceeds 10 000 basis points
    #[msg("Slippage tolerance exceeds 100%")]
    InvalidSlippageTolerance,

    /// Returned when a pool snapshot's tick index disagrees with its sqrt price
    #[msg("Pool snapshot is inconsistent")]
    InvalidPoolState,

    /// Returned when a liquidity change of zero is requested
    #[msg("Liquidity delta must be greater than zero")]
    ZeroLiquidityDelta,

    /// Returned when a decrease asks for more liquidity than the position holds
    #[msg("Position liquidity is lower than the requested decrease")]
    PositionLiquidityTooLow,

    /// Returned when closing a position that still holds liquidity
    #[msg("Position still holds liquidity")]
    PositionNotEmpty,

    /// Returned when closing a position with fees or rewards still owed
    #[msg("Position has uncollected fees or rewards")]
    PositionFeesNotCollected,

    /// Returned when operating on a position that has already been closed
    #[msg("Position is closed")]
    PositionClosed,

    /// Returned when reading a reward slot that has no reward configured
    #[msg("Reward slot is not initialized")]
    RewardNotInitialized,

    /// Returned when a reward index is not below `NUM_REWARDS`
    #[msg("Reward index is out of range")]
    InvalidRewardIndex,

    /// Returned when a bundle index is not below `POSITION_BUNDLE_SIZE`
    #[msg("Bundle index is out of range")]
    InvalidBundleIndex,

    /// Returned when opening a bundle slot that is already occupied
    #[msg("Bundled position is already opened")]
    BundledPositionAlreadyOpened,

    /// Returned when closing a bundle slot that is not occupied
    #[msg("Bundled position is already closed")]
    BundledPositionAlreadyClosed,
}
