//! Concentrated liquidity quote engine.
//!
//! Pure, deterministic computations over snapshots of pool and tick array
//! state: tick/price conversion, swap simulation across tick boundaries,
//! liquidity quotes for position ranges, and fee/reward accrual. The engine
//! performs no I/O; callers fetch state, pass it in as plain data and receive
//! quotes as plain data.

// Modules for constants, errors, core math, and state definitions
pub mod constants;
pub mod errors;
pub mod math;
pub mod state; // Defines the pool snapshot (state::pool::PoolSnapshot)
pub mod tick; // Defines Tick
pub mod tick_array;

// Quote engines
pub mod fee_accrual;
pub mod liquidity_quote;
pub mod swap;

// Position lifecycle
pub mod position;
pub mod position_bundle;
pub mod position_manager;

pub mod utils;

#[cfg(test)]
pub mod unit_test;

#[cfg(test)]
mod property_based_test;

pub use errors::ErrorCode;
pub use fee_accrual::{accrue, accrue_at, AccrualQuote};
pub use liquidity_quote::{
    decrease_quote, decrease_quote_by_token, increase_quote, DecreaseLiquidityQuote,
    IncreaseLiquidityQuote,
};
pub use position::{Position, PositionLifecycle};
pub use state::{PoolSnapshot, RewardInfo};
pub use swap::{
    simulate_swap, swap_quote_by_input_token, swap_quote_by_output_token, SwapParams, SwapQuote,
};
pub use tick::Tick;
pub use tick_array::{TickArray, TickArraySequence};
