//! Unit tests, one file per engine, plus fixtures shared between them.
use crate::constants::*;
use crate::math::tick_to_sqrt_price;
use crate::state::PoolSnapshot;
use crate::tick_array::{find_tick_mut, TickArray};

mod position_test;

/// Pool at price 1.0 (tick 0) with the given liquidity and fees.
pub(crate) fn pool_at_price_one(
    liquidity: u128,
    tick_spacing: u16,
    fee_rate: u16,
    protocol_fee_rate: u16,
) -> PoolSnapshot {
    PoolSnapshot {
        sqrt_price: Q64,
        tick_current_index: 0,
        tick_spacing,
        liquidity,
        fee_rate,
        protocol_fee_rate,
        ..PoolSnapshot::default()
    }
}

/// Pool whose price sits exactly on `tick`.
pub(crate) fn pool_at_tick(tick: i32, liquidity: u128, tick_spacing: u16) -> PoolSnapshot {
    PoolSnapshot {
        sqrt_price: tick_to_sqrt_price(tick).unwrap(),
        tick_current_index: tick,
        ..pool_at_price_one(liquidity, tick_spacing, 30, 0)
    }
}

/// Empty tick arrays starting at each of `starts`.
pub(crate) fn empty_tick_arrays(starts: &[i32], tick_spacing: u16) -> Vec<TickArray> {
    starts
        .iter()
        .map(|start| TickArray::new(*start, tick_spacing).unwrap())
        .collect()
}

/// Writes liquidity into a tick, leaving its growth-outside values at zero.
pub(crate) fn set_tick_liquidity(
    tick_arrays: &mut [TickArray],
    tick_index: i32,
    tick_spacing: u16,
    liquidity_net: i128,
    liquidity_gross: u128,
) {
    let tick = find_tick_mut(tick_arrays, tick_index, tick_spacing).unwrap();
    tick.liquidity_net = liquidity_net;
    tick.liquidity_gross = liquidity_gross;
}

/// Pool with two nested ranges around price 1.0, spacing 64:
/// 3M over [-1280, 1280) and 5M over [-640, 640), so 8M is active at tick 0.
pub(crate) fn crossing_pool() -> (PoolSnapshot, Vec<TickArray>) {
    let spacing = 64;
    let pool = pool_at_price_one(8_000_000, spacing, 30, 1_000);
    let mut tick_arrays = empty_tick_arrays(&[-5632, 0], spacing);
    set_tick_liquidity(&mut tick_arrays, -1280, spacing, 3_000_000, 3_000_000);
    set_tick_liquidity(&mut tick_arrays, -640, spacing, 5_000_000, 5_000_000);
    set_tick_liquidity(&mut tick_arrays, 640, spacing, -5_000_000, 5_000_000);
    set_tick_liquidity(&mut tick_arrays, 1280, spacing, -3_000_000, 3_000_000);
    (pool, tick_arrays)
}

#[cfg(test)]
mod fixture_tests {
    use super::*;

    #[test]
    fn test_fixture_pools_are_consistent() {
        assert!(pool_at_price_one(1, 64, 30, 0).validate().is_ok());
        assert!(pool_at_tick(-1024, 1, 64).validate().is_ok());
        assert!(crossing_pool().0.validate().is_ok());
        assert_eq!(TICK_ARRAY_SIZE, 88);
    }
}
