//! Property-based tests for the math module
//!
//! These check that the fixed-point conversions and rounding helpers keep
//! their invariants across the whole tick range and across arbitrary amounts.

use crate::constants::*;
use crate::math::*;
use proptest::prelude::*;

/// Defines strategies for generating valid inputs for testing
mod strategies {
    use super::*;

    /// Any valid tick index
    pub fn tick_index() -> impl Strategy<Value = i32> {
        MIN_TICK..=MAX_TICK
    }

    /// Any valid sqrt price
    pub fn sqrt_price() -> impl Strategy<Value = u128> {
        MIN_SQRT_PRICE..=MAX_SQRT_PRICE
    }

    /// Non-zero liquidity that keeps token amounts well inside 128 bits
    pub fn liquidity() -> impl Strategy<Value = u128> {
        1..=u128::from(u64::MAX)
    }

    /// Token amounts
    pub fn amount() -> impl Strategy<Value = u128> {
        0..=u128::from(u64::MAX)
    }

    pub fn fee_rate() -> impl Strategy<Value = u16> {
        0..=MAX_FEE_RATE
    }

    pub fn slippage() -> impl Strategy<Value = u16> {
        0..=MAX_SLIPPAGE_TOLERANCE
    }

    /// Two distinct ticks in a band where liquidity fits comfortably
    pub fn tick_range() -> impl Strategy<Value = (i32, i32)> {
        (-100_000i32..100_000, 1i32..50_000).prop_map(|(lower, width)| (lower, lower + width))
    }
}

proptest! {
    #[test]
    fn test_tick_round_trip(tick in strategies::tick_index()) {
        let sqrt_price = tick_to_sqrt_price(tick).unwrap();
        prop_assert_eq!(sqrt_price_to_tick(sqrt_price).unwrap(), tick);
    }

    #[test]
    fn test_tick_to_sqrt_price_is_strictly_increasing(tick in MIN_TICK..MAX_TICK) {
        prop_assert!(tick_to_sqrt_price(tick).unwrap() < tick_to_sqrt_price(tick + 1).unwrap());
    }

    #[test]
    fn test_sqrt_price_to_tick_is_floor(sqrt_price in strategies::sqrt_price()) {
        let tick = sqrt_price_to_tick(sqrt_price).unwrap();
        prop_assert!(tick_to_sqrt_price(tick).unwrap() <= sqrt_price);
        if tick < MAX_TICK {
            prop_assert!(tick_to_sqrt_price(tick + 1).unwrap() > sqrt_price);
        }
    }

    #[test]
    fn test_amount_delta_rounding_differs_by_at_most_one(
        (lower, upper) in strategies::tick_range(),
        liquidity in strategies::liquidity(),
    ) {
        let sqrt_price_lower = tick_to_sqrt_price(lower).unwrap();
        let sqrt_price_upper = tick_to_sqrt_price(upper).unwrap();

        let a_up = get_amount_delta_a(sqrt_price_lower, sqrt_price_upper, liquidity, true).unwrap();
        let a_down = get_amount_delta_a(sqrt_price_lower, sqrt_price_upper, liquidity, false).unwrap();
        prop_assert!(a_up - a_down <= 1);

        let b_up = get_amount_delta_b(sqrt_price_lower, sqrt_price_upper, liquidity, true).unwrap();
        let b_down = get_amount_delta_b(sqrt_price_lower, sqrt_price_upper, liquidity, false).unwrap();
        prop_assert!(b_up - b_down <= 1);
    }

    #[test]
    fn test_liquidity_from_amount_never_needs_more_than_amount(
        (lower, upper) in strategies::tick_range(),
        amount in strategies::amount(),
    ) {
        let sqrt_price_lower = tick_to_sqrt_price(lower).unwrap();
        let sqrt_price_upper = tick_to_sqrt_price(upper).unwrap();

        let liquidity = get_liquidity_from_a(amount, sqrt_price_lower, sqrt_price_upper).unwrap();
        let needed = get_amount_delta_a(sqrt_price_lower, sqrt_price_upper, liquidity, true).unwrap();
        prop_assert!(needed <= amount);

        let liquidity = get_liquidity_from_b(amount, sqrt_price_lower, sqrt_price_upper).unwrap();
        let needed = get_amount_delta_b(sqrt_price_lower, sqrt_price_upper, liquidity, true).unwrap();
        prop_assert!(needed <= amount);
    }

    #[test]
    fn test_next_sqrt_price_moves_in_trade_direction(
        tick in -100_000i32..100_000,
        liquidity in 1_000_000u128..=u128::from(u64::MAX),
        amount in 1u128..1_000_000,
    ) {
        let sqrt_price = tick_to_sqrt_price(tick).unwrap();

        // A in lowers the price, B in raises it
        prop_assert!(get_next_sqrt_price_from_a_round_up(sqrt_price, liquidity, amount, true).unwrap() <= sqrt_price);
        prop_assert!(get_next_sqrt_price_from_b_round_down(sqrt_price, liquidity, amount, true).unwrap() >= sqrt_price);
    }

    #[test]
    fn test_swap_fee_round_trip(amount in strategies::amount(), fee_rate in strategies::fee_rate()) {
        let net = apply_swap_fee(amount, fee_rate).unwrap();
        prop_assert!(net <= amount);
        prop_assert!(reverse_apply_swap_fee(net, fee_rate).unwrap() <= amount);

        let gross = reverse_apply_swap_fee(amount, fee_rate).unwrap();
        prop_assert!(gross >= amount);
        prop_assert!(apply_swap_fee(gross, fee_rate).unwrap() >= amount);
    }

    #[test]
    fn test_slippage_bounds_enclose_amount(amount in strategies::amount(), slippage in strategies::slippage()) {
        let min = min_amount_with_slippage(amount, slippage).unwrap();
        let max = max_amount_with_slippage(amount, slippage).unwrap();
        prop_assert!(min <= amount);
        prop_assert!(max >= amount);
    }
}
