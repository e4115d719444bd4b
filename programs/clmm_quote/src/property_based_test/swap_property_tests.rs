//! Property-based tests for swap simulation

use crate::errors::ErrorCode;
use crate::math::{fee_growth_delta, mul_div_floor};
use crate::swap::*;
use crate::unit_test::{crossing_pool, empty_tick_arrays, pool_at_price_one};
use proptest::prelude::*;

mod strategies {
    use super::*;

    /// Liquidity deep enough that small swaps stay far from the array edges
    pub fn deep_liquidity() -> impl Strategy<Value = u128> {
        1_000_000_000_000u128..1_000_000_000_000_000
    }

    pub fn amount() -> impl Strategy<Value = u128> {
        1u128..1_000_000_000
    }

    pub fn protocol_fee_rate() -> impl Strategy<Value = u16> {
        0u16..=2_500
    }
}

fn exact_in(amount: u128, input_is_a: bool) -> SwapParams {
    SwapParams {
        amount,
        input_is_a,
        amount_specified_is_input: true,
        sqrt_price_limit: 0,
        slippage_tolerance_bps: 100,
    }
}

proptest! {
    #[test]
    fn test_fee_growth_accounts_for_lp_fee(
        liquidity in strategies::deep_liquidity(),
        amount in strategies::amount(),
        protocol_fee_rate in strategies::protocol_fee_rate(),
        input_is_a in any::<bool>(),
    ) {
        let pool = pool_at_price_one(liquidity, 64, 30, protocol_fee_rate);
        let tick_arrays = empty_tick_arrays(&[-5632, 0, 5632], 64);

        let quote = simulate_swap(&pool, &tick_arrays, exact_in(amount, input_is_a)).unwrap();

        // No tick is crossed, so the whole swap is a single step
        let expected_protocol_fee =
            mul_div_floor(quote.fee_amount, u128::from(protocol_fee_rate), 10_000).unwrap();
        prop_assert_eq!(quote.protocol_fee_amount, expected_protocol_fee);
        prop_assert_eq!(
            quote.next_fee_growth_global,
            fee_growth_delta(quote.fee_amount - quote.protocol_fee_amount, liquidity).unwrap()
        );
        prop_assert_eq!(quote.amount_in, amount);
        prop_assert!(quote.fee_amount <= quote.amount_in);
    }

    #[test]
    fn test_price_moves_in_trade_direction(
        liquidity in strategies::deep_liquidity(),
        amount in strategies::amount(),
        input_is_a in any::<bool>(),
        specified_input in any::<bool>(),
    ) {
        let pool = pool_at_price_one(liquidity, 64, 30, 0);
        let tick_arrays = empty_tick_arrays(&[-5632, 0, 5632], 64);
        let params = SwapParams {
            amount_specified_is_input: specified_input,
            ..exact_in(amount, input_is_a)
        };

        let quote = simulate_swap(&pool, &tick_arrays, params).unwrap();

        if input_is_a {
            prop_assert!(quote.next_sqrt_price <= pool.sqrt_price);
        } else {
            prop_assert!(quote.next_sqrt_price >= pool.sqrt_price);
        }
        if specified_input {
            prop_assert_eq!(quote.amount_in, amount);
            prop_assert!(quote.other_amount_threshold <= quote.amount_out);
        } else {
            prop_assert_eq!(quote.amount_out, amount);
            prop_assert!(quote.other_amount_threshold >= quote.amount_in);
        }
        // Around price 1.0 the fee makes every trade a loss for the trader
        prop_assert!(quote.amount_out <= quote.amount_in);
    }

    #[test]
    fn test_larger_input_never_pays_out_less(
        liquidity in strategies::deep_liquidity(),
        amount in strategies::amount(),
        extra in 0u128..1_000_000,
        input_is_a in any::<bool>(),
    ) {
        let pool = pool_at_price_one(liquidity, 64, 30, 0);
        let tick_arrays = empty_tick_arrays(&[-5632, 0, 5632], 64);

        let smaller = simulate_swap(&pool, &tick_arrays, exact_in(amount, input_is_a)).unwrap();
        let larger = simulate_swap(&pool, &tick_arrays, exact_in(amount + extra, input_is_a)).unwrap();

        prop_assert!(larger.amount_out >= smaller.amount_out);
    }

    #[test]
    fn test_crossings_keep_liquidity_consistent(amount in 1u128..3_000_000) {
        let (pool, tick_arrays) = crossing_pool();

        match simulate_swap(&pool, &tick_arrays, exact_in(amount, true)) {
            Ok(quote) => {
                let mut liquidity = pool.liquidity as i128;
                let mut previous = i32::MAX;
                for crossed in &quote.crossed_ticks {
                    prop_assert!(crossed.tick_index < previous);
                    prop_assert!(crossed.tick_index > quote.next_tick_index);
                    liquidity -= crossed.tick.liquidity_net;
                    previous = crossed.tick_index;
                }
                prop_assert_eq!(liquidity as u128, quote.next_liquidity);
                prop_assert!(quote.next_sqrt_price <= pool.sqrt_price);
            }
            Err(error) => {
                let expected: anchor_lang::error::Error = ErrorCode::TickArraySequenceInvalid.into();
                prop_assert_eq!(error, expected);
            }
        }
    }
}
