use super::{empty_tick_arrays, pool_at_price_one, set_tick_liquidity};
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::liquidity_quote::increase_quote_by_liquidity;
use crate::position::*;
use crate::position_manager::*;
use crate::state::PoolSnapshot;
use crate::tick_array::{find_tick, TickArray};

#[cfg(test)]
mod position_tests {
    use super::*;

    const SPACING: u16 = 64;

    /// Fixture for position tests: an empty pool at price 1.0 and the two
    /// tick arrays around tick 0.
    struct PositionTestFixture {
        pool: PoolSnapshot,
        tick_arrays: Vec<TickArray>,
    }

    fn setup_fixture() -> PositionTestFixture {
        PositionTestFixture {
            pool: pool_at_price_one(0, SPACING, 30, 0),
            tick_arrays: empty_tick_arrays(&[-5632, 0], SPACING),
        }
    }

    mod range_tests {
        use super::*;

        #[test]
        fn test_open_position() -> anchor_lang::Result<()> {
            let position = Position::open(-128, 128, SPACING)?;

            assert_eq!(position.tick_lower_index, -128);
            assert_eq!(position.tick_upper_index, 128);
            assert_eq!(position.liquidity, 0);
            assert_eq!(position.lifecycle(), PositionLifecycle::Open);
            assert!(position.is_in_range(0));
            assert!(position.is_in_range(-128));
            assert!(!position.is_in_range(128));
            Ok(())
        }

        #[test]
        fn test_invalid_ranges() {
            let result = Position::open(128, -128, SPACING);
            assert_eq!(result.err().unwrap(), ErrorCode::InvalidTickRange.into());

            let result = Position::open(128, 128, SPACING);
            assert_eq!(result.err().unwrap(), ErrorCode::InvalidTickRange.into());

            let result = Position::open(-443_648, 0, SPACING);
            assert_eq!(result.err().unwrap(), ErrorCode::TickOutOfRange.into());

            let result = Position::open(-100, 128, SPACING);
            assert_eq!(result.err().unwrap(), ErrorCode::InvalidTickIndex.into());

            let result = Position::open(-128, 128, 0);
            assert_eq!(result.err().unwrap(), ErrorCode::InvalidTickSpacing.into());
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn test_full_lifecycle() -> anchor_lang::Result<()> {
            let PositionTestFixture {
                mut pool,
                mut tick_arrays,
            } = setup_fixture();
            let mut position = open_position(&pool, -1024, 1024)?;

            let deposited =
                increase_liquidity(&mut pool, &mut tick_arrays, &mut position, 1_000_000)?;
            let quote = increase_quote_by_liquidity(1_000_000, Q64, 0, -1024, 1024, 0)?;
            assert_eq!(deposited, (quote.token_est_a, quote.token_est_b));
            assert_eq!(deposited, (49_909, 49_909));
            assert_eq!(position.lifecycle(), PositionLifecycle::Active);
            assert_eq!(pool.liquidity, 1_000_000);

            let lower = find_tick(&tick_arrays, -1024, SPACING)?;
            let upper = find_tick(&tick_arrays, 1024, SPACING)?;
            assert_eq!(lower.liquidity_net, 1_000_000);
            assert_eq!(upper.liquidity_net, -1_000_000);
            assert_eq!(upper.liquidity_gross, 1_000_000);

            // Swaps inside the range earn 5 A per unit of liquidity
            pool.fee_growth_global_a += 5 << 64;
            let accrual = update_fees_and_rewards(&pool, &tick_arrays, &mut position)?;
            assert_eq!(accrual.fee_owed_a, 5_000_000);
            assert_eq!(position.fee_owed_a, 5_000_000);

            let result = close_position(&mut position);
            assert_eq!(result.err().unwrap(), ErrorCode::PositionNotEmpty.into());

            let withdrawn =
                decrease_liquidity(&mut pool, &mut tick_arrays, &mut position, 1_000_000)?;
            assert_eq!(withdrawn, (49_908, 49_908));
            assert_eq!(pool.liquidity, 0);
            assert!(!find_tick(&tick_arrays, -1024, SPACING)?.is_initialized());
            assert!(!find_tick(&tick_arrays, 1024, SPACING)?.is_initialized());
            // Clearing the ticks does not lose what was owed
            assert_eq!(position.fee_owed_a, 5_000_000);

            let result = close_position(&mut position);
            assert_eq!(result.err().unwrap(), ErrorCode::PositionFeesNotCollected.into());

            assert_eq!(collect_fees(&mut position)?, (5_000_000, 0));
            close_position(&mut position)?;
            assert_eq!(position.lifecycle(), PositionLifecycle::Closed);

            let result = increase_liquidity(&mut pool, &mut tick_arrays, &mut position, 1);
            assert_eq!(result.err().unwrap(), ErrorCode::PositionClosed.into());
            Ok(())
        }

        #[test]
        fn test_close_with_leftover_liquidity() -> anchor_lang::Result<()> {
            let PositionTestFixture {
                mut pool,
                mut tick_arrays,
            } = setup_fixture();
            let mut position = open_position(&pool, -1024, 1024)?;
            increase_liquidity(&mut pool, &mut tick_arrays, &mut position, 1_000_000)?;

            decrease_liquidity(&mut pool, &mut tick_arrays, &mut position, 999_999)?;
            assert_eq!(position.liquidity, 1);

            let result = close_position(&mut position);
            assert_eq!(result.err().unwrap(), ErrorCode::PositionNotEmpty.into());
            assert_eq!(position.lifecycle(), PositionLifecycle::Active);
            Ok(())
        }

        #[test]
        fn test_out_of_range_position_leaves_pool_liquidity() -> anchor_lang::Result<()> {
            let PositionTestFixture {
                mut pool,
                mut tick_arrays,
            } = setup_fixture();
            pool.fee_growth_global_a = 9 << 64;
            let mut position = open_position(&pool, 1024, 2048)?;

            let deposited =
                increase_liquidity(&mut pool, &mut tick_arrays, &mut position, 1_000_000)?;

            assert_eq!(deposited, (47_419, 0));
            assert_eq!(pool.liquidity, 0);
            // Ticks above the price start with no growth outside
            let lower = find_tick(&tick_arrays, 1024, SPACING)?;
            assert_eq!(lower.fee_growth_outside_a, 0);

            let accrual = update_fees_and_rewards(&pool, &tick_arrays, &mut position)?;
            assert_eq!(accrual.fee_owed_a, 0);
            Ok(())
        }

        #[test]
        fn test_late_position_does_not_earn_past_fees() -> anchor_lang::Result<()> {
            let PositionTestFixture {
                mut pool,
                mut tick_arrays,
            } = setup_fixture();
            pool.fee_growth_global_a = 9 << 64;
            let mut position = open_position(&pool, -1024, 1024)?;

            increase_liquidity(&mut pool, &mut tick_arrays, &mut position, 1_000)?;

            let lower = find_tick(&tick_arrays, -1024, SPACING)?;
            assert_eq!(lower.fee_growth_outside_a, 9 << 64);
            let accrual = update_fees_and_rewards(&pool, &tick_arrays, &mut position)?;
            assert_eq!(accrual.fee_owed_a, 0);
            Ok(())
        }
    }

    mod manager_validation_tests {
        use super::*;

        #[test]
        fn test_liquidity_change_errors() -> anchor_lang::Result<()> {
            let PositionTestFixture {
                mut pool,
                mut tick_arrays,
            } = setup_fixture();
            let mut position = open_position(&pool, -1024, 1024)?;

            let result = increase_liquidity(&mut pool, &mut tick_arrays, &mut position, 0);
            assert_eq!(result.err().unwrap(), ErrorCode::ZeroLiquidityDelta.into());

            increase_liquidity(&mut pool, &mut tick_arrays, &mut position, 10)?;
            let result = decrease_liquidity(&mut pool, &mut tick_arrays, &mut position, 11);
            assert_eq!(result.err().unwrap(), ErrorCode::PositionLiquidityTooLow.into());
            Ok(())
        }

        #[test]
        fn test_failed_increase_leaves_state_untouched() -> anchor_lang::Result<()> {
            let PositionTestFixture {
                mut pool,
                mut tick_arrays,
            } = setup_fixture();
            let mut position = open_position(&pool, -640, 640)?;
            increase_liquidity(&mut pool, &mut tick_arrays, &mut position, 10)?;
            pool.fee_growth_global_a = 3 << 64;

            // The ticks accept the change but the pool liquidity overflows
            pool.liquidity = u128::MAX - 5;
            let (pool_before, position_before) = (pool, position);
            let lower_before = find_tick(&tick_arrays, -640, SPACING)?;
            let upper_before = find_tick(&tick_arrays, 640, SPACING)?;

            let result = increase_liquidity(&mut pool, &mut tick_arrays, &mut position, 10);
            assert_eq!(result.err().unwrap(), ErrorCode::ArithmeticOverflow.into());
            assert_eq!(pool, pool_before);
            assert_eq!(position, position_before);
            assert_eq!(position.fee_owed_a, 0);
            assert_eq!(find_tick(&tick_arrays, -640, SPACING)?, lower_before);
            assert_eq!(find_tick(&tick_arrays, 640, SPACING)?, upper_before);
            Ok(())
        }

        #[test]
        fn test_failed_upper_tick_update_keeps_lower_tick() -> anchor_lang::Result<()> {
            let PositionTestFixture {
                mut pool,
                mut tick_arrays,
            } = setup_fixture();
            let mut position = open_position(&pool, -640, 640)?;
            set_tick_liquidity(&mut tick_arrays, 640, SPACING, 0, u128::MAX - 5);
            let lower_before = find_tick(&tick_arrays, -640, SPACING)?;
            let upper_before = find_tick(&tick_arrays, 640, SPACING)?;

            let result = increase_liquidity(&mut pool, &mut tick_arrays, &mut position, 10);
            assert_eq!(result.err().unwrap(), ErrorCode::ArithmeticOverflow.into());
            assert_eq!(find_tick(&tick_arrays, -640, SPACING)?, lower_before);
            assert!(!find_tick(&tick_arrays, -640, SPACING)?.is_initialized());
            assert_eq!(find_tick(&tick_arrays, 640, SPACING)?, upper_before);
            assert_eq!(position.liquidity, 0);
            assert_eq!(pool.liquidity, 0);
            Ok(())
        }

        #[test]
        fn test_decrease_on_closed_position() -> anchor_lang::Result<()> {
            let PositionTestFixture {
                mut pool,
                mut tick_arrays,
            } = setup_fixture();
            let mut position = open_position(&pool, -1024, 1024)?;
            close_position(&mut position)?;

            // Closure is reported ahead of the liquidity shortfall
            let result = decrease_liquidity(&mut pool, &mut tick_arrays, &mut position, 1);
            assert_eq!(result.err().unwrap(), ErrorCode::PositionClosed.into());
            Ok(())
        }

        #[test]
        fn test_missing_tick_array() -> anchor_lang::Result<()> {
            let mut pool = pool_at_price_one(0, SPACING, 30, 0);
            let mut tick_arrays = empty_tick_arrays(&[0], SPACING);
            let mut position = open_position(&pool, -1024, 1024)?;

            let result = increase_liquidity(&mut pool, &mut tick_arrays, &mut position, 10);
            assert_eq!(result.err().unwrap(), ErrorCode::MissingTickArray.into());
            assert_eq!(position.liquidity, 0);
            Ok(())
        }

        #[test]
        fn test_collect_unconfigured_reward() -> anchor_lang::Result<()> {
            let pool = pool_at_price_one(0, SPACING, 30, 0);
            let mut position = open_position(&pool, -1024, 1024)?;

            let result = collect_reward(&pool, &mut position, 0);
            assert_eq!(result.err().unwrap(), ErrorCode::RewardNotInitialized.into());

            let result = collect_reward(&pool, &mut position, NUM_REWARDS);
            assert_eq!(result.err().unwrap(), ErrorCode::InvalidRewardIndex.into());
            Ok(())
        }

        #[test]
        fn test_close_twice() -> anchor_lang::Result<()> {
            let pool = pool_at_price_one(0, SPACING, 30, 0);
            let mut position = open_position(&pool, -1024, 1024)?;

            close_position(&mut position)?;
            let result = close_position(&mut position);
            assert_eq!(result.err().unwrap(), ErrorCode::PositionClosed.into());
            Ok(())
        }
    }
}
