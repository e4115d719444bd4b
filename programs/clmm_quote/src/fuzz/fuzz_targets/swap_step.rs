#![no_main]

use arbitrary::Arbitrary;
use clmm_quote::constants::{MAX_FEE_RATE, MAX_TICK, MIN_TICK};
use clmm_quote::math::tick_to_sqrt_price;
use clmm_quote::swap::compute_swap_step;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct SwapStepInput {
    amount_remaining: u64,
    fee_rate: u16,
    liquidity: u64,
    tick_current: i32,
    tick_target: i32,
    specified_input: bool,
}

// Runs a single swap step between two valid prices and checks that it never
// overshoots the target or the amount it was given.
fuzz_target!(|input: SwapStepInput| {
    let fee_rate = input.fee_rate % (MAX_FEE_RATE + 1);
    let tick_current = input.tick_current.clamp(MIN_TICK, MAX_TICK);
    let tick_target = input.tick_target.clamp(MIN_TICK, MAX_TICK);
    let (Ok(current), Ok(target)) = (
        tick_to_sqrt_price(tick_current),
        tick_to_sqrt_price(tick_target),
    ) else {
        return;
    };
    let a_to_b = target <= current;
    let amount_remaining = u128::from(input.amount_remaining);

    let Ok(step) = compute_swap_step(
        amount_remaining,
        fee_rate,
        u128::from(input.liquidity),
        current,
        target,
        a_to_b,
        input.specified_input,
    ) else {
        return;
    };

    if a_to_b {
        assert!(step.next_sqrt_price <= current && step.next_sqrt_price >= target);
    } else {
        assert!(step.next_sqrt_price >= current && step.next_sqrt_price <= target);
    }
    if input.specified_input {
        assert!(step.amount_in + step.fee_amount <= amount_remaining);
    } else {
        assert!(step.amount_out <= amount_remaining);
    }
});
