#![no_main]

use arbitrary::Arbitrary;
use clmm_quote::constants::{MAX_TICK, MIN_TICK};
use clmm_quote::math::{sqrt_price_to_tick, tick_to_sqrt_price};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct TickPriceInput {
    tick: i32,
    sqrt_price_offset: u64,
}

// Converts a tick to its sqrt price and back, then nudges the price upward
// and checks that the floor tick never moves past the next tick.
fuzz_target!(|input: TickPriceInput| {
    let tick = input.tick.clamp(MIN_TICK, MAX_TICK);
    let Ok(sqrt_price) = tick_to_sqrt_price(tick) else {
        panic!("valid tick {tick} rejected");
    };
    assert_eq!(sqrt_price_to_tick(sqrt_price).ok(), Some(tick));

    if tick < MAX_TICK {
        let next = tick_to_sqrt_price(tick + 1).unwrap_or(u128::MAX);
        let nudged = sqrt_price.saturating_add(u128::from(input.sqrt_price_offset)) % next;
        if nudged >= sqrt_price {
            assert_eq!(sqrt_price_to_tick(nudged).ok(), Some(tick));
        }
    }
});
