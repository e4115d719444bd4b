/// Price Range Utility Module
///
/// This module converts between human-readable prices (token B per token A,
/// adjusted for each mint's decimals) and the engine's sqrt prices and tick
/// indices, and builds position ranges aligned to a pool's tick spacing.
/// Floating-point prices are for display and range selection only; quotes are
/// always computed from the fixed-point values.
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::math;
use anchor_lang::prelude::*;

/// 2^64 as f64
const Q64_F64: f64 = 18_446_744_073_709_551_616.0;

/// Enum defining standard price range presets for liquidity positions
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub enum PriceRangePreset {
    /// Narrow range - ±5% around current price
    Narrow,

    /// Medium range - ±15% around current price
    Medium,

    /// Wide range - ±50% around current price
    Wide,

    /// Every initializable tick of the pool
    FullRange,
}

/// A position range expressed both as prices and as initializable ticks.
#[derive(Clone, Debug, PartialEq, AnchorSerialize, AnchorDeserialize)]
pub struct PriceRange {
    /// Lower price bound, at `lower_tick`
    pub lower_price: f64,

    /// Upper price bound, at `upper_tick`
    pub upper_price: f64,

    /// Lower tick index, a multiple of the tick spacing
    pub lower_tick: i32,

    /// Upper tick index, a multiple of the tick spacing
    pub upper_tick: i32,
}

impl PriceRange {
    /// Creates a range from explicit price bounds.
    ///
    /// The lower bound rounds down and the upper bound rounds up to the nearest
    /// initializable tick, so the range always contains the requested prices.
    /// Prices that align to the same tick widen to one tick spacing above it.
    ///
    /// # Arguments
    /// * `lower_price`, `upper_price` - Decimal-adjusted price bounds
    /// * `decimals_a`, `decimals_b` - Mint decimals of token A and token B
    /// * `tick_spacing` - The pool's tick spacing
    pub fn new_from_prices(
        lower_price: f64,
        upper_price: f64,
        decimals_a: u8,
        decimals_b: u8,
        tick_spacing: u16,
    ) -> Result<Self> {
        if lower_price >= upper_price {
            return err!(ErrorCode::InvalidTickRange);
        }
        let lower_tick = get_initializable_tick_index(
            price_to_tick_index(lower_price, decimals_a, decimals_b)?,
            tick_spacing,
            Some(false),
        )?;
        let upper_tick = get_initializable_tick_index(
            price_to_tick_index(upper_price, decimals_a, decimals_b)?,
            tick_spacing,
            Some(true),
        )?;
        // Prices inside one tick spacing still get a one-spacing range
        let (lower_tick, upper_tick) = if lower_tick < upper_tick {
            (lower_tick, upper_tick)
        } else {
            let (_, max_tick) = full_range_tick_indexes(tick_spacing)?;
            let spacing = i32::from(tick_spacing);
            if lower_tick + spacing <= max_tick {
                (lower_tick, lower_tick + spacing)
            } else {
                (upper_tick - spacing, upper_tick)
            }
        };
        Self::new_from_ticks(lower_tick, upper_tick, decimals_a, decimals_b)
    }

    /// Creates a range from explicit tick indices.
    pub fn new_from_ticks(
        lower_tick: i32,
        upper_tick: i32,
        decimals_a: u8,
        decimals_b: u8,
    ) -> Result<Self> {
        if lower_tick >= upper_tick {
            return err!(ErrorCode::InvalidTickRange);
        }
        Ok(Self {
            lower_price: tick_index_to_price(lower_tick, decimals_a, decimals_b)?,
            upper_price: tick_index_to_price(upper_tick, decimals_a, decimals_b)?,
            lower_tick,
            upper_tick,
        })
    }

    /// Creates a standardized range around the pool's current price.
    ///
    /// # Arguments
    /// * `preset` - The range preset
    /// * `current_sqrt_price` - The pool's sqrt price
    /// * `decimals_a`, `decimals_b` - Mint decimals of token A and token B
    /// * `tick_spacing` - The pool's tick spacing
    pub fn new_from_preset(
        preset: PriceRangePreset,
        current_sqrt_price: u128,
        decimals_a: u8,
        decimals_b: u8,
        tick_spacing: u16,
    ) -> Result<Self> {
        let (lower_pct, upper_pct) = match preset {
            PriceRangePreset::Narrow => (0.95, 1.05),
            PriceRangePreset::Medium => (0.85, 1.15),
            PriceRangePreset::Wide => (0.50, 1.50),
            PriceRangePreset::FullRange => {
                let (lower_tick, upper_tick) = full_range_tick_indexes(tick_spacing)?;
                return Self::new_from_ticks(lower_tick, upper_tick, decimals_a, decimals_b);
            }
        };

        let current_price = sqrt_price_to_price(current_sqrt_price, decimals_a, decimals_b);
        Self::new_from_prices(
            current_price * lower_pct,
            current_price * upper_pct,
            decimals_a,
            decimals_b,
            tick_spacing,
        )
    }

    /// Checks if a price is within this range, bounds inclusive.
    pub fn price_in_range(&self, price: f64) -> bool {
        price >= self.lower_price && price <= self.upper_price
    }

    /// Returns the width of the range as a percentage of the lower price
    pub fn width_percentage(&self) -> f64 {
        ((self.upper_price / self.lower_price) - 1.0) * 100.0
    }
}

/// `10^(decimals_a - decimals_b)`, the factor from raw to decimal-adjusted price
fn decimals_factor(decimals_a: u8, decimals_b: u8) -> f64 {
    10f64.powi(i32::from(decimals_a) - i32::from(decimals_b))
}

/// Decimal-adjusted price of a sqrt price
pub fn sqrt_price_to_price(sqrt_price: u128, decimals_a: u8, decimals_b: u8) -> f64 {
    let sqrt_price = sqrt_price as f64 / Q64_F64;
    sqrt_price * sqrt_price * decimals_factor(decimals_a, decimals_b)
}

/// Sqrt price of a decimal-adjusted price, rounded down
///
/// Non-finite, non-positive or out-of-range prices fail with `SqrtPriceOutOfBounds`.
pub fn price_to_sqrt_price(price: f64, decimals_a: u8, decimals_b: u8) -> Result<u128> {
    if !price.is_finite() || price <= 0.0 {
        return err!(ErrorCode::SqrtPriceOutOfBounds);
    }
    let sqrt_price = (price / decimals_factor(decimals_a, decimals_b)).sqrt() * Q64_F64;
    if !(MIN_SQRT_PRICE as f64..=MAX_SQRT_PRICE as f64).contains(&sqrt_price) {
        return err!(ErrorCode::SqrtPriceOutOfBounds);
    }
    Ok((sqrt_price.floor() as u128).clamp(MIN_SQRT_PRICE, MAX_SQRT_PRICE))
}

/// Decimal-adjusted price at a tick
pub fn tick_index_to_price(tick_index: i32, decimals_a: u8, decimals_b: u8) -> Result<f64> {
    Ok(sqrt_price_to_price(
        math::tick_to_sqrt_price(tick_index)?,
        decimals_a,
        decimals_b,
    ))
}

/// Greatest tick whose price does not exceed a decimal-adjusted price
pub fn price_to_tick_index(price: f64, decimals_a: u8, decimals_b: u8) -> Result<i32> {
    math::sqrt_price_to_tick(price_to_sqrt_price(price, decimals_a, decimals_b)?)
}

/// Adjusts a tick value to align with a given tick spacing
///
/// # Arguments
/// * `tick` - The tick to adjust
/// * `tick_spacing` - The tick spacing to align with
/// * `round_up` - `Some(true)` rounds up, `Some(false)` rounds down, `None`
///   rounds to the nearest multiple (halfway rounds up)
///
/// # Returns
/// * `Result<i32>` - The aligned tick, kept within the full range of the spacing
pub fn get_initializable_tick_index(
    tick: i32,
    tick_spacing: u16,
    round_up: Option<bool>,
) -> Result<i32> {
    let (min_tick, max_tick) = full_range_tick_indexes(tick_spacing)?;
    let spacing = i32::from(tick_spacing);
    let floor = tick.div_euclid(spacing) * spacing;
    let remainder = tick - floor;

    let aligned = match round_up {
        _ if remainder == 0 => tick,
        Some(true) => floor + spacing,
        Some(false) => floor,
        None if remainder * 2 >= spacing => floor + spacing,
        None => floor,
    };
    Ok(aligned.clamp(min_tick, max_tick))
}

/// Lowest and highest initializable ticks for a tick spacing
pub fn full_range_tick_indexes(tick_spacing: u16) -> Result<(i32, i32)> {
    require!(tick_spacing > 0, ErrorCode::InvalidTickSpacing);
    let spacing = i32::from(tick_spacing);
    Ok((
        -(MAX_TICK.div_euclid(spacing) * spacing),
        MAX_TICK.div_euclid(spacing) * spacing,
    ))
}

/// Tick of the inverse price (token A per token B)
pub fn invert_tick_index(tick_index: i32) -> i32 {
    -tick_index
}

/// Inverse of a decimal-adjusted price, with the decimals swapped
pub fn invert_price(price: f64, decimals_a: u8, decimals_b: u8) -> Result<f64> {
    let tick_index = price_to_tick_index(price, decimals_a, decimals_b)?;
    tick_index_to_price(invert_tick_index(tick_index), decimals_b, decimals_a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_conversions() {
        assert_eq!(sqrt_price_to_price(Q64, 6, 6), 1.0);
        assert_eq!(price_to_sqrt_price(1.0, 6, 6).unwrap(), Q64);

        // SOL (9 decimals) priced in USDC (6 decimals)
        let sqrt_price = price_to_sqrt_price(150.0, 9, 6).unwrap();
        let price = sqrt_price_to_price(sqrt_price, 9, 6);
        assert!((price - 150.0).abs() < 1e-9);

        assert!(price_to_sqrt_price(0.0, 6, 6).is_err());
        assert!(price_to_sqrt_price(f64::NAN, 6, 6).is_err());
        assert!(price_to_sqrt_price(1e30, 6, 6).is_err());
    }

    #[test]
    fn test_tick_price_conversions() {
        assert_eq!(price_to_tick_index(1.5, 6, 6).unwrap(), 4054);
        assert_eq!(price_to_tick_index(0.5, 6, 6).unwrap(), -6932);

        let price = tick_index_to_price(4054, 6, 6).unwrap();
        assert!((price - 1.0001f64.powi(4054)).abs() < 1e-9);
    }

    #[test]
    fn test_align_tick_to_spacing() {
        assert_eq!(get_initializable_tick_index(100, 64, Some(false)).unwrap(), 64);
        assert_eq!(get_initializable_tick_index(100, 64, Some(true)).unwrap(), 128);
        assert_eq!(get_initializable_tick_index(100, 64, None).unwrap(), 128);
        assert_eq!(get_initializable_tick_index(90, 64, None).unwrap(), 64);
        assert_eq!(get_initializable_tick_index(-100, 64, Some(false)).unwrap(), -128);
        assert_eq!(get_initializable_tick_index(-100, 64, Some(true)).unwrap(), -64);
        assert_eq!(get_initializable_tick_index(-128, 64, Some(true)).unwrap(), -128);
        assert_eq!(
            get_initializable_tick_index(MAX_TICK, 64, Some(true)).unwrap(),
            443584
        );
    }

    #[test]
    fn test_full_range() {
        assert_eq!(full_range_tick_indexes(1).unwrap(), (MIN_TICK, MAX_TICK));
        assert_eq!(full_range_tick_indexes(64).unwrap(), (-443584, 443584));
        assert!(full_range_tick_indexes(0).is_err());
    }

    #[test]
    fn test_price_range_presets() {
        let narrow = PriceRange::new_from_preset(PriceRangePreset::Narrow, Q64, 6, 6, 64).unwrap();
        assert!(narrow.lower_price <= 0.95);
        assert!(narrow.upper_price >= 1.05);
        assert_eq!(narrow.lower_tick % 64, 0);
        assert_eq!(narrow.upper_tick % 64, 0);
        assert!(narrow.price_in_range(1.0));

        let wide = PriceRange::new_from_preset(PriceRangePreset::Wide, Q64, 6, 6, 64).unwrap();
        assert!(wide.width_percentage() > narrow.width_percentage());

        let full = PriceRange::new_from_preset(PriceRangePreset::FullRange, Q64, 6, 6, 64).unwrap();
        assert_eq!((full.lower_tick, full.upper_tick), (-443584, 443584));
    }

    #[test]
    fn test_custom_range_validation() {
        assert!(PriceRange::new_from_prices(1.0, 2.0, 6, 6, 8).is_ok());
        assert!(PriceRange::new_from_prices(0.0, 1.0, 6, 6, 8).is_err());
        assert!(PriceRange::new_from_prices(2.0, 1.0, 6, 6, 8).is_err());
    }

    #[test]
    fn test_close_prices_widen_to_one_spacing() {
        // Both prices sit below tick 1
        let range = PriceRange::new_from_prices(1.00001, 1.00002, 6, 6, 1).unwrap();
        assert_eq!((range.lower_tick, range.upper_tick), (0, 1));
        assert!(range.price_in_range(1.00001));
        assert!(range.price_in_range(1.00002));

        let range = PriceRange::new_from_prices(1.00001, 1.00002, 6, 6, 64).unwrap();
        assert_eq!((range.lower_tick, range.upper_tick), (0, 64));
    }

    #[test]
    fn test_invert_price() {
        let inverted = invert_price(4.0, 6, 6).unwrap();
        assert!((inverted - 0.25).abs() < 1e-3);
    }
}
