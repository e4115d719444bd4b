/// Utility modules for the quote engine
///
/// Supporting conversions that sit outside the fixed-point core.
pub mod price_range;

// Re-export commonly used utilities for easier access
pub use price_range::PriceRange;
pub use price_range::PriceRangePreset;
