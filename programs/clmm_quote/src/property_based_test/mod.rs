//! Property-based tests, run with proptest.
mod math_property_tests;
mod swap_property_tests;
