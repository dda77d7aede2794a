//! Pitchside
//!
//! Pricing and promotion engine for booking sports fields by the hour:
//! hourly slots, promotion codes with validity windows, and the arithmetic
//! that turns a slot selection into a final charge.

pub mod discounts;
pub mod fields;
pub mod fixtures;
pub mod money;
pub mod pricing;
pub mod promotions;
pub mod slots;
