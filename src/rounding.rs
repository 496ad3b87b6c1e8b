//! Decimal rounding used by every monetary output.
//!
//! Values are scaled, rounded half-up on the scaled integer and scaled
//! back.  Currency amounts keep two decimals; per-minute rates keep
//! three because they are small enough that cents would erase them.

fn round_half_up(value: f64, scale: f64) -> f64 {
    (value * scale + 0.5).floor() / scale
}

/// Round a currency amount to two decimals.
pub fn round2(value: f64) -> f64 {
    round_half_up(value, 100.0)
}

/// Round a per-minute rate to three decimals.
pub fn round3(value: f64) -> f64 {
    round_half_up(value, 1000.0)
}
