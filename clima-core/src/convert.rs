//! Temperature unit conversion.
//!
//! Display temperatures are whole numbers. The provider reports Kelvin as a
//! float; once converted, only the integer survives, so switching units
//! later works on the integer with a fixed 273 offset. Going raw Kelvin to
//! Celsius (offset 273.15, floored) and then back through
//! [`celsius_to_kelvin`] can therefore land up to one degree away from the
//! floored raw Kelvin value.

/// Offset used when converting display integers between units.
pub const KELVIN_OFFSET: i64 = 273;

/// Exact offset used for the raw provider reading.
pub const KELVIN_OFFSET_EXACT: f64 = 273.15;

// Saturating: a reading that floors to the edge of i64 stays there.
pub fn celsius_to_kelvin(degrees: i64) -> i64 {
    degrees.saturating_add(KELVIN_OFFSET)
}

pub fn kelvin_to_celsius(degrees: i64) -> i64 {
    degrees.saturating_sub(KELVIN_OFFSET)
}

/// Convert a raw Kelvin reading into the integer shown to the user.
pub fn raw_kelvin_to_display(raw_kelvin: f64, use_celsius: bool) -> i64 {
    let value = if use_celsius {
        raw_kelvin - KELVIN_OFFSET_EXACT
    } else {
        raw_kelvin
    };

    value.floor() as i64
}
