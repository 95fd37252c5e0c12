//! Unit Conversion Functions
//!
//! Conversions used by the cockpit readouts:
//! - Tire pressure: PSI ↔ bar
//! - Speed: km/h → mph
//! - Temperature: °C → °F

/// PSI in one bar
pub const PSI_PER_BAR: f64 = 14.503773773020923;

/// Miles in one kilometre
pub const MILES_PER_KM: f64 = 0.62137119223733;

/// Convert bar to PSI
pub fn bar_to_psi(bar: f64) -> f64 {
    bar * PSI_PER_BAR
}

/// Convert PSI to bar
pub fn psi_to_bar(psi: f64) -> f64 {
    psi / PSI_PER_BAR
}

/// Convert km/h to mph
pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh * MILES_PER_KM
}

/// Convert Celsius to Fahrenheit
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}
