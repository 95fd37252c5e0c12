//! Status Classification
//!
//! Maps raw readings to a `Status` using fixed breakpoints. Speed, RPM and
//! coolant get worse as they rise; battery voltage and fuel level get worse
//! as they fall.
//!
//! Every function here is total: any `f64`, including values below all
//! breakpoints, classifies to something. NaN never reaches a breakpoint and
//! therefore classifies as `Normal`.

use serde::{Deserialize, Serialize};

use crate::telemetry::VehicleState;

// =============================================================================
// Breakpoints
// =============================================================================

/// Speed (km/h) at which the reading turns amber
pub const SPEED_WARNING: f64 = 120.0;
/// Speed (km/h) at which the reading turns red
pub const SPEED_CRITICAL: f64 = 180.0;

/// RPM at which the reading turns amber
pub const RPM_WARNING: f64 = 5500.0;
/// Redline
pub const RPM_REDLINE: f64 = 6500.0;

/// Coolant temperature (°C) at which the reading turns amber
pub const COOLANT_WARNING: f64 = 100.0;
/// Coolant temperature (°C) at which the engine is overheating
pub const COOLANT_CRITICAL: f64 = 110.0;

/// Battery voltage at or below which the reading turns amber
pub const BATTERY_WARNING: f64 = 12.0;
/// Battery voltage at or below which the reading turns red
pub const BATTERY_CRITICAL: f64 = 11.5;

/// Fuel level (%) at or below which the reading turns amber
pub const FUEL_WARNING: f64 = 25.0;
/// Fuel level (%) at or below which the reading turns red
pub const FUEL_CRITICAL: f64 = 15.0;

/// Tire pressure (PSI) below which a tire is flagged
pub const TIRE_LOW_PSI: f64 = 30.0;

/// Trip score at or above which a trip is rated good
pub const SCORE_GOOD: f64 = 90.0;
/// Trip score at or above which a trip is rated fair
pub const SCORE_FAIR: f64 = 70.0;

// Rising metrics: warning below critical. Falling metrics: critical below warning.
const _: () = assert!(SPEED_WARNING < SPEED_CRITICAL);
const _: () = assert!(RPM_WARNING < RPM_REDLINE);
const _: () = assert!(COOLANT_WARNING < COOLANT_CRITICAL);
const _: () = assert!(BATTERY_CRITICAL < BATTERY_WARNING);
const _: () = assert!(FUEL_CRITICAL < FUEL_WARNING);
const _: () = assert!(SCORE_FAIR < SCORE_GOOD);

/// Severity of a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Within normal operating range
    Normal,
    /// Needs attention
    Warning,
    /// Act now
    Critical,
}

/// A metric that has fixed breakpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Vehicle speed in km/h
    Speed,
    /// Engine speed
    Rpm,
    /// Coolant temperature in °C
    Coolant,
    /// Battery voltage
    Battery,
    /// Fuel level in percent
    Fuel,
}

impl Metric {
    /// Classify a reading of this metric
    pub fn classify(self, value: f64) -> Status {
        match self {
            Metric::Speed => speed_status(value),
            Metric::Rpm => rpm_status(value),
            Metric::Coolant => coolant_status(value),
            Metric::Battery => battery_status(value),
            Metric::Fuel => fuel_status(value),
        }
    }
}

#[inline]
fn rising(value: f64, warning: f64, critical: f64) -> Status {
    if value >= critical {
        Status::Critical
    } else if value >= warning {
        Status::Warning
    } else {
        Status::Normal
    }
}

#[inline]
fn falling(value: f64, warning: f64, critical: f64) -> Status {
    if value <= critical {
        Status::Critical
    } else if value <= warning {
        Status::Warning
    } else {
        Status::Normal
    }
}

/// Classify vehicle speed (km/h)
pub fn speed_status(speed: f64) -> Status {
    rising(speed, SPEED_WARNING, SPEED_CRITICAL)
}

/// Classify engine speed
pub fn rpm_status(rpm: f64) -> Status {
    rising(rpm, RPM_WARNING, RPM_REDLINE)
}

/// Classify coolant temperature (°C)
pub fn coolant_status(temp: f64) -> Status {
    rising(temp, COOLANT_WARNING, COOLANT_CRITICAL)
}

/// Classify battery voltage. Lower is worse.
pub fn battery_status(voltage: f64) -> Status {
    falling(voltage, BATTERY_WARNING, BATTERY_CRITICAL)
}

/// Classify fuel level (%). Lower is worse.
pub fn fuel_status(level: f64) -> Status {
    falling(level, FUEL_WARNING, FUEL_CRITICAL)
}

/// Whether a tire pressure in PSI is below the low-pressure threshold
#[inline]
pub fn is_low_tire_pressure(psi: f64) -> bool {
    psi < TIRE_LOW_PSI
}

// =============================================================================
// Per-vehicle summaries
// =============================================================================

/// Status of every classified metric at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleStatus {
    /// Vehicle speed
    pub speed: Status,
    /// Engine speed
    pub rpm: Status,
    /// Coolant temperature
    pub coolant: Status,
    /// Battery voltage
    pub battery: Status,
    /// Fuel level
    pub fuel: Status,
}

impl VehicleStatus {
    /// Classify every metric of a vehicle state
    pub fn of(state: &VehicleState) -> Self {
        Self {
            speed: speed_status(state.speed),
            rpm: rpm_status(state.rpm),
            coolant: coolant_status(state.coolant_temp),
            battery: battery_status(state.battery_voltage),
            fuel: fuel_status(state.fuel_level),
        }
    }

    /// The worst status across all metrics
    pub fn worst(&self) -> Status {
        [self.speed, self.rpm, self.coolant, self.battery, self.fuel]
            .into_iter()
            .max()
            .unwrap_or(Status::Normal)
    }
}

/// A driver-facing alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alert {
    /// Coolant is critical
    EngineOverheat,
    /// Fuel is critical
    LowFuel,
    /// Speed is critical
    ReduceSpeed,
}

impl Alert {
    /// Banner text shown to the driver
    pub fn message(&self) -> &'static str {
        match self {
            Alert::EngineOverheat => "ENGINE OVERHEAT",
            Alert::LowFuel => "LOW FUEL LEVEL",
            Alert::ReduceSpeed => "REDUCE SPEED",
        }
    }
}

/// The single alert to show, if any.
///
/// Coolant beats fuel, fuel beats speed.
pub fn active_alert(state: &VehicleState) -> Option<Alert> {
    if coolant_status(state.coolant_temp) == Status::Critical {
        Some(Alert::EngineOverheat)
    } else if fuel_status(state.fuel_level) == Status::Critical {
        Some(Alert::LowFuel)
    } else if speed_status(state.speed) == Status::Critical {
        Some(Alert::ReduceSpeed)
    } else {
        None
    }
}

/// Rating band for a trip score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    /// Score of 90 or more
    Good,
    /// Score of 70 or more
    Fair,
    /// Anything lower
    Poor,
}

impl ScoreBand {
    /// Band a driving score
    pub fn of(score: f64) -> Self {
        if score >= SCORE_GOOD {
            ScoreBand::Good
        } else if score >= SCORE_FAIR {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }
}
