//! Vehicle Telemetry
//!
//! The evolving vehicle state, tire pressure readings, and the simulator
//! that advances them.

pub mod simulator;

pub use simulator::{advance, TelemetrySimulator};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::status::{self, VehicleStatus};
use crate::unit_conversion::{bar_to_psi, psi_to_bar};

/// Top speed in km/h
pub const MAX_SPEED: f64 = 240.0;

/// Engine speed ceiling
pub const MAX_RPM: f64 = 8000.0;

/// Gear selector position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gear {
    /// Park
    #[default]
    P,
    /// Reverse
    R,
    /// Neutral
    N,
    /// Drive
    D,
}

impl Gear {
    /// Whether the gearbox is driving the wheels
    pub fn is_engaged(self) -> bool {
        matches!(self, Gear::R | Gear::D)
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gear::P => "P",
            Gear::R => "R",
            Gear::N => "N",
            Gear::D => "D",
        };
        f.write_str(s)
    }
}

/// Drive mode shown on the launcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DriveMode {
    /// Default road setting
    #[default]
    Comfort,
    /// Sharper throttle response
    Sport,
    /// Economy setting
    Eco,
}

impl DriveMode {
    /// The mode that follows this one: Comfort → Sport → Eco → Comfort
    pub fn next(self) -> Self {
        match self {
            DriveMode::Comfort => DriveMode::Sport,
            DriveMode::Sport => DriveMode::Eco,
            DriveMode::Eco => DriveMode::Comfort,
        }
    }
}

/// Instantaneous vehicle readings.
///
/// Every bounded field is clamped to its domain whenever the simulator
/// touches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleState {
    /// Vehicle speed, km/h (0..=240)
    pub speed: f64,
    /// Engine speed (0..=8000)
    pub rpm: f64,
    /// Gear selector
    pub gear: Gear,
    /// Coolant temperature, °C
    pub coolant_temp: f64,
    /// Oil temperature, °C
    pub oil_temp: f64,
    /// Intake air temperature, °C
    pub intake_temp: f64,
    /// Battery voltage
    pub battery_voltage: f64,
    /// Engine load, % (0..=100)
    pub engine_load: f64,
    /// Fuel level, % (0..=100)
    pub fuel_level: f64,
    /// Remaining range, km. Derived from fuel level.
    pub range: f64,
}

impl Default for VehicleState {
    fn default() -> Self {
        Self {
            speed: 0.0,
            rpm: 800.0,
            gear: Gear::P,
            coolant_temp: 20.0,
            oil_temp: 20.0,
            intake_temp: 25.0,
            battery_voltage: 12.4,
            engine_load: 15.0,
            fuel_level: 75.0,
            range: 450.0,
        }
    }
}

impl VehicleState {
    /// Classify every metric
    pub fn status(&self) -> VehicleStatus {
        VehicleStatus::of(self)
    }

    /// The alert to show for this state, if any
    pub fn alert(&self) -> Option<status::Alert> {
        status::active_alert(self)
    }

    /// Whether the vehicle is moving
    pub fn is_moving(&self) -> bool {
        self.speed > 0.0
    }
}

/// Pressure unit for tire readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PressureUnit {
    /// Pounds per square inch
    #[default]
    Psi,
    /// Bar
    Bar,
}

/// Tire position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TirePosition {
    /// Front left
    Fl,
    /// Front right
    Fr,
    /// Rear left
    Rl,
    /// Rear right
    Rr,
}

/// Tire pressure monitoring reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TpmsReading {
    /// Front left pressure
    pub fl: f64,
    /// Front right pressure
    pub fr: f64,
    /// Rear left pressure
    pub rl: f64,
    /// Rear right pressure
    pub rr: f64,
    /// Unit of the four pressures
    pub unit: PressureUnit,
    /// Shared tire temperature, °C
    pub temperature: f64,
}

impl Default for TpmsReading {
    fn default() -> Self {
        Self {
            fl: 32.0,
            fr: 32.0,
            rl: 33.0,
            rr: 33.0,
            unit: PressureUnit::Psi,
            temperature: 35.0,
        }
    }
}

impl TpmsReading {
    /// Pressure of one tire in the reading's own unit
    pub fn pressure(&self, position: TirePosition) -> f64 {
        match position {
            TirePosition::Fl => self.fl,
            TirePosition::Fr => self.fr,
            TirePosition::Rl => self.rl,
            TirePosition::Rr => self.rr,
        }
    }

    /// Pressure of one tire in PSI
    pub fn pressure_psi(&self, position: TirePosition) -> f64 {
        let p = self.pressure(position);
        match self.unit {
            PressureUnit::Psi => p,
            PressureUnit::Bar => bar_to_psi(p),
        }
    }

    /// Tires below the low-pressure threshold
    pub fn low_tires(&self) -> Vec<TirePosition> {
        [
            TirePosition::Fl,
            TirePosition::Fr,
            TirePosition::Rl,
            TirePosition::Rr,
        ]
        .into_iter()
        .filter(|&pos| status::is_low_tire_pressure(self.pressure_psi(pos)))
        .collect()
    }

    /// The same reading expressed in another unit
    pub fn converted(&self, unit: PressureUnit) -> Self {
        let convert = |p: f64| match (self.unit, unit) {
            (PressureUnit::Psi, PressureUnit::Bar) => psi_to_bar(p),
            (PressureUnit::Bar, PressureUnit::Psi) => bar_to_psi(p),
            _ => p,
        };
        Self {
            fl: convert(self.fl),
            fr: convert(self.fr),
            rl: convert(self.rl),
            rr: convert(self.rr),
            unit,
            temperature: self.temperature,
        }
    }

    /// Merge a partial update.
    ///
    /// Values are taken as given: no plausibility checks, no clamping and no
    /// unit conversion of the pressures already stored.
    pub fn merge(&mut self, update: &TpmsUpdate) {
        if let Some(v) = update.fl {
            self.fl = v;
        }
        if let Some(v) = update.fr {
            self.fr = v;
        }
        if let Some(v) = update.rl {
            self.rl = v;
        }
        if let Some(v) = update.rr {
            self.rr = v;
        }
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        if let Some(t) = update.temperature {
            self.temperature = t;
        }
    }
}

/// Partial TPMS update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TpmsUpdate {
    /// Front left pressure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fl: Option<f64>,
    /// Front right pressure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fr: Option<f64>,
    /// Rear left pressure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rl: Option<f64>,
    /// Rear right pressure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rr: Option<f64>,
    /// Unit the pressures are given in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<PressureUnit>,
    /// Tire temperature, °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}
