//! Cockpit configuration
//!
//! Stored as JSON. Every field has a default, so a partial file (or `{}`)
//! is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{CockpitError, Result};
use crate::telemetry::MAX_RPM;

/// Largest accepted half-width for any noise source
pub const MAX_NOISE_AMPLITUDE: f64 = MAX_RPM;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CockpitConfig {
    /// Tick period in milliseconds
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,

    /// Seed for the noise source. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Simulation tuning
    #[serde(default)]
    pub simulation: SimulationParams,

    /// Trip scoring tuning
    #[serde(default)]
    pub trip: TripParams,
}

fn default_tick_period_ms() -> u64 {
    100
}

impl Default for CockpitConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: default_tick_period_ms(),
            seed: None,
            simulation: SimulationParams::default(),
            trip: TripParams::default(),
        }
    }
}

impl CockpitConfig {
    /// Load and validate a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: CockpitConfig = serde_json::from_str(&content)?;
        config.validate()?;
        tracing::debug!(path = %path.as_ref().display(), "Loaded cockpit config");
        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Tick period as a `Duration`
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Tick period in seconds, the time quantum trips accumulate per tick
    pub fn tick_seconds(&self) -> f64 {
        self.tick_period_ms as f64 / 1000.0
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.tick_period_ms == 0 {
            return Err(CockpitError::InvalidConfig(
                "tick_period_ms must be greater than 0".to_string(),
            ));
        }
        self.simulation.validate()?;
        self.trip.validate()?;
        Ok(())
    }
}

/// Telemetry simulation tuning. Rates are per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    /// Engine speed at rest, also the floor for braking
    pub idle_rpm: f64,
    /// Target RPM at the first km/h of road speed
    pub rpm_base: f64,
    /// Extra target RPM per km/h
    pub rpm_per_kmh: f64,
    /// Fraction of the gap to target RPM closed each tick
    pub rpm_smoothing: f64,
    /// Half-width of the uniform RPM jitter
    pub rpm_jitter: f64,

    /// Warm coolant temperature, °C
    pub coolant_target: f64,
    /// Coolant warm-up per tick, °C
    pub coolant_warmup_step: f64,
    /// Warm oil temperature, °C
    pub oil_target: f64,
    /// Oil warm-up per tick, °C
    pub oil_warmup_step: f64,
    /// Intake air temperature, °C
    pub intake_ambient: f64,
    /// Half-width of the intake temperature noise
    pub intake_jitter: f64,

    /// RPM above which the alternator charges
    pub alternator_rpm: f64,
    /// Battery voltage while the alternator charges
    pub charging_voltage: f64,
    /// Half-width of the charging voltage noise
    pub charging_noise: f64,
    /// Battery voltage with the alternator off
    pub resting_voltage: f64,

    /// Engine load at rest, %
    pub idle_load: f64,
    /// Extra engine load per km/h, %
    pub load_per_kmh: f64,
    /// Half-width of the engine load noise
    pub load_noise: f64,

    /// Fuel burned per tick while moving, %
    pub fuel_drain: f64,
    /// Extra fuel burned per accelerate impulse, %
    pub accelerate_fuel_cost: f64,
    /// Range on a full tank
    pub full_tank_range_km: f64,

    /// Speed gained per accelerate impulse, km/h
    pub accelerate_speed_step: f64,
    /// RPM gained per accelerate impulse
    pub accelerate_rpm_step: f64,
    /// Speed lost per brake impulse, km/h
    pub brake_speed_step: f64,
    /// RPM lost per brake impulse
    pub brake_rpm_step: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            idle_rpm: 800.0,
            rpm_base: 2000.0,
            rpm_per_kmh: 20.0,
            rpm_smoothing: 0.1,
            rpm_jitter: 25.0,
            coolant_target: 90.0,
            coolant_warmup_step: 0.1,
            oil_target: 95.0,
            oil_warmup_step: 0.08,
            intake_ambient: 25.0,
            intake_jitter: 0.5,
            alternator_rpm: 500.0,
            charging_voltage: 14.2,
            charging_noise: 0.1,
            resting_voltage: 12.4,
            idle_load: 15.0,
            load_per_kmh: 0.3,
            load_noise: 2.0,
            fuel_drain: 0.001,
            accelerate_fuel_cost: 0.1,
            full_tank_range_km: 600.0,
            accelerate_speed_step: 5.0,
            accelerate_rpm_step: 500.0,
            brake_speed_step: 10.0,
            brake_rpm_step: 1000.0,
        }
    }
}

impl SimulationParams {
    fn validate(&self) -> Result<()> {
        let all = [
            ("idle_rpm", self.idle_rpm),
            ("rpm_base", self.rpm_base),
            ("rpm_per_kmh", self.rpm_per_kmh),
            ("rpm_smoothing", self.rpm_smoothing),
            ("rpm_jitter", self.rpm_jitter),
            ("coolant_target", self.coolant_target),
            ("coolant_warmup_step", self.coolant_warmup_step),
            ("oil_target", self.oil_target),
            ("oil_warmup_step", self.oil_warmup_step),
            ("intake_ambient", self.intake_ambient),
            ("intake_jitter", self.intake_jitter),
            ("alternator_rpm", self.alternator_rpm),
            ("charging_voltage", self.charging_voltage),
            ("charging_noise", self.charging_noise),
            ("resting_voltage", self.resting_voltage),
            ("idle_load", self.idle_load),
            ("load_per_kmh", self.load_per_kmh),
            ("load_noise", self.load_noise),
            ("fuel_drain", self.fuel_drain),
            ("accelerate_fuel_cost", self.accelerate_fuel_cost),
            ("full_tank_range_km", self.full_tank_range_km),
            ("accelerate_speed_step", self.accelerate_speed_step),
            ("accelerate_rpm_step", self.accelerate_rpm_step),
            ("brake_speed_step", self.brake_speed_step),
            ("brake_rpm_step", self.brake_rpm_step),
        ];
        for (name, value) in all {
            if !value.is_finite() {
                return Err(CockpitError::InvalidConfig(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
        }

        if !(0.0..=MAX_RPM).contains(&self.idle_rpm) {
            return Err(CockpitError::InvalidConfig(format!(
                "idle_rpm must be within 0..={MAX_RPM}, got {}",
                self.idle_rpm
            )));
        }
        if !(self.rpm_smoothing > 0.0 && self.rpm_smoothing <= 1.0) {
            return Err(CockpitError::InvalidConfig(format!(
                "rpm_smoothing must be in (0, 1], got {}",
                self.rpm_smoothing
            )));
        }

        // Noise is drawn from a uniform range twice the amplitude wide
        let noise = [
            ("rpm_jitter", self.rpm_jitter),
            ("intake_jitter", self.intake_jitter),
            ("charging_noise", self.charging_noise),
            ("load_noise", self.load_noise),
        ];
        for (name, value) in noise {
            if !(0.0..=MAX_NOISE_AMPLITUDE).contains(&value) {
                return Err(CockpitError::InvalidConfig(format!(
                    "{name} must be within 0..={MAX_NOISE_AMPLITUDE}, got {value}"
                )));
            }
        }

        let non_negative = [
            ("coolant_warmup_step", self.coolant_warmup_step),
            ("oil_warmup_step", self.oil_warmup_step),
            ("fuel_drain", self.fuel_drain),
            ("accelerate_fuel_cost", self.accelerate_fuel_cost),
            ("accelerate_speed_step", self.accelerate_speed_step),
            ("accelerate_rpm_step", self.accelerate_rpm_step),
            ("brake_speed_step", self.brake_speed_step),
            ("brake_rpm_step", self.brake_rpm_step),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(CockpitError::InvalidConfig(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Trip scoring tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripParams {
    /// Speed above which the continuous penalty applies, km/h
    pub high_speed_kmh: f64,
    /// Score lost per tick above `high_speed_kmh`
    pub high_speed_penalty: f64,
    /// The continuous penalty never takes the score below this
    pub high_speed_floor: f64,
    /// Score lost per accelerate impulse
    pub accelerate_penalty: f64,
    /// Score lost per brake impulse above `brake_penalty_min_speed`
    pub brake_penalty: f64,
    /// Braking only costs score above this speed, km/h
    pub brake_penalty_min_speed: f64,
    /// Oldest trips beyond this count are dropped
    pub max_recent_trips: usize,
}

impl Default for TripParams {
    fn default() -> Self {
        Self {
            high_speed_kmh: 100.0,
            high_speed_penalty: 0.05,
            high_speed_floor: 50.0,
            accelerate_penalty: 2.0,
            brake_penalty: 3.0,
            brake_penalty_min_speed: 50.0,
            max_recent_trips: 50,
        }
    }
}

impl TripParams {
    fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.high_speed_floor) {
            return Err(CockpitError::InvalidConfig(format!(
                "high_speed_floor must be within 0..=100, got {}",
                self.high_speed_floor
            )));
        }
        let penalties = [
            ("high_speed_penalty", self.high_speed_penalty),
            ("accelerate_penalty", self.accelerate_penalty),
            ("brake_penalty", self.brake_penalty),
        ];
        for (name, value) in penalties {
            if !(value >= 0.0) {
                return Err(CockpitError::InvalidConfig(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config: CockpitConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CockpitConfig::default());
    }

    #[test]
    fn test_partial_section() {
        let config: CockpitConfig =
            serde_json::from_str(r#"{ "tick_period_ms": 1000, "simulation": { "idle_rpm": 750 } }"#)
                .unwrap();
        assert_eq!(config.tick_period_ms, 1000);
        assert_eq!(config.tick_seconds(), 1.0);
        assert_eq!(config.simulation.idle_rpm, 750.0);
        assert_eq!(config.simulation.rpm_base, 2000.0);
    }

    #[test]
    fn test_validate_rejects_zero_period() {
        let config = CockpitConfig {
            tick_period_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CockpitError::InvalidConfig(_))
        ));
    }
}
