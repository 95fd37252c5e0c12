//! Telemetry Simulator
//!
//! Generates plausible, continuously varying vehicle readings. Not a physics
//! model: RPM relaxes toward a target derived from speed, temperatures warm
//! up toward fixed targets, and the driver moves speed with discrete
//! accelerate/brake impulses.
//!
//! The per-tick step is the free function [`advance`], which takes the noise
//! source as an argument. [`TelemetrySimulator`] owns the state and a seeded
//! `StdRng` and calls it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Gear, VehicleState, MAX_RPM, MAX_SPEED};
use crate::config::{CockpitConfig, SimulationParams, MAX_NOISE_AMPLITUDE};

/// Uniform noise in `[-amplitude, amplitude]`.
///
/// The amplitude is capped at [`MAX_NOISE_AMPLITUDE`]; a non-positive or
/// NaN amplitude gives no noise.
fn jitter<R: Rng + ?Sized>(rng: &mut R, amplitude: f64) -> f64 {
    if amplitude > 0.0 {
        let amplitude = amplitude.min(MAX_NOISE_AMPLITUDE);
        rng.gen_range(-amplitude..=amplitude)
    } else {
        0.0
    }
}

/// RPM the engine settles toward at a given speed and gear.
///
/// Idle when stopped or when the gearbox is not driving the wheels.
pub fn target_rpm(speed: f64, gear: Gear, params: &SimulationParams) -> f64 {
    if speed <= 0.0 || !gear.is_engaged() {
        params.idle_rpm
    } else {
        (params.rpm_base + params.rpm_per_kmh * speed).min(MAX_RPM)
    }
}

/// Move toward `target` by `step`, never past it
fn warm_toward(current: f64, target: f64, step: f64) -> f64 {
    if current < target {
        (current + step).min(target)
    } else {
        current
    }
}

fn range_for(fuel_level: f64, params: &SimulationParams) -> f64 {
    fuel_level / 100.0 * params.full_tank_range_km
}

/// Advance a vehicle state by one tick.
///
/// Speed and gear are left untouched; only the control impulses move them.
pub fn advance<R: Rng + ?Sized>(
    state: &VehicleState,
    params: &SimulationParams,
    rng: &mut R,
) -> VehicleState {
    let mut next = state.clone();

    // RPM relaxation
    let target = target_rpm(state.speed, state.gear, params);
    let rpm = state.rpm + (target - state.rpm) * params.rpm_smoothing + jitter(rng, params.rpm_jitter);
    next.rpm = rpm.clamp(0.0, MAX_RPM);

    // Thermal ramp
    next.coolant_temp = warm_toward(state.coolant_temp, params.coolant_target, params.coolant_warmup_step);
    next.oil_temp = warm_toward(state.oil_temp, params.oil_target, params.oil_warmup_step);
    next.intake_temp = params.intake_ambient + jitter(rng, params.intake_jitter);

    // Alternator cut-in, deliberately not smoothed
    next.battery_voltage = if next.rpm > params.alternator_rpm {
        params.charging_voltage + jitter(rng, params.charging_noise)
    } else {
        params.resting_voltage
    };

    let load = params.idle_load + params.load_per_kmh * state.speed + jitter(rng, params.load_noise);
    next.engine_load = load.clamp(0.0, 100.0);

    if state.speed > 0.0 {
        next.fuel_level = (state.fuel_level - params.fuel_drain).clamp(0.0, 100.0);
    }
    next.range = range_for(next.fuel_level, params);

    next
}

/// Apply an accelerate impulse.
///
/// Shifts out of Park into Drive on first use.
pub fn apply_accelerate(state: &VehicleState, params: &SimulationParams) -> VehicleState {
    let mut next = state.clone();
    if next.gear == Gear::P {
        next.gear = Gear::D;
    }
    next.speed = (state.speed + params.accelerate_speed_step).clamp(0.0, MAX_SPEED);
    next.rpm = (state.rpm + params.accelerate_rpm_step).clamp(0.0, MAX_RPM);
    next.fuel_level = (state.fuel_level - params.accelerate_fuel_cost).clamp(0.0, 100.0);
    next.range = range_for(next.fuel_level, params);
    next
}

/// Apply a brake impulse. RPM never drops below idle.
pub fn apply_brake(state: &VehicleState, params: &SimulationParams) -> VehicleState {
    let mut next = state.clone();
    next.speed = (state.speed - params.brake_speed_step).clamp(0.0, MAX_SPEED);
    next.rpm = (state.rpm - params.brake_rpm_step)
        .max(params.idle_rpm)
        .min(MAX_RPM);
    next
}

/// Owns the vehicle state and the noise source
pub struct TelemetrySimulator {
    state: VehicleState,
    params: SimulationParams,
    rng: StdRng,
    ticks: u64,
}

impl Default for TelemetrySimulator {
    fn default() -> Self {
        Self::new(SimulationParams::default(), None)
    }
}

impl TelemetrySimulator {
    /// Create a simulator. A seed makes the noise reproducible.
    pub fn new(params: SimulationParams, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut state = VehicleState {
            rpm: params.idle_rpm.clamp(0.0, MAX_RPM),
            ..VehicleState::default()
        };
        state.range = range_for(state.fuel_level, &params);

        Self {
            state,
            params,
            rng,
            ticks: 0,
        }
    }

    /// Create a simulator from the top-level configuration
    pub fn from_config(config: &CockpitConfig) -> Self {
        Self::new(config.simulation.clone(), config.seed)
    }

    /// Replace the starting state
    pub fn with_state(mut self, state: VehicleState) -> Self {
        self.state = state;
        self
    }

    /// Advance one tick
    pub fn tick(&mut self) -> &VehicleState {
        self.state = advance(&self.state, &self.params, &mut self.rng);
        self.ticks += 1;
        tracing::trace!(
            tick = self.ticks,
            speed = self.state.speed,
            rpm = self.state.rpm,
            fuel = self.state.fuel_level,
            "Telemetry tick"
        );
        &self.state
    }

    /// Accelerate impulse
    pub fn accelerate(&mut self) {
        self.state = apply_accelerate(&self.state, &self.params);
    }

    /// Brake impulse
    pub fn brake(&mut self) {
        self.state = apply_brake(&self.state, &self.params);
    }

    /// Move the gear selector
    pub fn set_gear(&mut self, gear: Gear) {
        self.state.gear = gear;
    }

    /// Current readings
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// Ticks since creation
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_rpm_range() {
        let mut sim = TelemetrySimulator::new(SimulationParams::default(), Some(7));

        for _ in 0..100 {
            let rpm = sim.tick().rpm;
            // Converges on idle; jitter stays within a few hundred RPM
            assert!(rpm > 500.0 && rpm < 1100.0, "RPM {} out of idle range", rpm);
        }
    }

    #[test]
    fn test_rpm_converges_on_cruise_target() {
        let mut sim = TelemetrySimulator::new(SimulationParams::default(), Some(3));
        for _ in 0..10 {
            sim.accelerate();
        }
        assert_eq!(sim.state().speed, 50.0);
        for _ in 0..200 {
            sim.tick();
        }
        // 2000 + 20 * 50
        assert!((sim.state().rpm - 3000.0).abs() < 300.0);
    }

    #[test]
    fn test_target_rpm_rules() {
        let params = SimulationParams::default();
        assert_eq!(target_rpm(0.0, Gear::D, &params), 800.0);
        assert_eq!(target_rpm(60.0, Gear::N, &params), 800.0);
        assert_eq!(target_rpm(60.0, Gear::D, &params), 3200.0);
        assert_eq!(target_rpm(240.0, Gear::D, &params), 6800.0);
        assert_eq!(target_rpm(500.0, Gear::R, &params), MAX_RPM);
    }

    #[test]
    fn test_coolant_warmup() {
        let mut sim = TelemetrySimulator::new(SimulationParams::default(), Some(1));
        let start = sim.state().coolant_temp;

        for _ in 0..100 {
            sim.tick();
        }
        let later = sim.state().coolant_temp;
        assert!(later > start, "Coolant should warm up: {} vs {}", start, later);
        assert!(later < 90.0, "Coolant shouldn't be fully warm yet");

        for _ in 0..10_000 {
            sim.tick();
        }
        assert_eq!(sim.state().coolant_temp, 90.0);
        assert_eq!(sim.state().oil_temp, 95.0);
    }

    #[test]
    fn test_battery_follows_alternator() {
        let params = SimulationParams::default();
        let mut rng = StdRng::seed_from_u64(11);

        let running = VehicleState::default();
        let next = advance(&running, &params, &mut rng);
        assert!((next.battery_voltage - 14.2).abs() <= 0.1 + 1e-9);

        let stalled = VehicleState {
            rpm: 0.0,
            ..VehicleState::default()
        };
        let params = SimulationParams {
            rpm_jitter: 0.0,
            ..SimulationParams::default()
        };
        // First tick only closes 10% of the gap to idle, still under 500
        let next = advance(&stalled, &params, &mut rng);
        assert_eq!(next.rpm, 80.0);
        assert_eq!(next.battery_voltage, 12.4);
    }

    #[test]
    fn test_fuel_only_drains_while_moving() {
        let mut sim = TelemetrySimulator::new(SimulationParams::default(), Some(5));
        for _ in 0..50 {
            sim.tick();
        }
        assert_eq!(sim.state().fuel_level, 75.0);

        sim.accelerate();
        let after_impulse = sim.state().fuel_level;
        assert!((after_impulse - 74.9).abs() < 1e-9);
        sim.tick();
        assert!(sim.state().fuel_level < after_impulse);
    }

    #[test]
    fn test_accelerate_shifts_out_of_park() {
        let mut sim = TelemetrySimulator::default();
        assert_eq!(sim.state().gear, Gear::P);
        sim.accelerate();
        assert_eq!(sim.state().gear, Gear::D);

        sim.set_gear(Gear::R);
        sim.accelerate();
        assert_eq!(sim.state().gear, Gear::R);
    }

    #[test]
    fn test_zero_jitter_is_allowed() {
        let params = SimulationParams {
            rpm_jitter: 0.0,
            intake_jitter: 0.0,
            charging_noise: 0.0,
            load_noise: 0.0,
            ..SimulationParams::default()
        };
        let mut sim = TelemetrySimulator::new(params, None);
        let state = sim.tick().clone();
        assert_eq!(state.rpm, 800.0);
        assert_eq!(state.engine_load, 15.0);
        assert_eq!(state.battery_voltage, 14.2);
    }
}
