//! Cockpit
//!
//! The single owner of vehicle and trip state. Presentation code reads
//! [`CockpitSnapshot`]s and calls the control operations; it never touches
//! the state directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::CockpitConfig;
use crate::status::{Alert, VehicleStatus};
use crate::telemetry::{DriveMode, Gear, TelemetrySimulator, TpmsReading, TpmsUpdate, VehicleState};
use crate::trip::{TripRecord, TripRecorder, TripSession};

/// Vehicle simulation plus trip recording
pub struct Cockpit {
    simulator: TelemetrySimulator,
    trips: TripRecorder,
    tpms: TpmsReading,
    drive_mode: DriveMode,
    /// Real time one tick stands for
    tick_period: Duration,
}

impl Default for Cockpit {
    fn default() -> Self {
        Self::new(&CockpitConfig::default())
    }
}

impl Cockpit {
    /// Build from configuration
    pub fn new(config: &CockpitConfig) -> Self {
        Self::with_simulator(TelemetrySimulator::from_config(config), config)
    }

    /// Build around an existing simulator.
    ///
    /// Trips accumulate `config.tick_period()` per tick, and a runtime
    /// driving this cockpit ticks at that same period.
    pub fn with_simulator(simulator: TelemetrySimulator, config: &CockpitConfig) -> Self {
        let tick_period = config.tick_period();
        Self {
            simulator,
            trips: TripRecorder::new(config.trip.clone(), tick_period.as_secs_f64()),
            tpms: TpmsReading::default(),
            drive_mode: DriveMode::default(),
            tick_period,
        }
    }

    /// Real time one tick stands for
    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Advance the vehicle one tick, then the trip at the new speed
    pub fn tick(&mut self) {
        self.simulator.tick();
        self.trips.tick(self.simulator.state().speed);
    }

    /// Accelerate impulse. Costs score while a trip is active.
    pub fn accelerate(&mut self) {
        self.simulator.accelerate();
        self.trips.on_accelerate();
    }

    /// Brake impulse. Costs score while a trip is active and the vehicle
    /// was above the brake-penalty speed.
    pub fn brake(&mut self) {
        let speed_before = self.simulator.state().speed;
        self.simulator.brake();
        self.trips.on_brake(speed_before);
    }

    /// Move the gear selector
    pub fn set_gear(&mut self, gear: Gear) {
        self.simulator.set_gear(gear);
    }

    /// Cycle the drive mode, returning the new one
    pub fn toggle_drive_mode(&mut self) -> DriveMode {
        self.drive_mode = self.drive_mode.next();
        tracing::debug!(mode = ?self.drive_mode, "Drive mode changed");
        self.drive_mode
    }

    /// See [`TripRecorder::start_trip`]
    pub fn start_trip(&mut self) -> bool {
        self.trips.start_trip()
    }

    /// See [`TripRecorder::start_trip_at`]
    pub fn start_trip_at(&mut self, started_at: DateTime<Utc>) -> bool {
        self.trips.start_trip_at(started_at)
    }

    /// See [`TripRecorder::stop_trip`]
    pub fn stop_trip(&mut self) -> Option<TripRecord> {
        self.trips.stop_trip()
    }

    /// Merge a partial tire reading. Values are not validated.
    pub fn update_tpms(&mut self, update: &TpmsUpdate) {
        self.tpms.merge(update);
    }

    /// Current vehicle readings
    pub fn vehicle(&self) -> &VehicleState {
        self.simulator.state()
    }

    /// Current tire reading
    pub fn tpms(&self) -> &TpmsReading {
        &self.tpms
    }

    /// Current drive mode
    pub fn drive_mode(&self) -> DriveMode {
        self.drive_mode
    }

    /// Trip state machine
    pub fn trips(&self) -> &TripRecorder {
        &self.trips
    }

    /// Simulator
    pub fn simulator(&self) -> &TelemetrySimulator {
        &self.simulator
    }

    /// Copy of everything a display needs
    pub fn snapshot(&self) -> CockpitSnapshot {
        let vehicle = self.simulator.state().clone();
        CockpitSnapshot {
            status: VehicleStatus::of(&vehicle),
            alert: vehicle.alert(),
            vehicle,
            tpms: self.tpms.clone(),
            drive_mode: self.drive_mode,
            trip: self.trips.session().cloned(),
            recent_trips: self.trips.recent_trips().cloned().collect(),
            tick: self.simulator.ticks(),
        }
    }
}

/// Read-only view of the cockpit between ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CockpitSnapshot {
    /// Vehicle readings
    pub vehicle: VehicleState,
    /// Classification of the readings
    pub status: VehicleStatus,
    /// Highest-priority alert, if any
    pub alert: Option<Alert>,
    /// Latest tire reading
    pub tpms: TpmsReading,
    /// Selected drive mode
    pub drive_mode: DriveMode,
    /// Trip in progress
    pub trip: Option<TripSession>,
    /// Finished trips, newest first
    pub recent_trips: Vec<TripRecord>,
    /// Ticks elapsed
    pub tick: u64,
}

impl CockpitSnapshot {
    /// Whether a trip is being recorded
    pub fn is_trip_active(&self) -> bool {
        self.trip.is_some()
    }

    /// Live trip duration in seconds, 0 when inactive
    pub fn trip_duration(&self) -> f64 {
        self.trip.as_ref().map_or(0.0, |t| t.duration_seconds)
    }

    /// Live trip distance in km, 0 when inactive
    pub fn trip_distance(&self) -> f64 {
        self.trip.as_ref().map_or(0.0, |t| t.distance_km)
    }

    /// Live driving score, 100 when inactive
    pub fn driving_score(&self) -> f64 {
        self.trip.as_ref().map_or(crate::trip::INITIAL_SCORE, |t| t.score)
    }
}
