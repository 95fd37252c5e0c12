//! # Cockpit Core Library
//!
//! Core functionality behind a simulated vehicle cockpit display.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - A telemetry simulator producing speed, RPM, temperatures, voltage,
//!   load and fuel readings
//! - Trip recording with a live driving score
//! - Status classification of readings against fixed breakpoints
//! - Arc geometry for circular gauges
//! - A single-owner tokio runtime that ticks the simulation
//!
//! ## Example
//!
//! ```rust,ignore
//! use cockpit_core::{config::CockpitConfig, gauge, runtime};
//!
//! let config = CockpitConfig::default();
//! let sim = runtime::spawn(&config)?;
//! let handle = sim.handle();
//!
//! handle.start_trip().await?;
//! handle.accelerate().await?;
//!
//! let snapshot = handle.snapshot();
//! let speedo = gauge::render(&gauge::GaugeSpec::speed(snapshot.vehicle.speed));
//! println!("{}", speedo.background_path());
//!
//! let cockpit = sim.shutdown().await?;
//! ```

pub mod cockpit;
pub mod config;
pub mod error;
pub mod gauge;
pub mod runtime;
pub mod status;
pub mod telemetry;
pub mod trip;
pub mod unit_conversion;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cockpit::{Cockpit, CockpitSnapshot};
    pub use crate::config::{CockpitConfig, SimulationParams, TripParams};
    pub use crate::error::{CockpitError, Result};
    pub use crate::gauge::{render, GaugeLayout, GaugeRender, GaugeSpec};
    pub use crate::runtime::{CockpitHandle, CockpitRuntime};
    pub use crate::status::{Alert, Metric, ScoreBand, Status};
    pub use crate::telemetry::{
        DriveMode, Gear, PressureUnit, TelemetrySimulator, TpmsReading, TpmsUpdate, VehicleState,
    };
    pub use crate::trip::{TripRecord, TripRecorder, TripSession};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
