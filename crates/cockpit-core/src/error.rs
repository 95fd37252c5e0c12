//! Cockpit errors
//!
//! The simulation itself cannot fail. Errors only come from configuration
//! loading, trip export, and talking to a runtime that has already stopped.

use thiserror::Error;

/// Errors that can occur outside the simulation step
#[derive(Error, Debug)]
pub enum CockpitError {
    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration or trip file is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A setting the simulation cannot run with
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The runtime task is no longer running
    #[error("Simulation runtime has stopped")]
    RuntimeStopped,
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, CockpitError>;
