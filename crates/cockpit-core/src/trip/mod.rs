//! Trip Recording
//!
//! A trip is a bounded recording session over which distance, duration and
//! a driving score accumulate. Finished trips become immutable
//! [`TripRecord`]s kept newest-first in memory.
//!
//! History is in-memory only and is lost when the process exits. The
//! [`export`] module can write it to JSON, but nothing reloads it
//! automatically.

pub mod export;
mod recorder;

pub use recorder::TripRecorder;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::TripParams;
use crate::status::ScoreBand;

/// Score every trip starts with
pub const INITIAL_SCORE: f64 = 100.0;

/// Average speed in km/h, 0 when no time has elapsed
pub fn average_speed_kmh(distance_km: f64, duration_seconds: f64) -> f64 {
    if duration_seconds > 0.0 {
        distance_km / (duration_seconds / 3600.0)
    } else {
        0.0
    }
}

/// Format seconds as `HH:MM:SS`. Fractions of a second are dropped.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// A finished trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    /// Unique trip id
    pub id: Uuid,
    /// When the trip started
    pub start_timestamp: DateTime<Utc>,
    /// Distance covered
    pub distance_km: f64,
    /// Time recorded
    pub duration_seconds: f64,
    /// Distance over duration, 0 for a zero-length trip
    pub avg_speed_kmh: f64,
    /// Final driving score, 0..=100
    pub score: f64,
}

impl TripRecord {
    /// Rating band of the final score
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::of(self.score)
    }

    /// Duration as `HH:MM:SS`
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration_seconds)
    }
}

/// The trip in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSession {
    /// Unique trip id
    pub id: Uuid,
    /// When the trip started
    pub started_at: DateTime<Utc>,
    /// Distance covered
    pub distance_km: f64,
    /// Time recorded
    pub duration_seconds: f64,
    /// Live score. Only ever decreases.
    pub score: f64,
}

impl TripSession {
    /// Fresh session: no distance, no time, full score
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at,
            distance_km: 0.0,
            duration_seconds: 0.0,
            score: INITIAL_SCORE,
        }
    }

    /// Accumulate one tick of driving at `speed_kmh`
    pub fn record_tick(&mut self, speed_kmh: f64, tick_seconds: f64, params: &TripParams) {
        self.duration_seconds += tick_seconds;
        self.distance_km += speed_kmh.max(0.0) / 3600.0 * tick_seconds;

        // Soft cap: sustained speed alone never pushes the score below the
        // floor, and never lifts a score that events already took lower.
        if speed_kmh > params.high_speed_kmh && self.score > params.high_speed_floor {
            self.score = (self.score - params.high_speed_penalty).max(params.high_speed_floor);
        }
    }

    /// One-shot penalty for an accelerate impulse
    pub fn penalize_accelerate(&mut self, params: &TripParams) {
        self.apply_event_penalty(params.accelerate_penalty);
    }

    /// One-shot penalty for braking at `speed_kmh` (the speed before braking)
    pub fn penalize_brake(&mut self, speed_kmh: f64, params: &TripParams) {
        if speed_kmh > params.brake_penalty_min_speed {
            self.apply_event_penalty(params.brake_penalty);
        }
    }

    fn apply_event_penalty(&mut self, penalty: f64) {
        self.score = (self.score - penalty).max(0.0);
    }

    /// Average speed so far
    pub fn avg_speed_kmh(&self) -> f64 {
        average_speed_kmh(self.distance_km, self.duration_seconds)
    }

    /// Freeze into a record
    pub fn finish(self) -> TripRecord {
        let avg_speed_kmh = self.avg_speed_kmh();
        TripRecord {
            id: self.id,
            start_timestamp: self.started_at,
            distance_km: self.distance_km,
            duration_seconds: self.duration_seconds,
            avg_speed_kmh,
            score: self.score,
        }
    }
}
