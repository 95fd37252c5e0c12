//! Trip recorder
//!
//! Two states: inactive (no session) and active (one session). Starting an
//! active trip and stopping an inactive one are ignored rather than treated
//! as errors.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use super::{TripRecord, TripSession, INITIAL_SCORE};
use crate::config::TripParams;

/// Trip state machine and recent-trip history
#[derive(Debug, Clone)]
pub struct TripRecorder {
    params: TripParams,
    /// Seconds each tick represents
    tick_seconds: f64,
    session: Option<TripSession>,
    /// Newest first
    recent: VecDeque<TripRecord>,
}

impl Default for TripRecorder {
    fn default() -> Self {
        Self::new(TripParams::default(), 1.0)
    }
}

impl TripRecorder {
    /// Create a recorder whose ticks each represent `tick_seconds`
    pub fn new(params: TripParams, tick_seconds: f64) -> Self {
        Self {
            recent: VecDeque::with_capacity(params.max_recent_trips.min(64)),
            params,
            tick_seconds,
            session: None,
        }
    }

    /// Whether a trip is being recorded
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Start a trip now. Returns `false` if one was already active.
    pub fn start_trip(&mut self) -> bool {
        self.start_trip_at(Utc::now())
    }

    /// Start a trip with an explicit start time
    pub fn start_trip_at(&mut self, started_at: DateTime<Utc>) -> bool {
        if let Some(session) = &self.session {
            tracing::debug!(trip = %session.id, "Trip already active, ignoring start");
            return false;
        }
        let session = TripSession::new(started_at);
        tracing::info!(trip = %session.id, "Trip started");
        self.session = Some(session);
        true
    }

    /// Stop the active trip and record it.
    ///
    /// Returns `None` if no trip was active.
    pub fn stop_trip(&mut self) -> Option<TripRecord> {
        let Some(session) = self.session.take() else {
            tracing::debug!("No active trip, ignoring stop");
            return None;
        };

        let record = session.finish();
        tracing::info!(
            trip = %record.id,
            distance_km = record.distance_km,
            duration_s = record.duration_seconds,
            avg_speed_kmh = record.avg_speed_kmh,
            score = record.score,
            "Trip stopped"
        );

        self.recent.push_front(record.clone());
        while self.recent.len() > self.params.max_recent_trips {
            self.recent.pop_back();
        }
        Some(record)
    }

    /// Accumulate one tick at the current speed. No-op while inactive.
    pub fn tick(&mut self, speed_kmh: f64) {
        if let Some(session) = &mut self.session {
            session.record_tick(speed_kmh, self.tick_seconds, &self.params);
        }
    }

    /// Score an accelerate impulse. No-op while inactive.
    pub fn on_accelerate(&mut self) {
        if let Some(session) = &mut self.session {
            session.penalize_accelerate(&self.params);
        }
    }

    /// Score a brake impulse given the speed before braking. No-op while inactive.
    pub fn on_brake(&mut self, speed_kmh: f64) {
        if let Some(session) = &mut self.session {
            session.penalize_brake(speed_kmh, &self.params);
        }
    }

    /// The trip in progress
    pub fn session(&self) -> Option<&TripSession> {
        self.session.as_ref()
    }

    /// Seconds recorded in the current trip, 0 when inactive
    pub fn trip_duration(&self) -> f64 {
        self.session.as_ref().map_or(0.0, |s| s.duration_seconds)
    }

    /// Kilometres recorded in the current trip, 0 when inactive
    pub fn trip_distance(&self) -> f64 {
        self.session.as_ref().map_or(0.0, |s| s.distance_km)
    }

    /// Live score, the initial score when inactive
    pub fn driving_score(&self) -> f64 {
        self.session.as_ref().map_or(INITIAL_SCORE, |s| s.score)
    }

    /// Finished trips, newest first
    pub fn recent_trips(&self) -> impl Iterator<Item = &TripRecord> {
        self.recent.iter()
    }

    /// Number of finished trips held
    pub fn trip_count(&self) -> usize {
        self.recent.len()
    }

    /// Seconds each tick represents
    pub fn tick_seconds(&self) -> f64 {
        self.tick_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_basic() {
        let mut recorder = TripRecorder::default();
        assert!(!recorder.is_active());

        assert!(recorder.start_trip());
        assert!(recorder.is_active());

        recorder.tick(36.0);
        assert_eq!(recorder.trip_duration(), 1.0);
        assert!((recorder.trip_distance() - 0.01).abs() < 1e-12);

        let record = recorder.stop_trip().unwrap();
        assert!(!recorder.is_active());
        assert!((record.avg_speed_kmh - 36.0).abs() < 1e-9);
        assert_eq!(recorder.trip_count(), 1);
    }

    #[test]
    fn test_history_is_capped() {
        let params = TripParams {
            max_recent_trips: 2,
            ..TripParams::default()
        };
        let mut recorder = TripRecorder::new(params, 1.0);
        let mut ids = Vec::new();
        for _ in 0..3 {
            recorder.start_trip();
            ids.push(recorder.stop_trip().unwrap().id);
        }
        let kept: Vec<_> = recorder.recent_trips().map(|t| t.id).collect();
        assert_eq!(kept, vec![ids[2], ids[1]]);
    }

    #[test]
    fn test_inactive_events_are_ignored() {
        let mut recorder = TripRecorder::default();
        recorder.on_accelerate();
        recorder.on_brake(120.0);
        recorder.tick(120.0);
        assert_eq!(recorder.driving_score(), 100.0);
        assert_eq!(recorder.trip_duration(), 0.0);
        assert!(recorder.stop_trip().is_none());
    }
}
