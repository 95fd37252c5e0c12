use cockpit_core::config::{CockpitConfig, SimulationParams, TripParams};
use cockpit_core::error::CockpitError;
use pretty_assertions::assert_eq;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_defaults() {
    let config = CockpitConfig::default();
    assert_eq!(config.tick_period(), Duration::from_millis(100));
    assert_eq!(config.tick_seconds(), 0.1);
    assert_eq!(config.seed, None);
    assert_eq!(config.trip.max_recent_trips, 50);
    assert_eq!(config.simulation.full_tank_range_km, 600.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cockpit.json");

    let config = CockpitConfig {
        tick_period_ms: 1000,
        seed: Some(42),
        simulation: SimulationParams {
            rpm_jitter: 0.0,
            ..Default::default()
        },
        trip: TripParams {
            max_recent_trips: 10,
            ..Default::default()
        },
    };
    config.save(&path).unwrap();

    let loaded = CockpitConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cockpit.json");
    fs::write(&path, r#"{ "seed": 3, "trip": { "brake_penalty": 5 } }"#).unwrap();

    let config = CockpitConfig::from_file(&path).unwrap();
    assert_eq!(config.seed, Some(3));
    assert_eq!(config.tick_period_ms, 100);
    assert_eq!(config.trip.brake_penalty, 5.0);
    assert_eq!(config.trip.accelerate_penalty, 2.0);
    assert_eq!(config.simulation, SimulationParams::default());
}

#[test]
fn test_invalid_values_are_rejected_on_load() {
    let dir = tempdir().unwrap();

    let cases = [
        r#"{ "tick_period_ms": 0 }"#,
        r#"{ "simulation": { "rpm_smoothing": 0 } }"#,
        r#"{ "simulation": { "rpm_smoothing": 1.5 } }"#,
        r#"{ "simulation": { "fuel_drain": -0.1 } }"#,
        r#"{ "simulation": { "idle_rpm": 9000 } }"#,
        r#"{ "simulation": { "idle_rpm": -50 } }"#,
        r#"{ "simulation": { "rpm_jitter": 1e308 } }"#,
        r#"{ "simulation": { "load_noise": 9000 } }"#,
        r#"{ "trip": { "high_speed_floor": 120 } }"#,
        r#"{ "trip": { "accelerate_penalty": -2 } }"#,
    ];
    for (i, json) in cases.iter().enumerate() {
        let path = dir.path().join(format!("bad-{i}.json"));
        fs::write(&path, json).unwrap();
        assert!(
            matches!(
                CockpitConfig::from_file(&path),
                Err(CockpitError::InvalidConfig(_))
            ),
            "expected {json} to be rejected"
        );
    }
}

#[test]
fn test_malformed_and_missing_files() {
    let dir = tempdir().unwrap();

    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        CockpitConfig::from_file(&path),
        Err(CockpitError::Json(_))
    ));

    assert!(matches!(
        CockpitConfig::from_file(dir.path().join("absent.json")),
        Err(CockpitError::Io(_))
    ));
}

#[test]
fn test_boundary_values_are_accepted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("edge.json");
    fs::write(
        &path,
        r#"{ "simulation": { "idle_rpm": 8000, "rpm_jitter": 8000, "charging_noise": 0 } }"#,
    )
    .unwrap();

    let config = CockpitConfig::from_file(&path).unwrap();
    assert_eq!(config.simulation.idle_rpm, 8000.0);
    assert_eq!(config.simulation.rpm_jitter, 8000.0);
}
