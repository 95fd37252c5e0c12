//! Headless cockpit driver
//!
//! Loads configuration, runs the simulation on its own task and plays a
//! short scripted drive against it, logging what a display would show.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cockpit_core::cockpit::CockpitSnapshot;
use cockpit_core::config::CockpitConfig;
use cockpit_core::gauge::{self, GaugeSpec};
use cockpit_core::runtime::{self, CockpitHandle};
use cockpit_core::telemetry::{Gear, TpmsUpdate};
use cockpit_core::trip::{export, TripRecord};
use cockpit_core::unit_conversion::{celsius_to_fahrenheit, kmh_to_mph};
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "cockpit.json";
const CRUISE_IMPULSES: usize = 18;

#[derive(Parser, Debug)]
#[command(name = "cockpit", version, about = "Simulated vehicle cockpit")]
struct Cli {
    /// Configuration file. Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seconds to cruise before braking
    #[arg(long, default_value_t = 10)]
    seconds: u64,
    /// Write recent trips to this JSON file on exit
    #[arg(long)]
    export: Option<PathBuf>,
    /// Seed the noise source for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
    /// Report speed in mph and temperatures in °F
    #[arg(long)]
    imperial: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let sim = runtime::spawn(&config).context("failed to start simulation")?;
    let handle = sim.handle();
    let period = config.tick_period();

    drive(&handle, period, cli.seconds, cli.imperial).await?;

    let cockpit = sim.shutdown().await?;
    tracing::info!(
        ticks = cockpit.simulator().ticks(),
        trips = cockpit.trips().trip_count(),
        "Simulation finished"
    );

    if let Some(path) = &cli.export {
        let recent: Vec<_> = cockpit.trips().recent_trips().cloned().collect();
        export_trips(path, recent, config.trip.max_recent_trips)?;
    }
    Ok(())
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cockpit").join(CONFIG_FILE))
}

fn load_config(explicit: Option<&Path>) -> Result<CockpitConfig> {
    if let Some(path) = explicit {
        return CockpitConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()));
    }
    match default_config_path() {
        Some(path) if path.exists() => CockpitConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        _ => {
            tracing::info!("No config file found, using defaults");
            Ok(CockpitConfig::default())
        }
    }
}

async fn drive(
    handle: &CockpitHandle,
    period: Duration,
    cruise_secs: u64,
    imperial: bool,
) -> Result<()> {
    let mode = handle.toggle_drive_mode().await?;
    tracing::info!(?mode, "Drive mode selected");
    handle.start_trip().await?;

    for _ in 0..CRUISE_IMPULSES {
        handle.accelerate().await?;
        tokio::time::sleep(period).await;
    }

    let mut report = tokio::time::interval(Duration::from_secs(1));
    for second in 0..cruise_secs {
        report.tick().await;
        if second == cruise_secs / 2 {
            // Slow leak on the rear right tire
            handle
                .update_tpms(TpmsUpdate {
                    rr: Some(28.5),
                    ..Default::default()
                })
                .await?;
        }
        log_snapshot(&handle.snapshot(), imperial);
    }

    while handle.snapshot().vehicle.is_moving() {
        handle.brake().await?;
        tokio::time::sleep(period).await;
    }
    handle.set_gear(Gear::P).await?;

    match handle.stop_trip().await? {
        Some(record) => tracing::info!(
            distance_km = %format!("{:.2}", record.distance_km),
            duration = %record.formatted_duration(),
            avg_speed_kmh = %format!("{:.1}", record.avg_speed_kmh),
            score = %format!("{:.1}", record.score),
            band = ?record.score_band(),
            "Trip recorded"
        ),
        None => tracing::warn!("No trip was active"),
    }
    log_snapshot(&handle.snapshot(), imperial);
    Ok(())
}

fn log_snapshot(snapshot: &CockpitSnapshot, imperial: bool) {
    let vehicle = &snapshot.vehicle;
    let (speed, coolant) = if imperial {
        (
            format!("{:.0} mph", kmh_to_mph(vehicle.speed)),
            format!("{:.1} °F", celsius_to_fahrenheit(vehicle.coolant_temp)),
        )
    } else {
        (
            format!("{:.0} km/h", vehicle.speed),
            format!("{:.1} °C", vehicle.coolant_temp),
        )
    };
    tracing::info!(
        tick = snapshot.tick,
        speed = %speed,
        rpm = vehicle.rpm.round(),
        gear = %vehicle.gear,
        coolant = %coolant,
        fuel = %format!("{:.2}", vehicle.fuel_level),
        range_km = vehicle.range.round(),
        status = ?snapshot.status.worst(),
        score = %format!("{:.1}", snapshot.driving_score()),
        "Cockpit"
    );

    if let Some(alert) = &snapshot.alert {
        tracing::warn!(?alert, "{}", alert.message());
    }
    let low = snapshot.tpms.low_tires();
    if !low.is_empty() {
        tracing::warn!(tires = ?low, "Low tire pressure");
    }

    let speedo = gauge::render(&GaugeSpec::speed(vehicle.speed));
    let tacho = gauge::render(&GaugeSpec::rpm(vehicle.rpm));
    tracing::debug!(
        angle = speedo.angle,
        track = %speedo.background_path(),
        active = ?speedo.active_path(),
        ticks = speedo.tick_paths().len(),
        "Speedometer"
    );
    tracing::debug!(
        angle = tacho.angle,
        track = %tacho.background_path(),
        active = ?tacho.active_path(),
        "Tachometer"
    );
}

fn export_trips(path: &Path, recent: Vec<TripRecord>, limit: usize) -> Result<()> {
    let older = if path.exists() {
        export::read_json(path)
            .with_context(|| format!("failed to read trip history from {}", path.display()))?
    } else {
        Vec::new()
    };

    // Trips already in the file keep their place behind this run's trips
    let known: Vec<_> = recent.iter().map(|t| t.id).collect();
    let older = older.into_iter().filter(|t| !known.contains(&t.id));
    let merged = export::merge_newest_first(recent, older, limit);

    export::write_json(path, &merged)
        .with_context(|| format!("failed to write trip history to {}", path.display()))?;
    tracing::info!(path = %path.display(), count = merged.len(), "Exported trips");
    Ok(())
}
