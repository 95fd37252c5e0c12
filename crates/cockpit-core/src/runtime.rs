//! Simulation runtime
//!
//! Runs a [`Cockpit`] on a dedicated tokio task. That task is the only
//! writer: it ticks on a fixed period and applies control commands between
//! ticks, so no command ever runs concurrently with a tick. Readers get
//! snapshots through a `watch` channel.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::cockpit::{Cockpit, CockpitSnapshot};
use crate::config::CockpitConfig;
use crate::error::{CockpitError, Result};
use crate::telemetry::{DriveMode, Gear, TpmsUpdate};
use crate::trip::TripRecord;

/// Queue depth for control commands
const COMMAND_BUFFER: usize = 64;

/// Control commands applied by the runtime task
#[derive(Debug)]
pub enum Command {
    /// Accelerate impulse
    Accelerate,
    /// Brake impulse
    Brake,
    /// Move the gear selector
    SetGear(Gear),
    /// Cycle the drive mode, replying with the new one
    ToggleDriveMode(oneshot::Sender<DriveMode>),
    /// Start a trip, replying whether one was opened
    StartTrip(oneshot::Sender<bool>),
    /// Stop the active trip, replying with its record
    StopTrip(oneshot::Sender<Option<TripRecord>>),
    /// Merge a partial tire reading
    UpdateTpms(TpmsUpdate),
    /// Stop ticking and end the task
    Shutdown,
}

/// Answer to a request, sent once the resulting snapshot is published
enum Reply {
    DriveMode(oneshot::Sender<DriveMode>, DriveMode),
    TripStarted(oneshot::Sender<bool>, bool),
    TripStopped(oneshot::Sender<Option<TripRecord>>, Option<TripRecord>),
}

impl Reply {
    fn send(self) {
        // A requester that gave up waiting is not an error
        match self {
            Reply::DriveMode(tx, mode) => {
                let _ = tx.send(mode);
            }
            Reply::TripStarted(tx, started) => {
                let _ = tx.send(started);
            }
            Reply::TripStopped(tx, record) => {
                let _ = tx.send(record);
            }
        }
    }
}

/// Cloneable handle for sending commands and reading snapshots
#[derive(Clone)]
pub struct CockpitHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<CockpitSnapshot>,
}

impl CockpitHandle {
    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CockpitError::RuntimeStopped)
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.send(make(tx)).await?;
        rx.await.map_err(|_| CockpitError::RuntimeStopped)
    }

    /// Accelerate impulse
    pub async fn accelerate(&self) -> Result<()> {
        self.send(Command::Accelerate).await
    }

    /// Brake impulse
    pub async fn brake(&self) -> Result<()> {
        self.send(Command::Brake).await
    }

    /// Move the gear selector
    pub async fn set_gear(&self, gear: Gear) -> Result<()> {
        self.send(Command::SetGear(gear)).await
    }

    /// Cycle the drive mode and return the new one
    pub async fn toggle_drive_mode(&self) -> Result<DriveMode> {
        self.request(Command::ToggleDriveMode).await
    }

    /// Start a trip. `false` means one was already active.
    pub async fn start_trip(&self) -> Result<bool> {
        self.request(Command::StartTrip).await
    }

    /// Stop the active trip, if any, and return its record
    pub async fn stop_trip(&self) -> Result<Option<TripRecord>> {
        self.request(Command::StopTrip).await
    }

    /// Merge a partial tire reading
    pub async fn update_tpms(&self, update: TpmsUpdate) -> Result<()> {
        self.send(Command::UpdateTpms(update)).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> CockpitSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<CockpitSnapshot> {
        self.snapshots.clone()
    }
}

/// A running simulation
pub struct CockpitRuntime {
    handle: CockpitHandle,
    task: JoinHandle<Cockpit>,
}

impl CockpitRuntime {
    /// Handle for talking to the runtime
    pub fn handle(&self) -> CockpitHandle {
        self.handle.clone()
    }

    /// Stop ticking and hand back the cockpit.
    ///
    /// Once this resolves no further tick can fire.
    pub async fn shutdown(self) -> Result<Cockpit> {
        // The task may already be gone; joining still tells us how it ended.
        let _ = self.handle.commands.send(Command::Shutdown).await;
        self.task.await.map_err(|e| {
            tracing::warn!("Cockpit runtime task failed: {e}");
            CockpitError::RuntimeStopped
        })
    }
}

/// Start a runtime from configuration
pub fn spawn(config: &CockpitConfig) -> Result<CockpitRuntime> {
    config.validate()?;
    spawn_cockpit(Cockpit::new(config))
}

/// Start a runtime around an existing cockpit, ticking at the cockpit's
/// own tick period
pub fn spawn_cockpit(cockpit: Cockpit) -> Result<CockpitRuntime> {
    let period = cockpit.tick_period();
    if period.is_zero() {
        return Err(CockpitError::InvalidConfig(
            "tick period must be greater than 0".to_string(),
        ));
    }

    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshot_tx, snapshot_rx) = watch::channel(cockpit.snapshot());

    tracing::info!(period_ms = period.as_millis() as u64, "Cockpit runtime started");
    let task = tokio::spawn(run(cockpit, period, command_rx, snapshot_tx));

    Ok(CockpitRuntime {
        handle: CockpitHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        },
        task,
    })
}

async fn run(
    mut cockpit: Cockpit,
    period: time::Duration,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<CockpitSnapshot>,
) -> Cockpit {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            command = commands.recv() => match command {
                Some(Command::Shutdown) | None => break,
                Some(command) => {
                    let reply = apply(&mut cockpit, command);
                    snapshots.send_replace(cockpit.snapshot());
                    if let Some(reply) = reply {
                        reply.send();
                    }
                }
            },
            _ = ticker.tick() => {
                cockpit.tick();
                snapshots.send_replace(cockpit.snapshot());
            }
        }
    }

    tracing::info!(ticks = cockpit.simulator().ticks(), "Cockpit runtime stopped");
    cockpit
}

fn apply(cockpit: &mut Cockpit, command: Command) -> Option<Reply> {
    match command {
        Command::Accelerate => cockpit.accelerate(),
        Command::Brake => cockpit.brake(),
        Command::SetGear(gear) => cockpit.set_gear(gear),
        Command::ToggleDriveMode(tx) => {
            return Some(Reply::DriveMode(tx, cockpit.toggle_drive_mode()));
        }
        Command::StartTrip(tx) => return Some(Reply::TripStarted(tx, cockpit.start_trip())),
        Command::StopTrip(tx) => return Some(Reply::TripStopped(tx, cockpit.stop_trip())),
        Command::UpdateTpms(update) => cockpit.update_tpms(&update),
        Command::Shutdown => {}
    }
    None
}
