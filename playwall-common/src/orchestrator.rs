use std::path::PathBuf;
use std::time::Duration;
use crate::command_builder::CommandBuilder;
use crate::display::{enumerate_displays, DisplaySource};
use crate::exit::{ExitListener, ExitTrigger};
use crate::launcher::{Launcher, Spawn};
use crate::playlist::Playlist;
use crate::reaper::Reap;
use crate::rotation::RotationScheduler;
use crate::shutdown::ShutdownSignal;
use crate::error::{PlaywallError, ProcessError};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub rotation_interval: Duration,
    pub launch_delay: Duration,
    /// How often the main thread checks the shutdown signal.
    pub poll_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            rotation_interval: Duration::from_secs(300),
            launch_delay: Duration::from_secs(1),
            poll_interval: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub displays: usize,
    pub initial_players: usize,
    pub rotations: usize,
}

pub struct Orchestrator<S: Spawn, R: Reap + Clone, T: ExitTrigger> {
    videos: Vec<PathBuf>,
    builder: CommandBuilder,
    spawner: S,
    reaper: R,
    exit_trigger: T,
    timing: Timing,
    shutdown: ShutdownSignal,
}

impl<S, R, T> Orchestrator<S, R, T>
where
    S: Spawn + 'static,
    R: Reap + Clone + 'static,
    T: ExitTrigger + 'static,
{
    pub fn new(
        videos: Vec<PathBuf>,
        builder: CommandBuilder,
        spawner: S,
        reaper: R,
        exit_trigger: T,
        timing: Timing,
    ) -> Self {
        Self {
            videos,
            builder,
            spawner,
            reaper,
            exit_trigger,
            timing,
            shutdown: ShutdownSignal::new(),
        }
    }

    /// Handle on the signal that ends [`Orchestrator::run`].
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Launches the players, rotates them until shutdown, then tears everything down.
    pub fn run(self, display_source: &dyn DisplaySource) -> Result<RunSummary> {
        let displays = enumerate_displays(display_source)?;
        let playlist = Playlist::new(self.videos, displays.len())?;
        let display_count = displays.len();

        let mut exit_listener = ExitListener::new(self.exit_trigger, self.shutdown.clone());
        exit_listener.prepare()?;

        if self.reaper.reap() > 0 {
            log::info!("Stopped players left over from a previous run");
        }

        let mut launcher = Launcher::new(self.builder, displays, self.spawner, self.reaper.clone())
            .with_launch_delay(self.timing.launch_delay);
        let generation = launcher.launch(&playlist);
        let initial_players = generation.len();
        if initial_players < playlist.len() {
            log::warn!("Only {}/{} players started", initial_players, playlist.len());
        }

        let rotation = RotationScheduler::new(
            playlist,
            launcher,
            generation,
            self.timing.rotation_interval,
            self.shutdown.clone(),
        )
        .spawn()
        .map_err(|source| PlaywallError::Process(ProcessError::Thread { name: "rotation", source }))?;

        let exit = match exit_listener.spawn() {
            Ok(handle) => handle,
            Err(e) => {
                self.shutdown.trigger();
                let _ = rotation.join();
                self.reaper.reap();
                return Err(PlaywallError::Process(ProcessError::Thread { name: "exit listener", source: e }));
            }
        };

        log::info!("Setup complete. Press 'Esc' to stop.");

        while !self.shutdown.wait_timeout(self.timing.poll_interval) {}

        log::info!("Shutting down...");
        self.reaper.reap();

        let rotations = rotation.join().unwrap_or_else(|_| {
            log::error!("Rotation thread panicked");
            0
        });
        if exit.join().is_err() {
            log::error!("Exit listener thread panicked");
        }

        log::info!("Playback stopped");
        Ok(RunSummary {
            displays: display_count,
            initial_players,
            rotations,
        })
    }
}
