use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use crate::duration::format_duration;
use crate::launcher::{Launcher, Spawn};
use crate::playlist::Playlist;
use crate::reaper::Reap;
use crate::shutdown::ShutdownSignal;

/// Periodically shifts the playlist assignment and relaunches the players.
///
/// Owns the playlist, the launcher and the current generation of handles for
/// the whole run; nothing else mutates them.
pub struct RotationScheduler<S: Spawn, R: Reap> {
    playlist: Playlist,
    launcher: Launcher<S, R>,
    generation: Vec<S::Handle>,
    period: Duration,
    shutdown: ShutdownSignal,
}

impl<S, R> RotationScheduler<S, R>
where
    S: Spawn + 'static,
    R: Reap + 'static,
{
    pub fn new(
        playlist: Playlist,
        launcher: Launcher<S, R>,
        generation: Vec<S::Handle>,
        period: Duration,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self { playlist, launcher, generation, period, shutdown }
    }

    /// Runs until the shutdown signal is set. Returns the number of rotations performed.
    pub fn run(mut self) -> usize {
        log::info!("Videos will rotate every {} across monitors", format_duration(self.period));
        let mut rotations = 0;

        loop {
            if self.shutdown.wait_timeout(self.period) {
                break;
            }
            // The timer expired; shutdown may have raced it
            if self.shutdown.is_set() {
                break;
            }

            self.playlist.rotate();
            log::info!("Rotating videos, new screen assignment: {:?}", self.playlist.assignment());

            // Replaces the previous generation; its processes were reaped by the launcher
            self.generation = self.launcher.launch(&self.playlist);
            rotations += 1;

            if self.shutdown.is_set() {
                // Players from this batch may have started after the final reap
                log::info!("Shutdown requested during relaunch, stopping new players");
                self.launcher.reaper().reap();
                break;
            }
        }

        self.generation.clear();
        log::debug!("Rotation scheduler stopped after {} rotation(s)", rotations);
        rotations
    }

    pub fn spawn(self) -> io::Result<JoinHandle<usize>> {
        thread::Builder::new()
            .name("playwall-rotation".to_string())
            .spawn(move || self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command_builder::CommandBuilder;
    use crate::display::Display;
    use crate::launcher::testing::{CountingReaper, RecordingSpawner};
    use std::path::PathBuf;
    use std::time::Instant;

    fn scheduler(
        spawner: RecordingSpawner,
        reaper: CountingReaper,
        period: Duration,
        shutdown: ShutdownSignal,
    ) -> RotationScheduler<RecordingSpawner, CountingReaper> {
        let displays = vec![Display::new(0, 0, 0, 1920, 1080), Display::new(1, 1920, 0, 1920, 1080)];
        let videos = (0..3).map(|i| PathBuf::from(format!("/videos/{}.mp4", i))).collect();
        let playlist = Playlist::new(videos, displays.len()).unwrap();
        let launcher = Launcher::new(
            CommandBuilder::new(PathBuf::from("mpv"), std::env::temp_dir().join("playwall-rotation-tests")),
            displays,
            spawner,
            reaper,
        )
        .with_launch_delay(Duration::ZERO);
        RotationScheduler::new(playlist, launcher, Vec::new(), period, shutdown)
    }

    #[test]
    fn test_shutdown_interrupts_wait_without_rotating() {
        let shutdown = ShutdownSignal::new();
        let spawner = RecordingSpawner::default();
        let reaper = CountingReaper::default();
        let handle = scheduler(spawner.clone(), reaper.clone(), Duration::from_secs(300), shutdown.clone())
            .spawn()
            .unwrap();

        thread::sleep(Duration::from_millis(50));
        let start = Instant::now();
        shutdown.trigger();

        assert_eq!(handle.join().unwrap(), 0);
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(spawner.spawned.lock().unwrap().is_empty());
        assert_eq!(reaper.count(), 0);
    }

    #[test]
    fn test_already_set_shutdown_stops_immediately() {
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();
        let spawner = RecordingSpawner::default();

        let rotations = scheduler(spawner.clone(), CountingReaper::default(), Duration::from_millis(10), shutdown).run();

        assert_eq!(rotations, 0);
        assert!(spawner.spawned.lock().unwrap().is_empty());
    }

    #[test]
    fn test_shutdown_during_relaunch_reaps_again() {
        let shutdown = ShutdownSignal::new();
        let spawner = RecordingSpawner {
            shutdown_on_spawn: Some(shutdown.clone()),
            ..Default::default()
        };
        let reaper = CountingReaper::default();

        let rotations = scheduler(spawner.clone(), reaper.clone(), Duration::from_millis(10), shutdown.clone()).run();

        assert_eq!(rotations, 1);
        // The batch still completes, then the launcher reap is followed by a second one
        assert_eq!(spawner.spawned.lock().unwrap().len(), 3);
        assert_eq!(reaper.count(), 2);
        assert!(shutdown.is_set());
    }

    #[test]
    fn test_each_tick_rotates_and_relaunches() {
        let shutdown = ShutdownSignal::new();
        let spawner = RecordingSpawner::default();
        let reaper = CountingReaper::default();
        let handle = scheduler(spawner.clone(), reaper.clone(), Duration::from_millis(100), shutdown.clone())
            .spawn()
            .unwrap();

        // Wait for at least two relaunches of three items each
        let deadline = Instant::now() + Duration::from_secs(10);
        while spawner.spawned.lock().unwrap().len() < 6 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        shutdown.trigger();
        let rotations = handle.join().unwrap();

        assert!(rotations >= 2);
        assert!(reaper.count() >= rotations);

        let spawned = spawner.spawned.lock().unwrap();
        let first: Vec<_> = spawned[0..3].iter().map(|(_, display, _)| *display).collect();
        let second: Vec<_> = spawned[3..6].iter().map(|(_, display, _)| *display).collect();
        // [0, 1, 0] -> [1, 0, 0] -> [0, 0, 1]
        assert_eq!(first, vec![1, 0, 0]);
        assert_eq!(second, vec![0, 0, 1]);
    }
}
