use std::io;
use std::process::{Child, Command};
use std::thread;
use std::time::Duration;
use crate::command_builder::CommandBuilder;
use crate::display::Display;
use crate::error::{ErrorReporting, PlaywallError, ProcessError};
use crate::playlist::Playlist;
use crate::reaper::Reap;

/// Starts one player process from a prepared command.
pub trait Spawn: Send {
    type Handle: Send + 'static;

    fn spawn(&mut self, item_index: usize, display: &Display, command: Command) -> io::Result<Self::Handle>;
}

/// A running player instance.
#[derive(Debug)]
pub struct PlayerProcess {
    child: Child,
    display: usize,
}

impl Drop for PlayerProcess {
    fn drop(&mut self) {
        // Collect the exit status if the reaper already stopped it
        if let Ok(Some(status)) = self.child.try_wait() {
            log::debug!("Player {} on screen {} exited: {}", self.child.id(), self.display, status);
        }
    }
}

/// Spawns real OS processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessSpawner;

impl Spawn for ProcessSpawner {
    type Handle = PlayerProcess;

    fn spawn(&mut self, _item_index: usize, display: &Display, mut command: Command) -> io::Result<PlayerProcess> {
        let child = command.spawn()?;
        Ok(PlayerProcess { child, display: display.index })
    }
}

/// Replaces the running players with one new generation per call.
pub struct Launcher<S: Spawn, R: Reap> {
    builder: CommandBuilder,
    displays: Vec<Display>,
    spawner: S,
    reaper: R,
    launch_delay: Duration,
    log_dir_ready: bool,
}

impl<S: Spawn, R: Reap> Launcher<S, R> {
    pub fn new(builder: CommandBuilder, displays: Vec<Display>, spawner: S, reaper: R) -> Self {
        Self {
            builder,
            displays,
            spawner,
            reaper,
            launch_delay: Duration::from_secs(1),
            log_dir_ready: false,
        }
    }

    /// Pause between successive spawns.
    pub fn with_launch_delay(mut self, launch_delay: Duration) -> Self {
        self.launch_delay = launch_delay;
        self
    }

    pub fn reaper(&self) -> &R {
        &self.reaper
    }

    fn ensure_log_dir(&mut self) {
        if self.log_dir_ready {
            return;
        }
        if let Err(e) = std::fs::create_dir_all(self.builder.log_dir()) {
            log::warn!("Failed to create log directory {:?}: {}", self.builder.log_dir(), e);
        }
        self.log_dir_ready = true;
    }

    fn resolve(&self, index: usize) -> Result<&Display, PlaywallError> {
        self.displays
            .get(index)
            .ok_or_else(|| PlaywallError::Process(ProcessError::UnknownDisplay {
                index,
                count: self.displays.len(),
            }))
    }

    /// Reaps every running player, then spawns one per playlist item.
    ///
    /// A failed spawn is logged and skipped; the remaining items still launch.
    pub fn launch(&mut self, playlist: &Playlist) -> Vec<S::Handle> {
        self.reaper.reap();
        self.ensure_log_dir();

        let mut handles = Vec::with_capacity(playlist.len());
        for (i, item) in playlist.items().iter().enumerate() {
            if i > 0 && !self.launch_delay.is_zero() {
                thread::sleep(self.launch_delay);
            }

            let display = match self.resolve(item.display()) {
                Ok(display) => *display,
                Err(e) => {
                    log::error!("Skipping {:?}: {}", item.path(), e.user_friendly_message());
                    continue;
                }
            };

            let command = self.builder.build_play_command(item.path(), &display);
            log::debug!("Executing player command: {:?}", command);

            match self.spawner.spawn(i, &display, command) {
                Ok(handle) => {
                    log::info!("Started player for {:?} on {}", item.path(), display);
                    handles.push(handle);
                }
                Err(source) => {
                    let reason = source.to_string();
                    let e = PlaywallError::Process(ProcessError::Spawn {
                        video: item.path().to_path_buf(),
                        source,
                    });
                    log::error!("{} on screen {} ({}), skipping", e, display.index, reason);
                }
            }
        }

        handles
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{CountingReaper, RecordingSpawner};
    use super::*;
    use std::path::PathBuf;
    use std::time::Instant;

    fn displays(count: usize) -> Vec<Display> {
        (0..count)
            .map(|i| Display::new(i, 1920 * i as i32, 0, 1920, 1080))
            .collect()
    }

    fn playlist(items: usize, display_count: usize) -> Playlist {
        let videos = (0..items).map(|i| PathBuf::from(format!("/videos/{}.mp4", i))).collect();
        Playlist::new(videos, display_count).unwrap()
    }

    fn launcher(spawner: RecordingSpawner, reaper: CountingReaper, display_count: usize) -> Launcher<RecordingSpawner, CountingReaper> {
        let log_dir = std::env::temp_dir().join("playwall-launcher-tests");
        Launcher::new(
            CommandBuilder::new(PathBuf::from("mpv"), log_dir),
            displays(display_count),
            spawner,
            reaper,
        )
        .with_launch_delay(Duration::ZERO)
    }

    #[test]
    fn test_launch_reaps_then_spawns_every_item() {
        let spawner = RecordingSpawner::default();
        let reaper = CountingReaper::default();
        let mut launcher = launcher(spawner.clone(), reaper.clone(), 2);

        let handles = launcher.launch(&playlist(3, 2));

        assert_eq!(reaper.count(), 1);
        assert_eq!(handles, vec![0, 1, 2]);
        let spawned = spawner.spawned.lock().unwrap();
        let placements: Vec<_> = spawned.iter().map(|(item, display, _)| (*item, *display)).collect();
        assert_eq!(placements, vec![(0, 0), (1, 1), (2, 0)]);
        assert!(spawned[1].2.contains(&"--geometry=1920x1080+1920+0".to_string()));
        assert!(spawned[1].2.contains(&"--fs-screen=1".to_string()));
    }

    #[test]
    fn test_spawn_failure_skips_only_that_item() {
        let spawner = RecordingSpawner {
            fail_items: vec![1],
            ..Default::default()
        };
        let reaper = CountingReaper::default();
        let mut launcher = launcher(spawner.clone(), reaper, 5);

        let handles = launcher.launch(&playlist(5, 5));

        assert_eq!(handles, vec![0, 2, 3, 4]);
        let launched: Vec<_> = spawner.spawned.lock().unwrap().iter().map(|(item, _, _)| *item).collect();
        assert_eq!(launched, vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_unresolvable_display_is_skipped() {
        let spawner = RecordingSpawner::default();
        // Playlist built for three displays, launcher only knows two
        let mut launcher = launcher(spawner.clone(), CountingReaper::default(), 2);

        let handles = launcher.launch(&playlist(3, 3));

        assert_eq!(handles, vec![0, 1]);
    }

    #[test]
    fn test_launch_delay_between_spawns() {
        let spawner = RecordingSpawner::default();
        let mut launcher = launcher(spawner, CountingReaper::default(), 3)
            .with_launch_delay(Duration::from_millis(40));

        let start = Instant::now();
        launcher.launch(&playlist(3, 3));
        // Two gaps for three spawns
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[test]
    fn test_launch_creates_log_dir() {
        let root = tempfile::tempdir().unwrap();
        let log_dir = root.path().join("logs").join("playwall");
        let mut launcher = Launcher::new(
            CommandBuilder::new(PathBuf::from("mpv"), log_dir.clone()),
            displays(1),
            RecordingSpawner::default(),
            CountingReaper::default(),
        );

        launcher.launch(&playlist(1, 1));
        assert!(log_dir.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_spawner_reports_missing_binary() {
        let mut spawner = ProcessSpawner;
        let display = Display::new(0, 0, 0, 640, 480);
        let result = spawner.spawn(0, &display, Command::new("/nonexistent/playwall-player"));
        assert!(result.is_err());
    }
}
