pub mod command_builder;
pub mod display;
pub mod duration;
pub mod error;
pub mod exit;
pub mod launcher;
pub mod orchestrator;
pub mod playlist;
pub mod reaper;
pub mod rotation;
pub mod shutdown;
pub mod video_discovery;

pub use command_builder::CommandBuilder;
pub use display::{Display, DisplaySource, StaticDisplays, SystemDisplays};
pub use duration::{format_duration, parse_duration};
pub use error::{PlaywallError, Result, ErrorReporting};
pub use exit::{ExitListener, ExitTrigger, KeyboardExitTrigger};
pub use launcher::{Launcher, PlayerProcess, ProcessSpawner, Spawn};
pub use orchestrator::{Orchestrator, RunSummary, Timing};
pub use playlist::{PlaybackItem, Playlist};
pub use reaper::{ProcessReaper, Reap};
pub use rotation::RotationScheduler;
pub use shutdown::ShutdownSignal;
pub use video_discovery::VideoDiscovery;
