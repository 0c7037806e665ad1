use anyhow::Result;
use clap::Parser;
use playwall_config::Config;
use playwall_common::{
    CommandBuilder, DisplaySource, ErrorReporting, KeyboardExitTrigger, Orchestrator, PlaywallError,
    Playlist, ProcessReaper, ProcessSpawner, StaticDisplays, SystemDisplays, VideoDiscovery,
    display::enumerate_displays, format_duration,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "playwall")]
#[command(about = "Loop videos full-screen across every monitor and rotate them periodically")]
#[command(version)]
struct Args {
    /// Configuration file (defaults to <config dir>/playwall/config.toml)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Print the detected displays and exit
    #[arg(long)]
    list_displays: bool,

    /// Print the player commands for the initial assignment and exit
    #[arg(long)]
    dry_run: bool,
}

fn fatal(context: &'static str) -> impl Fn(PlaywallError) -> anyhow::Error {
    move |e| {
        log::error!("{}: {}", context, e.user_friendly_message());
        anyhow::anyhow!("{}: {}", context, e.user_friendly_message())
    }
}

fn display_source(config: &Config) -> Box<dyn DisplaySource> {
    if config.displays.is_empty() {
        Box::new(SystemDisplays)
    } else {
        log::info!("Using {} display(s) from configuration", config.displays.len());
        Box::new(StaticDisplays::from_rects(&config.display_rects()))
    }
}

fn dry_run(source: &dyn DisplaySource, builder: &CommandBuilder, videos: Vec<PathBuf>) -> Result<()> {
    let displays = enumerate_displays(source).map_err(fatal("Display detection failed"))?;
    let playlist = Playlist::new(videos, displays.len()).map_err(fatal("Display detection failed"))?;

    for item in playlist.items() {
        let display = &displays[item.display()];
        println!("{:?}", builder.build_play_command(item.path(), display));
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    log::info!("Starting playwall...");

    let config = Config::load(args.config.as_deref())
        .map_err(fatal("Configuration error"))?;
    let source = display_source(&config);

    if args.list_displays {
        let displays = enumerate_displays(source.as_ref()).map_err(fatal("Display detection failed"))?;
        for display in displays {
            println!("{}: {}", display, display.geometry());
        }
        return Ok(());
    }

    // Startup validation: nothing is reaped or spawned until these pass
    let player = VideoDiscovery::resolve_player(&config.player_path())
        .map_err(fatal("Startup validation failed"))?;
    let videos = VideoDiscovery::collect(&config.video_paths(), config.video_dir().as_deref())
        .map_err(fatal("Startup validation failed"))?;
    log::info!("Using player {:?} with {} video(s)", player, videos.len());

    let builder = CommandBuilder::new(player, config.log_dir());

    if args.dry_run {
        return dry_run(source.as_ref(), &builder, videos);
    }

    let timing = config.timing();
    let reaper = ProcessReaper::new(&config.player.process_name, config.timing.terminate_grace);
    let orchestrator = Orchestrator::new(
        videos,
        builder,
        ProcessSpawner,
        reaper,
        KeyboardExitTrigger::new(),
        timing,
    );

    let shutdown = orchestrator.shutdown_signal();
    ctrlc::set_handler(move || {
        if shutdown.trigger() {
            log::info!("Termination signal received, shutting down");
        }
    })?;

    let summary = orchestrator.run(source.as_ref())
        .map_err(fatal("Playback failed"))?;

    log::info!(
        "Screensaver stopped: {} display(s), {} initial player(s), {} rotation(s) every {}",
        summary.displays,
        summary.initial_players,
        summary.rotations,
        format_duration(timing.rotation_interval)
    );
    Ok(())
}
