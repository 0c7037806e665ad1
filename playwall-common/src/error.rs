use std::path::PathBuf;
use thiserror::Error;

/// Main error type for playwall operations
#[derive(Error, Debug)]
pub enum PlaywallError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Display error: {0}")]
    Display(#[from] DisplayError),

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {path:?}")]
    FileRead { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse TOML configuration: {message}")]
    TomlParse { message: String },

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Display topology errors
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("No active displays detected")]
    NoDisplays,

    #[error("Failed to query display topology: {message}")]
    Query { message: String },

    #[error("Display {index} has an unusable geometry: {width}x{height}")]
    InvalidGeometry { index: usize, width: u32, height: u32 },
}

/// Player process errors
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to spawn player for {video:?}")]
    Spawn { video: PathBuf, source: std::io::Error },

    #[error("Display index {index} is not among the {count} detected displays")]
    UnknownDisplay { index: usize, count: usize },

    #[error("Failed to start {name} thread")]
    Thread { name: &'static str, source: std::io::Error },
}

/// Startup validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Player binary not found: {path:?}")]
    PlayerNotFound { path: PathBuf },

    #[error("Video file not found: {path:?}")]
    VideoNotFound { path: PathBuf },

    #[error("Video path is not a regular file: {path:?}")]
    NotAFile { path: PathBuf },

    #[error("Failed to read video directory: {path:?}")]
    DirectoryRead { path: PathBuf, source: std::io::Error },

    #[error("No videos configured")]
    NoVideos,

    #[error("Exit key listener unavailable: {message}")]
    ExitKeyUnavailable { message: String },
}

// Convenience type alias
pub type Result<T> = std::result::Result<T, PlaywallError>;

impl From<toml::de::Error> for PlaywallError {
    fn from(err: toml::de::Error) -> Self {
        PlaywallError::Config(ConfigError::TomlParse {
            message: err.to_string(),
        })
    }
}

// Error reporting utilities
pub trait ErrorReporting {
    fn user_friendly_message(&self) -> String;
}

impl ErrorReporting for PlaywallError {
    fn user_friendly_message(&self) -> String {
        match self {
            PlaywallError::Config(ConfigError::FileRead { path, .. }) => {
                format!("Configuration file could not be read: {:?}", path)
            }
            PlaywallError::Config(ConfigError::TomlParse { message }) => {
                format!("Invalid configuration format: {}", message)
            }
            PlaywallError::Display(DisplayError::NoDisplays) => {
                "No active displays were detected. Connect a monitor or add [[displays]] entries to the config.".to_string()
            }
            PlaywallError::Validation(ValidationError::PlayerNotFound { path }) => {
                format!("Player binary not found at {:?}. Install mpv or set [player] path in the config.", path)
            }
            PlaywallError::Validation(ValidationError::VideoNotFound { path }) => {
                format!("Video file not found: {:?}", path)
            }
            PlaywallError::Validation(ValidationError::NoVideos) => {
                "No videos configured. Add 'videos = [...]' or 'video_dir' to the config.".to_string()
            }
            PlaywallError::Validation(ValidationError::ExitKeyUnavailable { message }) => {
                format!("Cannot listen for the exit key ({}). A graphical session with input access is required.", message)
            }
            _ => self.to_string(),
        }
    }
}
