use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::time::Duration;
use playwall_common::{PlaywallError, error::ConfigError, Result, Timing};

// Custom deserialization for Duration from human-readable strings
fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let duration_str = String::deserialize(deserializer)?;
    playwall_common::duration::parse_duration(&duration_str)
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub videos: Vec<String>,
    #[serde(default)]
    pub video_dir: Option<String>,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub displays: Vec<DisplayConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_path")]
    pub path: String,
    #[serde(default = "default_process_name")]
    pub process_name: String,
    #[serde(default)]
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_rotation_interval", deserialize_with = "deserialize_duration")]
    pub rotation_interval: Duration,
    #[serde(default = "default_launch_delay", deserialize_with = "deserialize_duration")]
    pub launch_delay: Duration,
    #[serde(default = "default_terminate_grace", deserialize_with = "deserialize_duration")]
    pub terminate_grace: Duration,
}

/// One `[[displays]]` entry overriding OS display enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

// Default values
fn default_player_path() -> String {
    "mpv".to_string()
}

fn default_process_name() -> String {
    "mpv".to_string()
}

fn default_rotation_interval() -> Duration {
    Duration::from_secs(300) // 5 minutes
}

fn default_launch_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_terminate_grace() -> Duration {
    Duration::from_millis(500)
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            path: default_player_path(),
            process_name: default_process_name(),
            log_dir: None,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            rotation_interval: default_rotation_interval(),
            launch_delay: default_launch_delay(),
            terminate_grace: default_terminate_grace(),
        }
    }
}

impl Config {
    /// Loads `path`, or the default location when `path` is `None`.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => {
                let config_path = Self::config_path()?;
                if !config_path.exists() {
                    log::info!("No config file at {:?}, using defaults", config_path);
                    return Ok(Self::default());
                }
                Self::load_from_path(&config_path)
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PlaywallError::Config(ConfigError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }))?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;

        log::info!("Configuration loaded from {:?}", path);
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(PlaywallError::Config(ConfigError::NoConfigDir))?
            .join("playwall");

        Ok(config_dir.join("config.toml"))
    }

    pub fn video_paths(&self) -> Vec<PathBuf> {
        self.videos.iter().map(PathBuf::from).collect()
    }

    pub fn video_dir(&self) -> Option<PathBuf> {
        self.video_dir.as_ref().map(PathBuf::from)
    }

    pub fn player_path(&self) -> PathBuf {
        PathBuf::from(&self.player.path)
    }

    pub fn log_dir(&self) -> PathBuf {
        match &self.player.log_dir {
            Some(dir) => PathBuf::from(dir),
            None => dirs::state_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join("playwall"),
        }
    }

    /// `(x, y, width, height)` of every configured display, in order.
    pub fn display_rects(&self) -> Vec<(i32, i32, u32, u32)> {
        self.displays.iter().map(|d| (d.x, d.y, d.width, d.height)).collect()
    }

    pub fn timing(&self) -> Timing {
        Timing {
            rotation_interval: self.timing.rotation_interval,
            launch_delay: self.timing.launch_delay,
            ..Timing::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if self.timing.rotation_interval < Duration::from_secs(1) {
            return Err(PlaywallError::Config(ConfigError::InvalidValue {
                field: "timing.rotation_interval".to_string(),
                value: format!("{:?}", self.timing.rotation_interval),
            }));
        }

        if self.player.path.trim().is_empty() {
            return Err(PlaywallError::Config(ConfigError::InvalidValue {
                field: "player.path".to_string(),
                value: self.player.path.clone(),
            }));
        }

        if self.player.process_name.trim().is_empty() {
            return Err(PlaywallError::Config(ConfigError::InvalidValue {
                field: "player.process_name".to_string(),
                value: self.player.process_name.clone(),
            }));
        }

        for (i, display) in self.displays.iter().enumerate() {
            if display.width == 0 || display.height == 0 {
                return Err(PlaywallError::Config(ConfigError::InvalidValue {
                    field: format!("displays[{}]", i),
                    value: format!("{}x{}", display.width, display.height),
                }));
            }
        }

        Ok(())
    }
}
