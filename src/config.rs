//! User configuration, read from `~/.config/podtune/config.toml`.
//!
//! Every field has a default; a missing file just means defaults. A
//! missing `track` disables the player entirely (the UI still runs).

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use color_eyre::Result;
use serde::Deserialize;

/// Initial volume, and the level restored on unmute.
pub const DEFAULT_VOLUME: f32 = 0.3;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the background track. Absent means no player on this run.
    pub track: Option<PathBuf>,
    /// Playback volume, 0.0 to 1.0.
    pub volume: f32,
    /// How long a notification stays on screen, in milliseconds.
    pub notification_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            track: None,
            volume: DEFAULT_VOLUME,
            notification_timeout_ms: 4000,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("podtune").join("config.toml"))
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.track.is_none());
        assert_eq!(config.volume, DEFAULT_VOLUME);
        assert_eq!(config.notification_timeout(), Duration::from_millis(4000));
    }

    #[test]
    fn fields_override_defaults() {
        let config: Config = toml::from_str(
            r#"
            track = "/music/theme.mp3"
            volume = 0.5
            notification_timeout_ms = 3000
            "#,
        )
        .unwrap();
        assert_eq!(config.track.as_deref(), Some(std::path::Path::new("/music/theme.mp3")));
        assert_eq!(config.volume, 0.5);
        assert_eq!(config.notification_timeout(), Duration::from_millis(3000));
    }
}
