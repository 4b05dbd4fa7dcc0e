use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::http::DEFAULT_BASE_URL;
use crate::controller::ControllerSettings;
use crate::health;
use crate::history::DEFAULT_PAGE_SIZE;
use crate::notification::DEFAULT_TTL;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub session: Option<SessionConfig>,
    pub playback: Option<PlaybackConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    pub health_interval_secs: Option<u64>,
    pub notification_ttl_secs: Option<u64>,
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Player command; the file locator is appended as the last argument.
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub health_interval: Duration,
    pub notification_ttl: Duration,
    pub page_size: usize,
    pub player_command: Option<Vec<String>>,
    pub theme: String,
}

impl Settings {
    pub fn controller(&self) -> ControllerSettings {
        ControllerSettings {
            page_size: self.page_size,
            notification_ttl: self.notification_ttl,
        }
    }
}

impl ConfigFile {
    /// Fill in defaults for anything the file left unset.
    pub fn resolve(&self) -> Settings {
        let server = self.server.clone().unwrap_or_default();
        let session = self.session.clone().unwrap_or_default();
        let playback = self.playback.clone().unwrap_or_default();
        let display = self.display.clone().unwrap_or_default();
        Settings {
            base_url: server
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            health_interval: session
                .health_interval_secs
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .unwrap_or(health::DEFAULT_INTERVAL),
            notification_ttl: session
                .notification_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TTL),
            page_size: session
                .page_size
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            player_command: playback.command.filter(|c| !c.is_empty()),
            theme: display.theme.unwrap_or_else(|| "hacker".to_string()),
        }
    }
}

/// Platform config directory path: `<config_dir>/clipsort/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("clipsort").join("config.toml"))
}

/// Load config by cascading CWD `.clipsort.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".clipsort.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        server: Some(ServerConfig {
            base_url: overlay
                .server
                .as_ref()
                .and_then(|s| s.base_url.clone())
                .or_else(|| base.server.as_ref().and_then(|s| s.base_url.clone())),
        }),
        session: Some(SessionConfig {
            health_interval_secs: overlay
                .session
                .as_ref()
                .and_then(|s| s.health_interval_secs)
                .or_else(|| base.session.as_ref().and_then(|s| s.health_interval_secs)),
            notification_ttl_secs: overlay
                .session
                .as_ref()
                .and_then(|s| s.notification_ttl_secs)
                .or_else(|| {
                    base.session
                        .as_ref()
                        .and_then(|s| s.notification_ttl_secs)
                }),
            page_size: overlay
                .session
                .as_ref()
                .and_then(|s| s.page_size)
                .or_else(|| base.session.as_ref().and_then(|s| s.page_size)),
        }),
        playback: Some(PlaybackConfig {
            command: overlay
                .playback
                .as_ref()
                .and_then(|p| p.command.clone())
                .or_else(|| base.playback.as_ref().and_then(|p| p.command.clone())),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        let settings = ConfigFile::default().resolve();
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.health_interval, Duration::from_secs(5));
        assert_eq!(settings.notification_ttl, Duration::from_secs(3));
        assert_eq!(settings.page_size, 10);
        assert!(settings.player_command.is_none());
    }

    #[test]
    fn overlay_wins_field_by_field() {
        let base: ConfigFile = toml::from_str(
            r#"
            [server]
            base_url = "http://base:8080"
            [session]
            page_size = 25
            health_interval_secs = 10
            "#,
        )
        .unwrap();
        let overlay: ConfigFile = toml::from_str(
            r#"
            [session]
            health_interval_secs = 2
            [playback]
            command = ["ffplay", "-nodisp", "-autoexit"]
            "#,
        )
        .unwrap();

        let settings = merge(base, overlay).resolve();
        assert_eq!(settings.base_url, "http://base:8080");
        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.health_interval, Duration::from_secs(2));
        assert_eq!(
            settings.player_command,
            Some(vec![
                "ffplay".to_string(),
                "-nodisp".to_string(),
                "-autoexit".to_string()
            ])
        );
    }

    #[test]
    fn malformed_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nbase_url = ").unwrap();
        assert!(load_from_path(&path).is_none());
    }

    #[test]
    fn zero_values_fall_back() {
        let config: ConfigFile = toml::from_str(
            r#"
            [session]
            page_size = 0
            health_interval_secs = 0
            "#,
        )
        .unwrap();
        let settings = config.resolve();
        assert_eq!(settings.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(settings.health_interval, health::DEFAULT_INTERVAL);
    }
}
