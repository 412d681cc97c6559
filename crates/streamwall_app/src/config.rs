//! Application configuration, read from `streamwall.ron` when present.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use streamwall_core::WallSettings;
use streamwall_engine::{EngineSettings, FetchSettings, PlayerSettings};

pub const CONFIG_FILENAME: &str = "streamwall.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Key the active list is persisted under.
    pub storage_key: String,
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    pub auto_save: bool,
    pub max_concurrent_players: usize,
    pub toast_duration_ms: u64,
    pub default_columns: usize,
    pub screen_width: usize,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: "videowall_state".to_string(),
            data_dir: PathBuf::from(".streamwall"),
            export_dir: PathBuf::from("."),
            log_file: PathBuf::from("streamwall.log"),
            auto_save: true,
            max_concurrent_players: 8,
            toast_duration_ms: 3000,
            default_columns: 2,
            screen_width: 120,
            connect_timeout_secs: 10,
            request_timeout_secs: 15,
        }
    }
}

impl AppConfig {
    /// Reads the config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()))
            }
        };
        ron::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn wall_settings(&self) -> WallSettings {
        WallSettings {
            auto_save: self.auto_save,
            toast_duration: Duration::from_millis(self.toast_duration_ms),
            columns: self.default_columns.max(1),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            fetch: FetchSettings {
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                ..FetchSettings::default()
            },
            player: PlayerSettings::default(),
            max_concurrent_players: self.max_concurrent_players,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(&temp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage_key, "videowall_state");
    }

    #[test]
    fn partial_file_overrides_named_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(auto_save: false, default_columns: 3)").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert!(!config.auto_save);
        assert_eq!(config.wall_settings().columns, 3);
        assert_eq!(config.max_concurrent_players, 8);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "(auto_save: maybe)").unwrap();

        assert!(AppConfig::load(&path).is_err());
    }
}
