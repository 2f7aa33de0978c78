//! User settings stored as settings.json in the app data directory

use crate::constants::DEFAULT_SERVER_URL;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Server
    pub server_url: String,
    /// No client-side timeout when unset
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                } else {
                    debug!(path = %path.display(), "Settings saved");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.server_url, "http://127.0.0.1:5000");
        assert!(settings.request_timeout().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            server_url: "http://scraper.local:8080".to_string(),
            request_timeout_secs: Some(30),
            window_w: Some(900.0),
            ..Default::default()
        };
        settings.save(dir.path());

        let loaded = Settings::load(dir.path());
        assert_eq!(loaded, settings);
        assert_eq!(loaded.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), r#"{"window_x": 10.0}"#).unwrap();
        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.window_x, Some(10.0));
        assert_eq!(loaded.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();
        assert_eq!(Settings::load(dir.path()), Settings::default());
    }

    #[test]
    fn zero_timeout_means_none() {
        let settings = Settings {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(settings.request_timeout().is_none());
    }
}
