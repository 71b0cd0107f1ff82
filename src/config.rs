use crate::error::PracticeResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Assets
    pub assets_dir: String,
    pub categories: BTreeMap<String, String>,
    pub picture_width: u32,
    pub picture_height: u32,

    // Speech
    pub tts_engine: String,
    pub asr_engine: String,
    pub audio_device: Option<usize>,
    pub ambient_ms: u64,
    pub listen_timeout_secs: u64,
    pub phrase_time_limit_secs: u64,
    pub pause_ms: u64,

    // Wyoming
    pub wyoming_host: String,
    pub wyoming_port: u16,

    // Drill
    pub spelling_auto_advance_ms: Option<u64>,

    // Meta
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets_dir: dirs::data_dir()
                .unwrap_or_default()
                .join("picwords/images")
                .to_string_lossy()
                .to_string(),
            categories: default_categories(),
            picture_width: 240,
            picture_height: 160,
            tts_engine: "system".to_string(),
            asr_engine: "wyoming".to_string(),
            audio_device: None,
            ambient_ms: 600,
            listen_timeout_secs: 5,
            phrase_time_limit_secs: 4,
            pause_ms: 800,
            wyoming_host: "localhost".to_string(),
            wyoming_port: 10300,
            spelling_auto_advance_ms: Some(400),
            log_level: "info".to_string(),
        }
    }
}

fn default_categories() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Fruits".to_string(), "fruitimages".to_string()),
        ("Planets".to_string(), "planetimages".to_string()),
        ("Animals".to_string(), "animalimages".to_string()),
        ("Vegetables".to_string(), "vegetableimages".to_string()),
    ])
}

/// Timing of one microphone capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenWindow {
    /// Leading audio used to measure background noise
    pub ambient: Duration,
    /// How long to wait for speech to begin
    pub timeout: Duration,
    /// Longest accepted utterance
    pub phrase_limit: Duration,
    /// Trailing silence that ends an utterance
    pub pause: Duration,
}

impl Default for ListenWindow {
    fn default() -> Self {
        Config::default().listen_window()
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> PracticeResult<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from a specific file
    ///
    /// A missing file yields defaults. A corrupt file is moved aside to
    /// `*.json.corrupt` and defaults are used.
    pub fn load_from(path: &Path) -> PracticeResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> PracticeResult<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> PracticeResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn listen_window(&self) -> ListenWindow {
        ListenWindow {
            ambient: Duration::from_millis(self.ambient_ms),
            timeout: Duration::from_secs(self.listen_timeout_secs),
            phrase_limit: Duration::from_secs(self.phrase_time_limit_secs),
            pause: Duration::from_millis(self.pause_ms),
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("picwords")
        .join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.categories["Planets"], "planetimages");
        assert_eq!(config.listen_timeout_secs, 5);
        assert_eq!((config.picture_width, config.picture_height), (240, 160));
        assert_eq!(config.spelling_auto_advance_ms, Some(400));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{ "assets_dir": "/srv/pictures", "tts_engine": "silent" }"#;
        let config: Config = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(config.assets_dir, "/srv/pictures");
        assert_eq!(config.tts_engine, "silent");
        assert_eq!(config.asr_engine, "wyoming");
        assert_eq!(config.categories["Fruits"], "fruitimages");
    }

    #[test]
    fn test_config_corrupt_file_is_moved_aside() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not valid json").expect("write");

        let config = Config::load_from(&path).expect("load");
        assert_eq!(config.wyoming_port, 10300);
        assert!(!path.exists());
        assert!(dir.path().join("config.json.corrupt").exists());
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/config.json");

        let mut config = Config::default();
        config.categories.insert("Shapes".into(), "shapeimages".into());
        config.save_to(&path).expect("save");

        let restored = Config::load_from(&path).expect("load");
        assert_eq!(restored.categories["Shapes"], "shapeimages");
    }

    #[test]
    fn test_listen_window() {
        let window = Config::default().listen_window();
        assert_eq!(window.timeout, Duration::from_secs(5));
        assert_eq!(window.phrase_limit, Duration::from_secs(4));
        assert_eq!(window.ambient, Duration::from_millis(600));
    }
}
