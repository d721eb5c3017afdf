//! Application configuration.
//!
//! Layered: built-in defaults, then the optional config file, then
//! environment variables (a `.env` file is loaded first if present).
//!
//! Config file location:
//!   macOS:   ~/Library/Application Support/kanji-lens/config.json
//!   Linux:   ~/.config/kanji-lens/config.json
//!   Windows: %APPDATA%/kanji-lens/config.json

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend_url: String,
    pub request_timeout_secs: u64,
    /// Pause after hiding the main window so it is gone from the capture.
    pub capture_settle_ms: u64,
    pub start_minimized: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: 15,
            capture_settle_ms: 100,
            start_minimized: false,
        }
    }
}

/// On-disk form; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConfigFile {
    backend_url: Option<String>,
    request_timeout_secs: Option<u64>,
    capture_settle_ms: Option<u64>,
    start_minimized: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Default config file path.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kanji-lens")
        .join("config.json")
}

impl AppConfig {
    /// Loads the full layered configuration. Never fails: a broken config
    /// file is logged and skipped.
    pub fn load() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                log::warn!("[CONFIG] Ignoring .env file: {}", e);
            }
        }

        let mut config = Self::default();
        let path = config_path();
        match config.merge_file(&path) {
            Ok(true) => log::info!("[CONFIG] Loaded {}", path.display()),
            Ok(false) => {}
            Err(e) => log::warn!("[CONFIG] {}", e),
        }
        config.apply_env(|key| std::env::var(key).ok());
        config.normalize();

        log::info!("[CONFIG] Backend: {}", config.backend_url);
        config
    }

    /// Overlays values from a JSON config file. Returns `Ok(false)` if the
    /// file does not exist.
    pub fn merge_file(&mut self, path: &Path) -> Result<bool, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let file: ConfigFile = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(url) = file.backend_url {
            self.backend_url = url;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(ms) = file.capture_settle_ms {
            self.capture_settle_ms = ms;
        }
        if let Some(flag) = file.start_minimized {
            self.start_minimized = flag;
        }
        Ok(true)
    }

    /// Overlays `BACKEND_URL` and `START_MINIMIZED` from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("BACKEND_URL").filter(|v| !v.trim().is_empty()) {
            self.backend_url = url;
        }
        // Set unless empty, `0` or `false`.
        if let Some(flag) = lookup("START_MINIMIZED") {
            self.start_minimized = !flag.is_empty() && flag != "0" && flag != "false";
        }
    }

    fn normalize(&mut self) {
        let trimmed = self.backend_url.trim().trim_end_matches('/');
        self.backend_url = if trimmed.is_empty() {
            DEFAULT_BACKEND_URL.to_string()
        } else if reqwest::Url::parse(trimmed).is_err() {
            log::warn!("[CONFIG] Invalid backend URL '{}', using {}", trimmed, DEFAULT_BACKEND_URL);
            DEFAULT_BACKEND_URL.to_string()
        } else {
            trimmed.to_string()
        };
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = Self::default().request_timeout_secs;
        }
    }
}
