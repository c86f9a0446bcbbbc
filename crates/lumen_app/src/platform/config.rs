use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lumen_logging::{lumen_info, lumen_warn, LogDestination, DEFAULT_LOG_FILE};
use lumen_worker::{BorderColorMatte, FetchSettings, ModelResource};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "lumen.ron";

const DEFAULT_PHRASEBOOK: &str = "phrasebook.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
    /// Seconds to wait for a terminal notification before giving up on a task.
    pub task_timeout_secs: u64,
    pub fetch: FetchConfig,
    pub translator: TranslatorConfig,
    pub matte: MatteConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(".lumen_cache"),
            output_dir: PathBuf::from("output"),
            log_destination: LogDestination::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            task_timeout_secs: 600,
            fetch: FetchConfig::default(),
            translator: TranslatorConfig::default(),
            matte: MatteConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            connect_timeout_secs: settings.connect_timeout.as_secs(),
            request_timeout_secs: settings.request_timeout.as_secs(),
            max_bytes: settings.max_bytes,
        }
    }
}

impl FetchConfig {
    pub fn settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_bytes: self.max_bytes,
        }
    }
}

/// Resources the translation pipeline loads, and which of them holds the phrasebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub phrasebook: String,
    pub resources: Vec<ModelResource>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            phrasebook: DEFAULT_PHRASEBOOK.to_string(),
            resources: vec![ModelResource::new(
                DEFAULT_PHRASEBOOK,
                "demos/phrasebook.json",
            )],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatteConfig {
    pub tolerance: f32,
    pub feather: f32,
}

impl Default for MatteConfig {
    fn default() -> Self {
        let matte = BorderColorMatte::default();
        Self {
            tolerance: matte.tolerance,
            feather: matte.feather,
        }
    }
}

impl MatteConfig {
    pub fn model(&self) -> BorderColorMatte {
        BorderColorMatte {
            tolerance: self.tolerance,
            feather: self.feather,
        }
    }
}

/// Reads `path`, falling back to defaults when it is missing or malformed.
pub fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            lumen_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            lumen_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            lumen_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}
