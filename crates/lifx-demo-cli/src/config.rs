/*
[INPUT]:  YAML configuration file, command-line and environment overrides
[OUTPUT]: Resolved settings for the demo client
[POS]:    Configuration layer - backend defaults, state directory, log level
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};

use anyhow::Context;
use lifx_demo_adapter::http::{DEFAULT_BACKEND_URL, DEFAULT_DEMO_KEY};
use lifx_demo_adapter::BackendConfig;
use serde::{Deserialize, Serialize};

/// Directory name used under the platform data dir
pub const APP_DIR_NAME: &str = "lifx-demo";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of the optional YAML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CliConfig {
    /// Backend base URL, e.g. `https://your-app.railway.app`
    #[serde(default)]
    pub backend_url: Option<String>,
    /// Shared demo key sent as `X-Demo-Key`
    #[serde(default)]
    pub demo_key: Option<String>,
    /// Where local and session state are kept
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_level: Option<String>,
}

impl CliConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Values given on the command line (or through their environment variables)
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub demo_key: Option<String>,
    pub state_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Final settings: overrides, then config file, then built-in defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend: BackendConfig,
    pub state_dir: PathBuf,
    pub log_level: String,
}

impl Settings {
    pub fn resolve(file: Option<CliConfig>, overrides: Overrides) -> Self {
        let file = file.unwrap_or_default();

        let backend_url = overrides
            .backend_url
            .or(file.backend_url)
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let demo_key = overrides
            .demo_key
            .or(file.demo_key)
            .unwrap_or_else(|| DEFAULT_DEMO_KEY.to_string());

        Self {
            backend: BackendConfig::new(backend_url, demo_key),
            state_dir: overrides
                .state_dir
                .or(file.state_dir)
                .unwrap_or_else(default_state_dir),
            log_level: overrides
                .log_level
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Read `path` (if given) and resolve against `overrides`
    pub fn load(path: Option<&Path>, overrides: Overrides) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => {
                let path_str = path.to_str().context("config path must be valid utf-8")?;
                Some(CliConfig::from_file(path_str).context("load config")?)
            }
            None => None,
        };
        Ok(Self::resolve(file, overrides))
    }
}

/// `<data dir>/lifx-demo`, or `./.lifx-demo` when the platform has none
pub fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR_NAME}")))
}
