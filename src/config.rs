//! Application configuration
//!
//! Read once at startup from a TOML file. Lookup order:
//! 1. Path given with `--config`
//! 2. `<config dir>/remotecontroller/config.toml`
//! 3. `./remotecontroller.toml`
//!
//! ```toml
//! [general]
//! log_level = "debug"        # normal | debug | verbose
//! heartbeat_secs = 10
//!
//! [mqtt]
//! address = "127.0.0.1"
//! port = 1883
//!
//! [remote]
//! base_topic = "zigbee2mqtt"
//! device = "styrbar"
//! devices = "kitchen;living room"
//! reset_timeout = 3          # heartbeats, 0 disables
//! topic_mode = "direct_bridge"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

use crate::mqtt::config::MqttConfig;
use crate::remote::{ControllerSettings, DeviceList, TopicMode, DEFAULT_BRIGHTNESS_STEP};

const APP_DIR: &str = "remotecontroller";
const CONFIG_FILE: &str = "config.toml";
const LOCAL_CONFIG_FILE: &str = "remotecontroller.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration file found, searched: {0}")]
    NotFound(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Debug verbosity of the log output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Normal,
    Debug,
    Verbose,
}

impl LogLevel {
    pub fn level(self) -> Level {
        match self {
            LogLevel::Normal => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Verbose => Level::TRACE,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    #[serde(rename = "mqtt")]
    pub broker: BrokerConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: LogLevel,
    /// Seconds between heartbeat ticks
    pub heartbeat_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Normal,
            heartbeat_secs: 10,
        }
    }
}

/// Broker connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub address: String,
    pub port: u16,
    pub client_id: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub keep_alive_secs: u64,
    /// Pause before the next connection attempt after a failure
    pub reconnect_delay_secs: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 1883,
            client_id: "remotecontroller".to_string(),
            user: None,
            password: None,
            keep_alive_secs: 5,
            reconnect_delay_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_topic: String,
    /// Remote control device name under the base topic
    pub device: String,
    /// Device or group names, separated by `;`
    pub devices: String,
    /// Heartbeats until the selection falls back to `all`; 0 disables
    pub reset_timeout: u32,
    pub topic_mode: TopicMode,
    pub brightness_step: i32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_topic: "zigbee2mqtt".to_string(),
            device: String::new(),
            devices: String::new(),
            reset_timeout: 1,
            topic_mode: TopicMode::DirectBridge,
            brightness_step: DEFAULT_BRIGHTNESS_STEP,
        }
    }
}

impl AppConfig {
    /// Picks the configuration file: `path` if given, else the first default location that exists.
    ///
    /// Runs before logging is set up, so it reports through its result only.
    pub async fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::find().await,
        }
    }

    /// Reads and validates the configuration at `path`
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker.address.trim().is_empty() {
            return Err(ConfigError::Invalid("mqtt.address is empty".to_string()));
        }
        if self.broker.port == 0 {
            return Err(ConfigError::Invalid("mqtt.port must not be 0".to_string()));
        }
        if self.broker.client_id.trim().is_empty() {
            return Err(ConfigError::Invalid("mqtt.client_id is empty".to_string()));
        }
        if self.remote.base_topic.trim().is_empty() {
            return Err(ConfigError::Invalid("remote.base_topic is empty".to_string()));
        }
        if self.remote.device.trim().is_empty() {
            return Err(ConfigError::Invalid("remote.device is empty".to_string()));
        }
        if self.device_list().len() < 2 {
            return Err(ConfigError::Invalid(
                "remote.devices must name at least one device".to_string(),
            ));
        }
        if self.remote.brightness_step <= 0 {
            return Err(ConfigError::Invalid(
                "remote.brightness_step must be positive".to_string(),
            ));
        }
        if self.general.heartbeat_secs == 0 {
            return Err(ConfigError::Invalid(
                "general.heartbeat_secs must not be 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn device_list(&self) -> DeviceList {
        DeviceList::parse(&self.remote.devices)
    }

    pub fn heartbeat(&self) -> Duration {
        Duration::from_secs(self.general.heartbeat_secs)
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        let remote = &self.remote;
        ControllerSettings {
            base_topic: remote.base_topic.trim().to_string(),
            remote: remote.device.trim().to_string(),
            devices: self.device_list(),
            reset_timeout_ticks: remote.reset_timeout,
            topic_mode: remote.topic_mode,
            brightness_step: remote.brightness_step,
        }
    }

    pub fn mqtt_config(&self) -> MqttConfig {
        let broker = &self.broker;
        MqttConfig {
            host: broker.address.trim().to_string(),
            port: broker.port,
            client_id: broker.client_id.trim().to_string(),
            credentials: broker.user.clone().map(|user| {
                (user, broker.password.clone().unwrap_or_default())
            }),
            keep_alive: Duration::from_secs(broker.keep_alive_secs),
            reconnect_delay: Duration::from_secs(broker.reconnect_delay_secs),
        }
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(mut dir) = dirs::config_dir() {
            dir.push(APP_DIR);
            dir.push(CONFIG_FILE);
            paths.push(dir);
        }
        paths.push(PathBuf::from(LOCAL_CONFIG_FILE));
        paths
    }

    async fn find() -> Result<PathBuf, ConfigError> {
        let candidates = Self::search_paths();
        for candidate in &candidates {
            if tokio::fs::try_exists(candidate).await.unwrap_or(false) {
                return Ok(candidate.clone());
            }
        }

        let searched: Vec<String> = candidates
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        Err(ConfigError::NotFound(searched.join(", ")))
    }
}
