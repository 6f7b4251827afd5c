use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

/// Default target temperature in degrees Celsius.
pub const DEFAULT_DESIRED_ROOM_TEMP: f64 = 22.0;

/// Load environment variables from .env file with robust parsing.
/// Handles values with spaces without requiring quotes.
pub fn load_dotenv() {
    load_dotenv_from(Path::new(".env"));
}

fn load_dotenv_from(env_path: &Path) {
    let Ok(content) = fs::read_to_string(env_path) else {
        return;
    };

    for (key, value) in parse_dotenv(&content) {
        // Only set if not already set (env vars take precedence)
        if std::env::var(key).is_err() {
            // SAFETY: called from main before the async runtime spawns threads
            unsafe { std::env::set_var(key, value) };
        }
    }
}

fn parse_dotenv(content: &str) -> Vec<(&str, &str)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);

        if !key.is_empty() {
            pairs.push((key, value));
        }
    }

    pairs
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub mqtt: MqttConfig,
    pub controller: ControllerConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    pub broker_host: String,
    pub broker_port: u16,
    pub client_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub keep_alive_secs: u64,
    /// Prepended to every topic, e.g. "/" for "/readings/temperature".
    pub topic_prefix: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Below this temperature an occupied room's valve opens.
    pub desired_temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub bind: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mqtt: MqttConfig {
                broker_host: "127.0.0.1".to_string(),
                broker_port: 1883,
                client_id: "climate-controller".to_string(),
                username: None,
                password: None,
                keep_alive_secs: 60,
                topic_prefix: String::new(),
            },
            controller: ControllerConfig::default(),
            http: HttpConfig {
                bind: SocketAddr::from(([0, 0, 0, 0], 8000)),
            },
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            desired_temperature: DEFAULT_DESIRED_ROOM_TEMP,
        }
    }
}

impl ControllerConfig {
    pub fn new(desired_temperature: f64) -> Result<Self, ConfigError> {
        if !desired_temperature.is_finite() {
            return Err(ConfigError::NonFiniteTemperature(desired_temperature));
        }
        Ok(Self {
            desired_temperature,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // MQTT configuration
        if let Some(host) = lookup("MQTT_BROKER_HOST") {
            config.mqtt.broker_host = host;
        }
        if let Some(port) = lookup("MQTT_BROKER_PORT") {
            config.mqtt.broker_port = parse_value("MQTT_BROKER_PORT", &port)?;
        }
        if let Some(client_id) = lookup("MQTT_CLIENT_ID") {
            config.mqtt.client_id = client_id;
        }
        if let Some(username) = lookup("MQTT_USERNAME") {
            config.mqtt.username = Some(username);
        }
        if let Some(password) = lookup("MQTT_PASSWORD") {
            config.mqtt.password = Some(password);
        }
        if let Some(keep_alive) = lookup("MQTT_KEEP_ALIVE_SECS") {
            config.mqtt.keep_alive_secs = parse_value("MQTT_KEEP_ALIVE_SECS", &keep_alive)?;
        }
        if let Some(prefix) = lookup("MQTT_TOPIC_PREFIX") {
            config.mqtt.topic_prefix = prefix;
        }

        if let Some(temp) = lookup("DESIRED_ROOM_TEMP") {
            config.controller = ControllerConfig::new(parse_value("DESIRED_ROOM_TEMP", &temp)?)?;
        }

        if let Some(bind) = lookup("HTTP_BIND") {
            config.http.bind = parse_value("HTTP_BIND", &bind)?;
        }

        Ok(config)
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
