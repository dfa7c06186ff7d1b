use crate::domains::agent::AgentSettings;
use crate::domains::fleet::FleetSettings;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub swarm: SwarmConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// GeoJSON polygon applied as the first geofence at startup.
    #[serde(default)]
    pub geofence_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub outbound_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub agent_count: usize,
    pub tick_interval_ms: u64,
    pub buffer_distance_m: f64,
    pub waypoint_spacing_m: f64,
    pub cruise_altitude_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Falls back to defaults when `path` does not exist.
    pub async fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path).await
        } else {
            Ok(Self::default())
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl From<&SwarmConfig> for FleetSettings {
    fn from(swarm: &SwarmConfig) -> Self {
        FleetSettings {
            agent_count: swarm.agent_count,
            buffer_distance_m: swarm.buffer_distance_m,
            agent: AgentSettings {
                tick_interval: Duration::from_millis(swarm.tick_interval_ms),
                waypoint_spacing_m: swarm.waypoint_spacing_m,
                cruise_altitude_m: swarm.cruise_altitude_m,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            swarm: SwarmConfig::default(),
            logging: LoggingConfig::default(),
            geofence_file: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8765,
            outbound_capacity: 1024,
        }
    }
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            agent_count: 6,
            tick_interval_ms: 2000,
            buffer_distance_m: 250.0,
            waypoint_spacing_m: 250.0,
            cruise_altitude_m: 500.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}
