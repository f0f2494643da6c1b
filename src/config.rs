use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `COURIER__NAVIGATION__REQUIRE_ADJACENT_STEP=false`.
pub const ENV_PREFIX: &str = "COURIER";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub navigation: NavigationConfig,
    pub logging: LoggingConfig,
    pub floor_plan: FloorPlanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// `advance` only accepts a neighbour of the current node.
    pub require_adjacent_step: bool,
    /// `drop_off` only accepts the robot's current node as target.
    pub require_colocated_drop_off: bool,
    /// Capacity of the robot event channel.
    pub event_buffer: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub console: bool,
    /// Episode log file written through fast_log.
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorPlanConfig {
    pub data_dir: Option<String>,
    pub name: String,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Defaults, then the file if it exists, then `COURIER__*` environment variables.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            require_adjacent_step: true,
            require_colocated_drop_off: true,
            event_buffer: 64,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console: true,
            file: None,
        }
    }
}

impl Default for FloorPlanConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            name: "eight_rooms.toml".to_string(),
        }
    }
}
