use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::sdk::SimulatedPrinterConfig;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub printers: Vec<SimulatedPrinterConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BridgeConfig {
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
    #[serde(default = "default_discovery_timeout_ms")]
    pub discovery_timeout_ms: u64,
    #[serde(default)]
    pub simulator: SimulatorConfig,
}

fn default_operation_timeout_ms() -> u64 {
    10_000
}

fn default_discovery_timeout_ms() -> u64 {
    15_000
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            operation_timeout_ms: default_operation_timeout_ms(),
            discovery_timeout_ms: default_discovery_timeout_ms(),
            simulator: SimulatorConfig::default(),
        }
    }
}

impl BridgeConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("operation_timeout_ms", default_operation_timeout_ms())?
            .set_default("discovery_timeout_ms", default_discovery_timeout_ms())?
            // e.g. config/default.toml
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // e.g. BRIDGE__OPERATION_TIMEOUT_MS=5000
            .add_source(Environment::with_prefix("BRIDGE").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }
}
