//! Process-level configuration for building a [`RouteEngine`].
//!
//! [`RouteEngine`]: crate::engine::RouteEngine

use std::env;
use std::path::PathBuf;

use crate::matrix::MatrixConfig;
use crate::osrm::OsrmConfig;
use crate::time_window::TimeWindowPolicy;

pub const OSRM_BASE_URL_VAR: &str = "OSRM_BASE_URL";
pub const TRAFFIC_CONFIG_PATH_VAR: &str = "TRAFFIC_CONFIG_PATH";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub osrm: OsrmConfig,
    pub matrix: MatrixConfig,
    pub traffic_path: PathBuf,
    pub policy: TimeWindowPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            osrm: OsrmConfig::default(),
            matrix: MatrixConfig::default(),
            traffic_path: PathBuf::from("config/traffic.json"),
            policy: TimeWindowPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults with `OSRM_BASE_URL` and `TRAFFIC_CONFIG_PATH` applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults with overrides resolved through `lookup`. Blank values are
    /// ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(base_url) = value(OSRM_BASE_URL_VAR) {
            config.osrm.base_url = base_url;
        }
        if let Some(path) = value(TRAFFIC_CONFIG_PATH_VAR) {
            config.traffic_path = PathBuf::from(path);
        }

        config
    }
}
