//! Server configuration read from the environment.

use std::path::PathBuf;

pub const BIND_ADDR_VAR: &str = "MEETING_COST_BIND_ADDR";
pub const RATES_DIR_VAR: &str = "MEETING_COST_RATES_DIR";
pub const DEFAULT_REGION_VAR: &str = "MEETING_COST_DEFAULT_REGION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Directory of JSON rate profiles.
    pub rates_dir: PathBuf,
    /// Region whose profile applies when a request names none.
    pub default_region: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            rates_dir: PathBuf::from("rates"),
            default_region: "BM".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            bind_addr: get(BIND_ADDR_VAR).unwrap_or(defaults.bind_addr),
            rates_dir: get(RATES_DIR_VAR).map(PathBuf::from).unwrap_or(defaults.rates_dir),
            default_region: get(DEFAULT_REGION_VAR).unwrap_or(defaults.default_region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(ServerConfig::from_lookup(|_| None), ServerConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let vars = HashMap::from([
            (BIND_ADDR_VAR, "0.0.0.0:8080"),
            (RATES_DIR_VAR, "/etc/meeting-cost/rates"),
            (DEFAULT_REGION_VAR, " "),
        ]);
        let config = ServerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.rates_dir, PathBuf::from("/etc/meeting-cost/rates"));
        assert_eq!(config.default_region, "BM");
    }
}
