//! Operator-supplied configuration, loaded from the environment. None of it
//! is part of the core scoring contract; it exists so the binary has
//! something to run against.

use std::env;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub kueue_enabled: bool,
    pub scheduling_interval_secs: u64,
    pub aging_alpha: f64,
    pub strict_discovery: bool,
    pub workload_group: String,
    pub workload_version: String,
    pub workload_plural: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kueue_enabled: true,
            scheduling_interval_secs: 30,
            aging_alpha: 0.1,
            strict_discovery: false,
            workload_group: "kueue.x-k8s.io".to_string(),
            workload_version: "v1beta1".to_string(),
            workload_plural: "workloads".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the environment, falling back to defaults.
    /// `SCHEDULING_INTERVAL` below 1 is clamped up to 1, per the contract
    /// that it "must be >= 1".
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            kueue_enabled: env::var("KUEUE_ENABLED")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.kueue_enabled),
            scheduling_interval_secs: env::var("SCHEDULING_INTERVAL")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs.max(1))
                .unwrap_or(defaults.scheduling_interval_secs),
            aging_alpha: env::var("DRF_AGING_ALPHA")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .unwrap_or(defaults.aging_alpha),
            strict_discovery: env::var("DRF_STRICT_DISCOVERY")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.strict_discovery),
            workload_group: env::var("DRF_WORKLOAD_GROUP").unwrap_or(defaults.workload_group),
            workload_version: env::var("DRF_WORKLOAD_VERSION").unwrap_or(defaults.workload_version),
            workload_plural: env::var("DRF_WORKLOAD_PLURAL").unwrap_or(defaults.workload_plural),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_conservative() {
        let config = Config::default();
        assert!(config.kueue_enabled);
        assert_eq!(config.scheduling_interval_secs, 30);
    }

    #[test]
    fn parses_bool_variants() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("False"), Some(false));
        assert_eq!(parse_bool("nonsense"), None);
    }
}
