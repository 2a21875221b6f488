use std::time::Duration;

use serde::{Deserialize, Serialize};
use ultimate_common::config::Validate;

pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 500;
pub const MAX_PAIRINGS: usize = 64;
pub const MAX_MATCHES_PER_PAIRING: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub lock_timeout_ms: u64,
    pub pairings: usize,
    pub matches_per_pairing: usize,
    pub seed: Option<u64>,
    pub log_prefix: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            pairings: 4,
            matches_per_pairing: 2,
            seed: None,
            log_prefix: None,
        }
    }
}

impl ServerConfig {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.lock_timeout_ms == 0 {
            return Err("lock_timeout_ms must be positive".to_string());
        }
        if self.pairings == 0 || self.pairings > MAX_PAIRINGS {
            return Err(format!("pairings must be between 1 and {}", MAX_PAIRINGS));
        }
        if self.matches_per_pairing == 0 || self.matches_per_pairing > MAX_MATCHES_PER_PAIRING {
            return Err(format!(
                "matches_per_pairing must be between 1 and {}",
                MAX_MATCHES_PER_PAIRING
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.lock_timeout(), Duration::from_millis(DEFAULT_LOCK_TIMEOUT_MS));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ServerConfig = serde_yaml_ng::from_str("pairings: 8\nseed: 17\n").unwrap();
        assert_eq!(config.pairings, 8);
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.matches_per_pairing, 2);
        assert_eq!(config.lock_timeout_ms, DEFAULT_LOCK_TIMEOUT_MS);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let zero_timeout = ServerConfig { lock_timeout_ms: 0, ..ServerConfig::default() };
        assert!(zero_timeout.validate().is_err());

        let too_many = ServerConfig { pairings: MAX_PAIRINGS + 1, ..ServerConfig::default() };
        assert!(too_many.validate().unwrap_err().contains("pairings"));

        let no_matches = ServerConfig { matches_per_pairing: 0, ..ServerConfig::default() };
        assert!(no_matches.validate().is_err());
    }
}
