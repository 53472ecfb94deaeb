// Tue Jan 13 2026 - Alex

use crate::recon::boottime::tick_nsec;
use crate::utils::LoggingUtils;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Limits and constants shared by the walkers and reconstruction routines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Longest name read through a `char *` (dentry names, device names).
    pub max_string_length: usize,
    /// Hard cap on nodes visited by a chain or bucket walk.
    pub max_chain_nodes: usize,
    /// Hard cap on steps taken by a parent climb.
    pub max_climb_depth: usize,
    /// Kernel timer frequency used for tick to nanosecond conversion.
    pub hz: u64,
    /// PIT input clock used for tick to nanosecond conversion.
    pub clock_tick_rate: u64,
    /// Bits of the CPU bitmap word to decode. `None` uses the profile word size.
    pub cpu_bitmap_bits: Option<u32>,
    /// Only these PIDs are reported by the task list when set.
    pub pid_filter: Option<Vec<i64>>,
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`.
    pub log_level: String,
    /// Log records go to this file instead of stderr when set.
    pub log_file: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_string_length: 256,
            max_chain_nodes: 65_536,
            max_climb_depth: 4_096,
            hz: 1000,
            clock_tick_rate: 1_193_182,
            cpu_bitmap_bits: None,
            pid_filter: None,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON config; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(json).map_err(|e| format!("invalid config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        LoggingUtils::level_from_str(&self.log_level)
    }

    pub fn with_pid_filter(mut self, pids: Vec<i64>) -> Self {
        self.pid_filter = Some(pids);
        self
    }

    pub fn with_max_chain_nodes(mut self, max: usize) -> Self {
        self.max_chain_nodes = max;
        self
    }

    pub fn with_cpu_bitmap_bits(mut self, bits: u32) -> Self {
        self.cpu_bitmap_bits = Some(bits);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_string_length == 0 {
            return Err("max_string_length must be greater than 0".to_string());
        }
        if self.max_chain_nodes == 0 || self.max_climb_depth == 0 {
            return Err("walk limits must be greater than 0".to_string());
        }
        if self.hz == 0 || self.clock_tick_rate == 0 {
            return Err("hz and clock_tick_rate must be greater than 0".to_string());
        }
        if tick_nsec(self.hz, self.clock_tick_rate).is_none() {
            return Err(format!("hz {} is too large for clock_tick_rate {}", self.hz, self.clock_tick_rate));
        }
        if let Some(bits) = self.cpu_bitmap_bits {
            if bits == 0 || bits > 64 {
                return Err("cpu_bitmap_bits must be between 1 and 64".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json_str(r#"{"max_chain_nodes": 10, "pid_filter": [1, 2]}"#).unwrap();
        assert_eq!(config.max_chain_nodes, 10);
        assert_eq!(config.max_string_length, 256);
        assert_eq!(config.pid_filter, Some(vec![1, 2]));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_limits() {
        assert!(AnalysisConfig::new().with_max_chain_nodes(0).validate().is_err());
        assert!(AnalysisConfig::new().with_cpu_bitmap_bits(65).validate().is_err());
    }

    #[test]
    fn test_json_is_validated() {
        assert!(AnalysisConfig::from_json_str(r#"{"hz": 0}"#).is_err());
        assert!(AnalysisConfig::from_json_str(r#"{"hz": 5000000}"#).is_err());
        assert!(AnalysisConfig::from_json_str(r#"{"max_chain_nodes": "many"}"#).is_err());
        assert_eq!(AnalysisConfig::from_json_str(r#"{"hz": 250}"#).map(|c| c.hz), Ok(250));
    }

    #[test]
    fn test_log_level_from_json() {
        let config = AnalysisConfig::from_json_str(r#"{"log_level": "WARNING", "log_file": "/tmp/a.log"}"#).unwrap();
        assert_eq!(config.log_level_filter(), LevelFilter::Warn);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/a.log")));
        assert_eq!(AnalysisConfig::default().log_level_filter(), LevelFilter::Info);
    }
}
