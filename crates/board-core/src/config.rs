//! Board client configuration
//!
//! All fields default, so a partial JSON object is a valid configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Browser storage key holding a JSON `BoardConfig`
pub const CONFIG_STORAGE_KEY: &str = "kanban.config";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// One move call per live hover step
    #[default]
    PerHover,
    /// One net move call per completed task drag
    OnDrop,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::PerHover => "per-hover",
            SyncMode::OnDrop => "on-drop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    pub api_base_url: String,
    pub sync_mode: SyncMode,
    /// Pointer travel before a press becomes a drag
    pub drag_threshold_px: i32,
    /// Settled journal entries kept for diagnostics
    pub journal_capacity: usize,
    /// Log records kept by the in-memory logger
    pub log_capacity: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            sync_mode: SyncMode::PerHover,
            drag_threshold_px: 10,
            journal_capacity: 256,
            log_capacity: 500,
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("apiBaseUrl must not be empty".to_string()));
        }
        if self.journal_capacity == 0 {
            return Err(ConfigError::Invalid("journalCapacity must be at least 1".to_string()));
        }
        if self.drag_threshold_px < 0 {
            return Err(ConfigError::Invalid("dragThresholdPx must not be negative".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BoardConfig::from_json(r#"{"syncMode":"on-drop"}"#).unwrap();
        assert_eq!(config.sync_mode, SyncMode::OnDrop);
        assert_eq!(config.api_base_url, "http://localhost:3000/api");
        assert_eq!(config.drag_threshold_px, 10);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty_url = BoardConfig { api_base_url: " ".into(), ..Default::default() };
        let zero_journal = BoardConfig { journal_capacity: 0, ..Default::default() };
        let negative = BoardConfig { drag_threshold_px: -1, ..Default::default() };
        assert!(empty_url.validate().is_err());
        assert!(zero_journal.validate().is_err());
        assert!(negative.validate().is_err());
        assert!(BoardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(BoardConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = BoardConfig { sync_mode: SyncMode::OnDrop, ..Default::default() };
        assert_eq!(BoardConfig::from_json(&config.to_json()).unwrap(), config);
    }
}
