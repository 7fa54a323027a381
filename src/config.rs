//! Page Configuration
//!
//! Board config from localStorage, project and role from the page query.

use board_core::{BoardConfig, ConfigError, Role, CONFIG_STORAGE_KEY};

/// Project shown when the query names none
const DEFAULT_PROJECT: &str = "demo";

/// Everything the page needs before mounting
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub board: BoardConfig,
    pub project_id: String,
    pub role: Role,
    /// Serve the board from the in-memory backend
    pub demo: bool,
    /// Stored config that was rejected in favour of the defaults
    pub config_error: Option<ConfigError>,
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

pub fn read_storage(key: &str) -> Option<String> {
    storage()?.get_item(key).ok().flatten()
}

pub fn write_storage(key: &str, value: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(key, value);
    }
}

fn query_param(name: &str) -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    params.get(name).filter(|v| !v.is_empty())
}

/// Stored config JSON, or the defaults plus the reason it was rejected
fn parse_board_config(raw: Option<&str>) -> (BoardConfig, Option<ConfigError>) {
    match raw.map(BoardConfig::from_json) {
        None => (BoardConfig::default(), None),
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (BoardConfig::default(), Some(e)),
    }
}

pub fn load_page_config() -> PageConfig {
    let role = query_param("role")
        .and_then(|r| Role::from_str(&r))
        .unwrap_or_default();
    let (board, config_error) = parse_board_config(read_storage(CONFIG_STORAGE_KEY).as_deref());
    PageConfig {
        board,
        project_id: query_param("project").unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
        role,
        demo: query_param("demo").is_some(),
        config_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::SyncMode;

    #[test]
    fn test_rejected_config_is_reported_with_defaults() {
        let (config, err) = parse_board_config(Some("{ not json"));
        assert_eq!(config, BoardConfig::default());
        assert!(matches!(err, Some(ConfigError::Parse(_))));
    }

    #[test]
    fn test_stored_config_is_used() {
        let (config, err) = parse_board_config(Some(r#"{"syncMode":"on-drop"}"#));
        assert_eq!(config.sync_mode, SyncMode::OnDrop);
        assert!(err.is_none());
        assert_eq!(parse_board_config(None), (BoardConfig::default(), None));
    }
}
