//! Application Configuration
//!
//! Layered: built-in defaults, then compile-time environment
//! (`CATALOG_API_BASE_URL`, `CATALOG_LOG_LEVEL`), then the
//! `window.__CATALOG_CONFIG__` object injected by the hosting page.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Page sizes offered by the product table
pub const PAGE_SIZES: &[u32] = &[10, 15, 20, 30, 40, 50];

const RUNTIME_CONFIG_KEY: &str = "__CATALOG_CONFIG__";
const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub api_base_url: String,
    pub page_size: u32,
    pub log_level: String,
    pub log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: 10,
            log_level: "info".to_string(),
            log_capacity: rolling_logger::DEFAULT_CAPACITY,
        }
    }
}

/// Partial config; only the fields present override
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub page_size: Option<u32>,
    pub log_level: Option<String>,
    pub log_capacity: Option<usize>,
}

impl ConfigOverrides {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn from_build_env() -> Self {
        Self {
            api_base_url: option_env!("CATALOG_API_BASE_URL").map(str::to_string),
            log_level: option_env!("CATALOG_LOG_LEVEL").map(str::to_string),
            ..Default::default()
        }
    }
}

impl AppConfig {
    /// Resolve the effective configuration in the browser
    pub fn load() -> Self {
        let mut config = Self::default().with(ConfigOverrides::from_build_env());
        if let Some(value) = runtime_config_value() {
            match serde_wasm_bindgen::from_value::<ConfigOverrides>(value) {
                Ok(overrides) => config = config.with(overrides),
                // Logging is not up yet; report straight to the console
                Err(e) => web_sys::console::warn_1(&format!("[CONFIG] Ignoring {}: {}", RUNTIME_CONFIG_KEY, e).into()),
            }
        }
        config.normalized()
    }

    pub fn with(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(url) = overrides.api_base_url {
            self.api_base_url = url;
        }
        if let Some(size) = overrides.page_size {
            self.page_size = size;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(capacity) = overrides.log_capacity {
            self.log_capacity = capacity;
        }
        self
    }

    /// Replace out-of-range values with defaults
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();
        let url = self.api_base_url.trim().trim_end_matches('/').to_string();
        self.api_base_url = if url.is_empty() { defaults.api_base_url } else { url };
        if !PAGE_SIZES.contains(&self.page_size) {
            self.page_size = defaults.page_size;
        }
        self.log_level = self.log_level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            self.log_level = defaults.log_level;
        }
        if self.log_capacity == 0 {
            self.log_capacity = defaults.log_capacity;
        }
        self
    }

    /// Absolute URL of an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }
}

fn runtime_config_value() -> Option<JsValue> {
    let window = web_sys::window()?;
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(RUNTIME_CONFIG_KEY)).ok()?;
    if value.is_undefined() || value.is_null() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_only_present_fields() {
        let overrides = ConfigOverrides::from_json(r#"{"apiBaseUrl":"https://api.shop.test/"}"#).unwrap();
        let config = AppConfig::default().with(overrides).normalized();

        assert_eq!(config.api_base_url, "https://api.shop.test");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_normalize_rejects_bad_values() {
        let config = AppConfig {
            api_base_url: "   ".into(),
            page_size: 7,
            log_level: "LOUD".into(),
            log_capacity: 0,
        }
        .normalized();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_normalize_keeps_valid_values() {
        let config = AppConfig {
            api_base_url: "https://api.test//".into(),
            page_size: 30,
            log_level: " Debug ".into(),
            log_capacity: 50,
        }
        .normalized();

        assert_eq!(config.api_base_url, "https://api.test");
        assert_eq!(config.page_size, 30);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_capacity, 50);
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let config = AppConfig::default();
        assert_eq!(config.endpoint("/categories"), "http://localhost:3000/categories");
        assert_eq!(config.endpoint("products/4"), "http://localhost:3000/products/4");
    }
}
