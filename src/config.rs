//! Dashboard configuration
//!
//! Loaded from `<config dir>/leadpulse/config.json` when present, with
//! environment overrides for the API endpoints.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::{CategoryOptions, ConversionVocabulary};
use crate::models::PeriodSelector;

pub const DEFAULT_CONTACTS_URL: &str =
    "https://api.steinhq.com/v1/storages/66e598124d11fd04f02ad860/contactos";
pub const DEFAULT_LEADS_URL: &str =
    "https://api.steinhq.com/v1/storages/66e598124d11fd04f02ad860/leads";

pub const CONTACTS_URL_ENV: &str = "LEADPULSE_CONTACTS_URL";
pub const LEADS_URL_ENV: &str = "LEADPULSE_LEADS_URL";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub contacts_url: String,
    pub leads_url: String,
    pub request_timeout_secs: u64,
    /// Period name used when the UI sends none
    pub default_period: String,
    pub adjust_comparisons: bool,
    /// County values left out of county breakdowns
    pub county_noise: Vec<String>,
    pub converted_status: String,
    pub in_contact_status: String,
}

impl Default for Config {
    fn default() -> Self {
        let vocabulary = ConversionVocabulary::default();
        Self {
            contacts_url: DEFAULT_CONTACTS_URL.to_string(),
            leads_url: DEFAULT_LEADS_URL.to_string(),
            request_timeout_secs: 30,
            default_period: "30days".to_string(),
            adjust_comparisons: false,
            county_noise: vec!["questionar cliente".to_string(), "sem informação".to_string()],
            converted_status: vocabulary.converted_status,
            in_contact_status: vocabulary.in_contact_status,
        }
    }
}

impl Config {
    /// Read a config file; missing keys take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load the default config file if it exists, then apply env overrides
    ///
    /// A broken config file is logged and replaced by the defaults.
    pub fn load_or_default() -> Self {
        let path = default_config_path();
        let config = if path.exists() {
            match Self::load(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::warn!("Ignoring config at {:?}: {}", path, e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply endpoint overrides from a variable lookup
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(CONTACTS_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.contacts_url = url;
        }
        if let Some(url) = lookup(LEADS_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.leads_url = url;
        }
        self
    }

    pub fn default_selector(&self) -> PeriodSelector {
        PeriodSelector::from(self.default_period.as_str())
    }

    pub fn vocabulary(&self) -> ConversionVocabulary {
        ConversionVocabulary {
            converted_status: self.converted_status.clone(),
            in_contact_status: self.in_contact_status.clone(),
        }
    }

    /// Options for county breakdowns, dropping noise values
    pub fn county_options(&self) -> CategoryOptions {
        CategoryOptions::default().with_excluded(&self.county_noise)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Get the default config file path
pub fn default_config_path() -> PathBuf {
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("leadpulse").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.contacts_url, DEFAULT_CONTACTS_URL);
        assert_eq!(config.default_selector(), PeriodSelector::Last30Days);
        assert!(!config.adjust_comparisons);
        assert_eq!(config.vocabulary(), ConversionVocabulary::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"adjustComparisons": true, "defaultPeriod": "week"}"#).unwrap();
        assert!(config.adjust_comparisons);
        assert_eq!(config.default_selector(), PeriodSelector::ThisWeek);
        assert_eq!(config.leads_url, DEFAULT_LEADS_URL);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_env_overrides(|key| match key {
            CONTACTS_URL_ENV => Some("http://localhost:9000/contacts".to_string()),
            LEADS_URL_ENV => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.contacts_url, "http://localhost:9000/contacts");
        assert_eq!(config.leads_url, DEFAULT_LEADS_URL);
    }

    #[test]
    fn test_county_options() {
        let options = Config::default().county_options();
        assert!(!options.exclude_unknown);
        assert!(options.excluded_values.contains(&"questionar cliente".to_string()));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join("leadpulse_config_test")
            .join("config.json");

        let mut config = Config::default();
        config.default_period = "year".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_invalid_json() {
        let path = std::env::temp_dir().join("leadpulse_invalid_config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigError::Json(_))));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("leadpulse/config.json"));
    }
}
