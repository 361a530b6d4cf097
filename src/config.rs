//! Configuration management for the resume analyzer

use crate::error::{Result, ResumeAnalyzerError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub model: String,
    pub endpoint: String,
    /// Inline credential; takes precedence over the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub api_key_env: String,
    /// Request timeout in seconds, 0 disables it
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub show_raw_reply: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                model: DEFAULT_MODEL.to_string(),
                endpoint: DEFAULT_ENDPOINT.to_string(),
                api_key: None,
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
                timeout_secs: 120,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
                show_raw_reply: false,
            },
        }
    }
}

impl Config {
    /// Load the configuration from the default location.
    ///
    /// A missing file yields the defaults; nothing is written to disk.
    pub fn load() -> Result<Self> {
        Self::load_or_default(&Self::config_path())
    }

    /// Load `path` if it exists, otherwise fall back to the defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load the configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            ResumeAnalyzerError::Configuration(format!(
                "Failed to parse config '{}': {}",
                path.display(),
                e
            ))
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            ResumeAnalyzerError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-analyzer")
            .join("config.toml")
    }

    /// Resolve the API credential: the config value first, then the
    /// environment (after loading a `.env` file if one exists).
    pub fn api_key(&self) -> Result<String> {
        if let Some(key) = self.api.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.to_string());
        }

        let _ = dotenvy::dotenv();
        match std::env::var(&self.api.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ResumeAnalyzerError::Configuration(format!(
                "No API key configured: set `api.api_key` in {} or the {} environment variable",
                Self::config_path().display(),
                self.api.api_key_env
            ))),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.api.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("gemini-1.5-pro"));
        assert!(text.contains("format = \"console\""));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.api.model, DEFAULT_MODEL);
        assert_eq!(parsed.output.format, OutputFormat::Console);
        assert!(parsed.api.api_key.is_none());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.api.model = "gemini-1.5-flash".to_string();
        config.output.format = OutputFormat::Html;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api.model, "gemini-1.5-flash");
        assert_eq!(loaded.output.format, OutputFormat::Html);
    }

    #[test]
    fn test_missing_config_uses_defaults_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume-analyzer").join("config.toml");

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.api.model, DEFAULT_MODEL);
        assert_eq!(config.api.timeout_secs, 120);
        assert!(!path.exists());
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn test_existing_config_is_read_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.api.model = "gemini-1.5-flash".to_string();
        config.save_to(&path).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let loaded = Config::load_or_default(&path).unwrap();
        assert_eq!(loaded.api.model, "gemini-1.5-flash");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_malformed_config_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nmodel = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ResumeAnalyzerError::Configuration(_)));
    }

    #[test]
    fn test_inline_api_key_wins() {
        let mut config = Config::default();
        config.api.api_key = Some("inline-key".to_string());
        config.api.api_key_env = "RESUME_ANALYZER_TEST_UNSET_KEY".to_string();
        assert_eq!(config.api_key().unwrap(), "inline-key");
    }

    #[test]
    fn test_missing_api_key_is_reported() {
        let mut config = Config::default();
        config.api.api_key = Some("   ".to_string());
        config.api.api_key_env = "RESUME_ANALYZER_TEST_DEFINITELY_UNSET".to_string();
        let err = config.api_key().unwrap_err();
        assert!(err.to_string().contains("RESUME_ANALYZER_TEST_DEFINITELY_UNSET"));
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let mut config = Config::default();
        assert_eq!(config.timeout(), Some(Duration::from_secs(120)));
        config.api.timeout_secs = 0;
        assert_eq!(config.timeout(), None);
    }
}
