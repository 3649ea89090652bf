//! Configuration management for the resume analyzer

use crate::error::{Result, ResumeAnalyzerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub prompts: PromptsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub chunk_size: usize,
    pub max_output_tokens: u32,
    pub max_concurrent_requests: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptsConfig {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Text,
    Json,
}

pub const DEFAULT_CHUNK_SIZE: usize = 3000;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1500;

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://api.groq.com/openai/v1".to_string(),
                model: "gemma2-9b-it".to_string(),
                temperature: 0.7,
                timeout_secs: 120,
                api_key_env: "GROQ_API_KEY".to_string(),
            },
            analysis: AnalysisConfig {
                chunk_size: DEFAULT_CHUNK_SIZE,
                max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
                max_concurrent_requests: 1,
            },
            prompts: PromptsConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
                output_dir: None,
            },
        }
    }
}

impl Config {
    /// Load from `config_path`, writing defaults there on first run
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeAnalyzerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-analyzer")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.analysis.chunk_size == 0 {
            return Err(ResumeAnalyzerError::Configuration(
                "analysis.chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.analysis.max_concurrent_requests == 0 {
            return Err(ResumeAnalyzerError::Configuration(
                "analysis.max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ResumeAnalyzerError::Configuration(
                "api.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Read the API credential from the environment, loading `.env` first if present.
    pub fn api_key(&self) -> Result<String> {
        dotenvy::dotenv().ok();
        Self::api_key_from(&self.api.api_key_env, std::env::var(&self.api.api_key_env).ok())
    }

    fn api_key_from(var_name: &str, value: Option<String>) -> Result<String> {
        match value {
            Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(ResumeAnalyzerError::Configuration(format!(
                "{} is not set in the environment or .env file",
                var_name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.analysis.chunk_size, 3000);
        assert_eq!(config.analysis.max_output_tokens, 1500);
        assert_eq!(config.analysis.max_concurrent_requests, 1);
        assert_eq!(config.api.model, "gemma2-9b-it");
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.api.api_key_env, "GROQ_API_KEY");

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.analysis.chunk_size, config.analysis.chunk_size);
    }

    #[test]
    fn test_invalid_chunk_size_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.analysis.chunk_size = 0;
        config.save_to(&path).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ResumeAnalyzerError::Configuration(_)));
    }

    #[test]
    fn test_malformed_toml_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ResumeAnalyzerError::Configuration(_)));
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(
            Config::api_key_from("GROQ_API_KEY", None),
            Err(ResumeAnalyzerError::Configuration(_))
        ));
        assert!(matches!(
            Config::api_key_from("GROQ_API_KEY", Some("   ".to_string())),
            Err(ResumeAnalyzerError::Configuration(_))
        ));
        assert_eq!(
            Config::api_key_from("GROQ_API_KEY", Some("gsk_test\n".to_string())).unwrap(),
            "gsk_test"
        );
    }
}
