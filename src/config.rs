// file: src/config.rs
// description: application configuration management with toml and environment support
// reference: https://docs.rs/config

use crate::error::{Result, SummarizeError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the Gemini credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub model: ModelConfig,
    pub chunking: ChunkingConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChunkingConfig {
    pub max_chunk_size: usize,
    pub overlap_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SummaryConfig {
    pub strategy: CombineStrategy,
    pub concurrency: usize,
}

/// How per-chunk outputs become one summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombineStrategy {
    /// Join partial results in chunk order with a paragraph break.
    #[default]
    Concatenate,
    /// Join partial results, then run them through the model once more.
    Reduce,
}

impl std::fmt::Display for CombineStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Concatenate => write!(f, "concatenate"),
            Self::Reduce => write!(f, "reduce"),
        }
    }
}

impl std::str::FromStr for CombineStrategy {
    type Err = SummarizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concatenate" | "concat" => Ok(Self::Concatenate),
            "reduce" => Ok(Self::Reduce),
            other => Err(SummarizeError::Config(format!(
                "unknown combine strategy: {}",
                other
            ))),
        }
    }
}

impl Config {
    /// Loads defaults, then the optional TOML file, then `PDF_SUMMARIZE__*`
    /// environment overrides. The credential falls back to `GEMINI_API_KEY`.
    /// Values are not validated here; call [`Config::validate`] once command
    /// line overrides have been applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::from_filename("API.env").ok();
        dotenvy::dotenv().ok();

        let defaults = Self::default_config();

        let mut builder = config::Config::builder()
            .set_default("model.model", defaults.model.model.as_str())
            .and_then(|b| b.set_default("model.temperature", defaults.model.temperature as f64))
            .and_then(|b| b.set_default("model.base_url", defaults.model.base_url.as_str()))
            .and_then(|b| b.set_default("model.timeout_secs", defaults.model.timeout_secs))
            .and_then(|b| {
                b.set_default(
                    "chunking.max_chunk_size",
                    defaults.chunking.max_chunk_size as u64,
                )
            })
            .and_then(|b| {
                b.set_default("chunking.overlap_size", defaults.chunking.overlap_size as u64)
            })
            .and_then(|b| b.set_default("summary.strategy", defaults.summary.strategy.to_string()))
            .and_then(|b| {
                b.set_default("summary.concurrency", defaults.summary.concurrency as u64)
            })
            .map_err(|e| SummarizeError::Config(e.to_string()))?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new("config/default.toml")).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PDF_SUMMARIZE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| SummarizeError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| SummarizeError::Config(e.to_string()))?;

        if config.model.api_key.is_none() {
            config.model.api_key = std::env::var(API_KEY_ENV).ok();
        }

        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            model: ModelConfig {
                api_key: None,
                model: DEFAULT_MODEL.to_string(),
                temperature: 0.3,
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            chunking: ChunkingConfig {
                max_chunk_size: 20_000,
                overlap_size: 1_000,
            },
            summary: SummaryConfig {
                strategy: CombineStrategy::Concatenate,
                concurrency: 1,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunking.max_chunk_size == 0 {
            return Err(SummarizeError::Config(
                "max_chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.chunking.overlap_size >= self.chunking.max_chunk_size {
            return Err(SummarizeError::Config(format!(
                "overlap_size ({}) must be smaller than max_chunk_size ({})",
                self.chunking.overlap_size, self.chunking.max_chunk_size
            )));
        }

        if !(0.0..=1.0).contains(&self.model.temperature) {
            return Err(SummarizeError::Config(format!(
                "temperature must be within [0, 1], got {}",
                self.model.temperature
            )));
        }

        if self.model.model.trim().is_empty() {
            return Err(SummarizeError::Config(
                "model identifier must not be empty".to_string(),
            ));
        }

        if self.summary.concurrency == 0 {
            return Err(SummarizeError::Config(
                "concurrency must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl ModelConfig {
    /// Returns the configured credential, rejecting absent or blank keys.
    pub fn credential(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(SummarizeError::Config(format!(
                "{} not found. Set it in the environment, .env or API.env",
                API_KEY_ENV
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunking.max_chunk_size, 20_000);
        assert_eq!(config.chunking.overlap_size, 1_000);
        assert_eq!(config.summary.strategy, CombineStrategy::Concatenate);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_max() {
        let mut config = Config::default_config();
        config.chunking.max_chunk_size = 1000;
        config.chunking.overlap_size = 1000;

        assert!(matches!(config.validate(), Err(SummarizeError::Config(_))));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = Config::default_config();
        config.chunking.max_chunk_size = 0;
        config.chunking.overlap_size = 0;

        assert!(matches!(config.validate(), Err(SummarizeError::Config(_))));
    }

    #[test]
    fn test_temperature_out_of_range_rejected() {
        let mut config = Config::default_config();
        config.model.temperature = 1.5;

        assert!(matches!(config.validate(), Err(SummarizeError::Config(_))));
    }

    #[test]
    fn test_missing_credential() {
        let mut config = Config::default_config();
        assert!(config.model.credential().is_err());

        config.model.api_key = Some("   ".to_string());
        assert!(config.model.credential().is_err());

        config.model.api_key = Some("secret".to_string());
        assert_eq!(config.model.credential().unwrap(), "secret");
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("summarize.toml");
        fs::write(
            &path,
            "[model]\nmodel = \"gemini-2.0-flash\"\ntemperature = 0.5\n\n[chunking]\nmax_chunk_size = 4000\noverlap_size = 200\n\n[summary]\nstrategy = \"reduce\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.model.model, "gemini-2.0-flash");
        assert_eq!(config.chunking.max_chunk_size, 4000);
        assert_eq!(config.chunking.overlap_size, 200);
        assert_eq!(config.summary.strategy, CombineStrategy::Reduce);
        assert_eq!(config.summary.concurrency, 1);
    }

    #[test]
    fn test_invalid_file_values_can_be_overridden() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        fs::write(&path, "[chunking]\nmax_chunk_size = 100\noverlap_size = 100\n").unwrap();

        let mut config = Config::load(Some(&path)).unwrap();
        assert!(matches!(config.validate(), Err(SummarizeError::Config(_))));

        config.chunking.overlap_size = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        fs::write(&path, "[chunking]\nmax_chunk_size = \"many\"\n").unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(SummarizeError::Config(_))
        ));
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!(
            "Reduce".parse::<CombineStrategy>().unwrap(),
            CombineStrategy::Reduce
        );
        assert_eq!(
            "concat".parse::<CombineStrategy>().unwrap(),
            CombineStrategy::Concatenate
        );
        assert!("map_rerank".parse::<CombineStrategy>().is_err());
    }
}
