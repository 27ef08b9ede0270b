//! Configuration types and loader for symrag.
//!
//! Config is read from `.symrag.yml` in the working directory when present,
//! otherwise every field falls back to its serde default. The LLM credential
//! is resolved once here (file value, then `SYMRAG_API_KEY`) into an explicit
//! `Option<String>` so downstream code never touches the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Loads from `path`, or `.symrag.yml` when `None`. A missing default
    /// file is not an error; an explicit path that fails to read is.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = path.unwrap_or_else(|| Path::new(".symrag.yml"));
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
                path: config_path.to_path_buf(),
                source,
            })?;
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: config_path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };

        if config.llm.api_key.is_none() {
            config.llm.api_key = std::env::var("SYMRAG_API_KEY").ok().filter(|k| !k.is_empty());
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Directory containing the engine binary and its data files. The engine
    /// is spawned with this as working directory so it can resolve its own
    /// index by relative path.
    #[serde(default = "default_backend_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on concurrent engine invocations during a search.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            dir: default_backend_dir(),
            timeout_secs: default_timeout_secs(),
            max_parallel: default_max_parallel(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

fn default_backend_dir() -> PathBuf {
    PathBuf::from("backend")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_parallel() -> usize {
    4
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.backend.dir, PathBuf::from("backend"));
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.backend.max_parallel, 4);
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("backend:\n  dir: /opt/engine\n").unwrap();
        assert_eq!(config.backend.dir, PathBuf::from("/opt/engine"));
        assert_eq!(config.backend.max_parallel, 4);
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn full_yaml_round_trip() {
        let yaml = "backend:\n  dir: backend\n  timeout_secs: 5\n  max_parallel: 2\nllm:\n  api_base: http://localhost:11434/v1\n  model: qwen2.5\n  api_key: abc\n  timeout_secs: 10\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.backend.timeout_secs, 5);
        assert_eq!(config.llm.api_key.as_deref(), Some("abc"));
        assert_eq!(config.llm.api_base, "http://localhost:11434/v1");
    }
}
