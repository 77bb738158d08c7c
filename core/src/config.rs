//! Configuration Management Module
//!
//! Built-in defaults, overlaid by a TOML file, then by environment
//! variables, then by whatever the caller (usually the CLI) sets last.
//! String values written as `env:NAME` are read from the environment.

use anyhow::{Context, Result};
use guesstimate_tools::SearchConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "GUESSTIMATE_CONFIG";

const ENV_PREFIX: &str = "env:";
const REDACTED: &str = "***";

/// Configuration validation failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported LLM provider: {0}")]
    UnsupportedProvider(String),

    #[error("Unsupported tool mode: {0}")]
    UnsupportedToolMode(String),

    #[error("Environment variable {0} referenced by config is not set")]
    MissingEnv(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("{field} is not an http(s) URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Temperature {0} is outside 0.0..=2.0")]
    InvalidTemperature(f32),
}

/// Language model provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Ollama,
    Stub,
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "ollama" => Ok(LlmProvider::Ollama),
            "stub" => Ok(LlmProvider::Stub),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Ollama => "ollama",
            LlmProvider::Stub => "stub",
        };
        f.write_str(name)
    }
}

/// How the pipeline reaches its tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// POST to a running tool server
    #[default]
    Http,
    /// Call the tool registry in-process
    Local,
}

impl FromStr for ToolMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(ToolMode::Http),
            "local" => Ok(ToolMode::Local),
            other => Err(ConfigError::UnsupportedToolMode(other.to_string())),
        }
    }
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ToolMode::Http => "http",
            ToolMode::Local => "local",
        })
    }
}

/// `[llm]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    /// Provider default when unset
    pub base_url: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            base_url: None,
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            temperature: 0.7,
            timeout_seconds: 30,
        }
    }
}

/// `[tools]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolsConfig {
    pub mode: ToolMode,
    pub server_url: String,
    pub timeout_seconds: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            mode: ToolMode::Http,
            server_url: "http://localhost:8000".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// `[server]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GuesstimateConfig {
    pub llm: LlmConfig,
    pub tools: ToolsConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
}

impl GuesstimateConfig {
    /// `<config_dir>/guesstimate/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("guesstimate").join("config.toml"))
    }

    /// Resolve the file (explicit, `$GUESSTIMATE_CONFIG`, default location)
    /// and apply environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an injectable environment
    pub fn load_with<F>(explicit: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let requested = explicit
            .map(Path::to_path_buf)
            .or_else(|| env(CONFIG_ENV).map(PathBuf::from));

        let mut config = match requested {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_overrides_from(&env);
        config.resolve_env_refs(&env)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `GUESSTIMATE_MODEL`,
    /// `GUESSTIMATE_SERVER_URL` and `TAVILY_API_KEY`
    pub fn apply_overrides_from<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let set = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = set("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
            debug!("Applied env override for LLM API key");
        }
        if let Some(url) = set("OPENAI_BASE_URL") {
            self.llm.base_url = Some(url);
            debug!("Applied env override for LLM base URL");
        }
        if let Some(model) = set("GUESSTIMATE_MODEL") {
            self.llm.model = model;
            debug!("Applied env override for model");
        }
        if let Some(url) = set("GUESSTIMATE_SERVER_URL") {
            self.tools.server_url = url;
            debug!("Applied env override for tool server URL");
        }
        if let Some(key) = set("TAVILY_API_KEY") {
            self.search.api_key = Some(key);
            debug!("Applied env override for search API key");
        }
    }

    /// Replace `env:NAME` values with the variable's contents
    pub fn resolve_env_refs<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for slot in [
            &mut self.llm.api_key,
            &mut self.llm.base_url,
            &mut self.search.api_key,
        ] {
            if let Some(value) = slot.as_mut() {
                resolve(value, &env)?;
            }
        }
        resolve(&mut self.tools.server_url, &env)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout("llm.timeout_seconds"));
        }
        if self.tools.timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout("tools.timeout_seconds"));
        }
        if self.search.timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout("search.timeout_seconds"));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidTemperature(self.llm.temperature));
        }
        if self.tools.mode == ToolMode::Http {
            check_url("tools.server_url", &self.tools.server_url)?;
        }
        if let Some(url) = &self.llm.base_url {
            check_url("llm.base_url", url)?;
        }
        Ok(())
    }

    /// Copy with API keys masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for key in [&mut copy.llm.api_key, &mut copy.search.api_key] {
            if key.is_some() {
                *key = Some(REDACTED.to_string());
            }
        }
        copy
    }
}

fn resolve<F>(value: &mut String, env: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(name) = value.strip_prefix(ENV_PREFIX) {
        let name = name.trim().to_string();
        *value = env(&name).ok_or(ConfigError::MissingEnv(name))?;
    }
    Ok(())
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
        })
    }
}
