use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ConfigError;

pub const DEFAULT_RPC_URL: &str = "https://fullnode.mainnet.sui.io:443";
pub const DEFAULT_NARRATIVE_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_NARRATIVE_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_SHARE_BASE_URL: &str = "https://suilens.app/";

pub const CONFIG_PATH_ENV: &str = "SUILENS_CONFIG";
pub const RPC_URL_ENV: &str = "SUILENS_RPC_URL";
pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const SHARE_BASE_URL_ENV: &str = "SUILENS_SHARE_BASE_URL";

/// Settings shared by the CLI and the API server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainerConfig {
    /// Sui fullnode JSON-RPC endpoint
    pub rpc_url: String,
    pub request_timeout_secs: u64,
    /// Base of shareable links, `?tx=<digest>` is appended
    pub share_base_url: String,
    pub narrative: NarrativeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Without a key the AI narrative is unavailable
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            request_timeout_secs: 30,
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            narrative: NarrativeConfig::default(),
        }
    }
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_NARRATIVE_ENDPOINT.to_string(),
            model: DEFAULT_NARRATIVE_MODEL.to_string(),
            temperature: 0.5,
            max_tokens: 150,
        }
    }
}

impl ExplainerConfig {
    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Defaults, then the optional file, then environment overrides.
    ///
    /// `path` wins over `SUILENS_CONFIG`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok();
        let path = path.or(env_path.as_deref().map(Path::new));

        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config
            .with_overrides(|key| std::env::var(key).ok())
            .validated()
    }

    /// Applies overrides looked up by environment variable name.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(rpc_url) = lookup(RPC_URL_ENV) {
            self.rpc_url = rpc_url;
        }
        if let Some(api_key) = lookup(API_KEY_ENV) {
            self.narrative.api_key = Some(api_key);
        }
        if let Some(share_base_url) = lookup(SHARE_BASE_URL_ENV) {
            self.share_base_url = share_base_url;
        }
        self
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        self.rpc_endpoint()?;
        self.share_base()?;
        Url::parse(&self.narrative.endpoint).map_err(|e| ConfigError::Invalid {
            field: "narrative.endpoint",
            message: e.to_string(),
        })?;
        Ok(self)
    }

    pub fn rpc_endpoint(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.rpc_url).map_err(|e| ConfigError::Invalid {
            field: "rpc_url",
            message: e.to_string(),
        })
    }

    pub fn share_base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.share_base_url).map_err(|e| ConfigError::Invalid {
            field: "share_base_url",
            message: e.to_string(),
        })
    }
}
