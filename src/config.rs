use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required setting {0} is not set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Which payload generator backs recipe creation.
#[derive(Debug, Clone, Deserialize)]
pub enum GeneratorConfig {
    Template,
    Llm(LlmConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ImageResolverKind {
    Slug,
    Random,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub app_title: String,
    /// Partition key for records created through the JSON API.
    pub app_id: String,
    pub generator: GeneratorConfig,
    pub image_resolver: ImageResolverKind,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let port = match get("APP_PORT") {
            Some(v) => v.parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "APP_PORT",
                reason: e.to_string(),
            })?,
            None => 5000,
        };

        let generator = match get("RECIPE_GENERATOR").as_deref() {
            None | Some("template") => GeneratorConfig::Template,
            Some("llm") => {
                let timeout_secs = match get("LLM_TIMEOUT_SECS") {
                    Some(v) => v.parse::<u64>().map_err(|e| ConfigError::Invalid {
                        key: "LLM_TIMEOUT_SECS",
                        reason: e.to_string(),
                    })?,
                    None => 30,
                };
                GeneratorConfig::Llm(LlmConfig {
                    api_key: required("LLM_API_KEY")?,
                    model: get("LLM_MODEL").unwrap_or_else(|| "gemini-2.0-flash".into()),
                    base_url: get("LLM_BASE_URL").unwrap_or_else(|| {
                        "https://generativelanguage.googleapis.com/v1beta".into()
                    }),
                    timeout_secs,
                })
            }
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "RECIPE_GENERATOR",
                    reason: format!("expected `template` or `llm`, got `{other}`"),
                })
            }
        };

        let image_resolver = match get("IMAGE_RESOLVER").as_deref() {
            None | Some("slug") => ImageResolverKind::Slug,
            Some("random") => ImageResolverKind::Random,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "IMAGE_RESOLVER",
                    reason: format!("expected `slug` or `random`, got `{other}`"),
                })
            }
        };

        Ok(Self {
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            database_url: get("DATABASE_URL").unwrap_or_else(|| "sqlite://recipes.db".into()),
            app_title: get("APP_TITLE")
                .unwrap_or_else(|| "MAB Media \u{2013} Recipe Generator".into()),
            app_id: required("APP_ID")?,
            generator,
            image_resolver,
        })
    }

    pub fn generator_kind(&self) -> &'static str {
        match self.generator {
            GeneratorConfig::Template => "template",
            GeneratorConfig::Llm(_) => "llm",
        }
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "APP_HOST",
                reason: e.to_string(),
            })
    }
}
