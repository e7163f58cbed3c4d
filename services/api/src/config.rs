use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Defines the supported generation service providers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Provider {
    OpenAI,
    Gemini,
}

impl Provider {
    /// Base URL of the provider's OpenAI-compatible endpoint.
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Provider::OpenAI => "https://api.openai.com/v1/",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai",
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub provider: Provider,
    /// Credential for the generation service. When absent, requests are
    /// sent unauthenticated and the service rejects them.
    pub api_key: Option<String>,
    pub api_base: String,
    pub chat_model: String,
    pub assessment_model: String,
    /// `RUST_LOG` directives, e.g. `info,tower_http=debug`.
    pub log_filter: String,
}

impl Config {
    /// Builds the subscriber filter from `log_filter`.
    pub fn env_filter(&self) -> Result<EnvFilter, ConfigError> {
        EnvFilter::try_new(&self.log_filter)
            .map_err(|e| ConfigError::InvalidValue("RUST_LOG".to_string(), e.to_string()))
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let provider_str = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
        let provider = match provider_str.to_lowercase().as_str() {
            "gemini" => Provider::Gemini,
            "openai" => Provider::OpenAI,
            other => {
                return Err(ConfigError::InvalidValue(
                    "LLM_PROVIDER".to_string(),
                    format!("'{}' is not a supported provider", other),
                ));
            }
        };

        let api_key = std::env::var("API_KEY").ok().filter(|key| !key.is_empty());

        let api_base = std::env::var("API_BASE")
            .unwrap_or_else(|_| provider.default_api_base().to_string());

        let chat_model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gemini-3-flash-preview".to_string());
        let assessment_model = std::env::var("ASSESSMENT_MODEL")
            .unwrap_or_else(|_| "gemini-3-pro-preview".to_string());

        let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let config = Self {
            bind_address,
            provider,
            api_key,
            api_base,
            chat_model,
            assessment_model,
            log_filter,
        };
        config.env_filter()?;
        Ok(config)
    }
}
