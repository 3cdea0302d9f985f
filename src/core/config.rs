use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::errors::GptError;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 1500;
pub const DEFAULT_TEMPERATURE: f64 = 1.0;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// How the sampling temperature is written into request bodies.
///
/// Older deployments of this client coerced the temperature to an integer,
/// so `0.7` went over the wire as `0`. `Truncated` keeps that wire format for
/// callers that depend on it; `Fractional` sends the value unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureEncoding {
    #[default]
    Fractional,
    Truncated,
}

impl FromStr for TemperatureEncoding {
    type Err = GptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fractional" => Ok(TemperatureEncoding::Fractional),
            "truncated" => Ok(TemperatureEncoding::Truncated),
            other => Err(GptError::ConfigError(format!(
                "unknown temperature encoding '{other}' (expected 'fractional' or 'truncated')"
            ))),
        }
    }
}

/// Settings for a [`GptClient`](crate::ai::GptClient). Built once and never
/// mutated after the client takes ownership of it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub temperature_encoding: TemperatureEncoding,
    pub conversation_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    pub base_url: String,
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            temperature_encoding: TemperatureEncoding::default(),
            conversation_path: None,
            log_path: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_temperature_encoding(mut self, encoding: TemperatureEncoding) -> Self {
        self.temperature_encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_conversation_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.conversation_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Reads the configuration from process environment variables.
    ///
    /// Only `OPENAI_API_KEY` is required; everything else falls back to the
    /// defaults of [`ClientConfig::new`].
    ///
    /// # Errors
    ///
    /// Returns `GptError::ConfigError` if the key is missing or a numeric
    /// variable does not parse.
    pub fn from_env() -> Result<Self, GptError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|e| GptError::ConfigError(format!("OPENAI_API_KEY: {e}")))?;

        let mut config = Self::new(api_key);

        if let Ok(model) = env::var("OPENAI_MODEL") {
            config.model = model;
        }
        if let Ok(raw) = env::var("OPENAI_MAX_TOKENS") {
            config.max_tokens = raw
                .trim()
                .parse()
                .map_err(|e| GptError::ConfigError(format!("OPENAI_MAX_TOKENS: {e}")))?;
        }
        if let Ok(raw) = env::var("OPENAI_TEMPERATURE") {
            config.temperature = raw
                .trim()
                .parse()
                .map_err(|e| GptError::ConfigError(format!("OPENAI_TEMPERATURE: {e}")))?;
        }
        if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(raw) = env::var("GPTLITE_TEMPERATURE_ENCODING") {
            config.temperature_encoding = raw.parse()?;
        }
        config.conversation_path = env::var("GPTLITE_CONVERSATION_PATH").ok().map(PathBuf::from);
        config.log_path = env::var("GPTLITE_LOG_PATH").ok().map(PathBuf::from);
        if let Ok(raw) = env::var("GPTLITE_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|e| GptError::ConfigError(format!("GPTLITE_TIMEOUT_SECS: {e}")))?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `GptError::ConfigError` describing the first invalid field.
    pub fn validate(&self) -> Result<(), GptError> {
        if self.api_key.trim().is_empty() {
            return Err(GptError::ConfigError("API key is not set".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(GptError::ConfigError("model is not set".to_string()));
        }
        if self.max_tokens == 0 {
            return Err(GptError::ConfigError(
                "max_tokens must be positive".to_string(),
            ));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(GptError::ConfigError(format!(
                "temperature must be a non-negative number, got {}",
                self.temperature
            )));
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| GptError::ConfigError(format!("base_url '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GptError::ConfigError(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        Ok(())
    }

    #[must_use]
    pub fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/completions", self.base_url.trim_end_matches('/'))
    }

    /// The temperature as it goes into a request body.
    #[must_use]
    pub fn wire_temperature(&self) -> serde_json::Value {
        match self.temperature_encoding {
            TemperatureEncoding::Fractional => serde_json::json!(self.temperature),
            TemperatureEncoding::Truncated => {
                #[allow(clippy::cast_possible_truncation)]
                let whole = self.temperature.trunc() as i64;
                serde_json::json!(whole)
            }
        }
    }
}
