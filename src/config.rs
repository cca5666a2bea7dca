//! Runtime configuration resolved from the environment.
//!
//! Every setting has an environment key so the same lookup serves the server,
//! the CLI (which layers its flags over the environment) and tests (which pass
//! a closure instead of touching process state).

use std::{fmt, net::SocketAddr, str::FromStr, time::Duration};

use crate::error::{PlannerError, Result};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4.1-mini";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_MAX_RETRIES: usize = 2;
pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_OPENROUTER_BASE_URL: &str = "OPENROUTER_BASE_URL";
pub const ENV_MODEL: &str = "WANDERPLAN_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "WANDERPLAN_TIMEOUT_SECS";
pub const ENV_MAX_TOKENS: &str = "WANDERPLAN_MAX_TOKENS";
pub const ENV_MAX_RETRIES: &str = "WANDERPLAN_MAX_RETRIES";
pub const ENV_ADDR: &str = "WANDERPLAN_ADDR";
pub const ENV_TEMPERATURE: &str = "WANDERPLAN_TEMPERATURE";

#[derive(Clone)]
pub struct PlannerConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
    pub max_tokens: Option<u32>,
    pub max_retries: usize,
    /// Sampling temperature; `None` leaves the endpoint default.
    pub temperature: Option<f32>,
    pub addr: SocketAddr,
}

impl PlannerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: None,
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = get(ENV_API_KEY).ok_or_else(|| {
            PlannerError::Config(format!(
                "{ENV_API_KEY} must be set (environment, .env file or --api-key)"
            ))
        })?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = get(ENV_BASE_URL).or_else(|| get(ENV_OPENROUTER_BASE_URL)) {
            config.base_url = base_url;
        }
        if let Some(model) = get(ENV_MODEL) {
            config.model = model;
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            config.request_timeout = Duration::from_secs(parse_setting(ENV_TIMEOUT_SECS, &secs)?);
        }
        if let Some(max_tokens) = get(ENV_MAX_TOKENS) {
            let max_tokens: u32 = parse_setting(ENV_MAX_TOKENS, &max_tokens)?;
            config.max_tokens = (max_tokens > 0).then_some(max_tokens);
        }
        if let Some(retries) = get(ENV_MAX_RETRIES) {
            config.max_retries = parse_setting(ENV_MAX_RETRIES, &retries)?;
        }
        if let Some(temperature) = get(ENV_TEMPERATURE) {
            config.temperature = Some(parse_setting(ENV_TEMPERATURE, &temperature)?);
        }
        config.addr = parse_setting(ENV_ADDR, &get(ENV_ADDR).unwrap_or(DEFAULT_ADDR.into()))?;

        if config.request_timeout.is_zero() {
            return Err(PlannerError::Config(format!(
                "{ENV_TIMEOUT_SECS} must be greater than zero"
            )));
        }

        if let Some(temperature) = config.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(PlannerError::Config(format!(
                    "{ENV_TEMPERATURE} must be between 0 and 2"
                )));
            }
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }
}

fn parse_setting<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse()
        .map_err(|err| PlannerError::Config(format!("invalid {key} value `{raw}`: {err}")))
}

// The API key never reaches logs.
impl fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("temperature", &self.temperature)
            .field("addr", &self.addr)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_only_key_is_set() {
        let config = PlannerConfig::from_lookup(lookup(&[(ENV_API_KEY, "sk-test")])).unwrap();

        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.max_tokens, Some(DEFAULT_MAX_TOKENS));
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(config.temperature, None);
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = PlannerConfig::from_lookup(lookup(&[(ENV_API_KEY, "   ")])).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_overrides_are_read() {
        let config = PlannerConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_OPENROUTER_BASE_URL, "http://localhost:9999/v1"),
            (ENV_MODEL, "anthropic/claude-sonnet-4"),
            (ENV_TIMEOUT_SECS, "30"),
            (ENV_MAX_TOKENS, "0"),
            (ENV_MAX_RETRIES, "5"),
            (ENV_TEMPERATURE, "0.4"),
            (ENV_ADDR, "0.0.0.0:8080"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:9999/v1");
        assert_eq!(config.model, "anthropic/claude-sonnet-4");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_tokens, None);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.temperature, Some(0.4));
        assert_eq!(config.addr.port(), 8080);
    }

    #[test]
    fn test_openai_base_url_wins_over_openrouter() {
        let config = PlannerConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_BASE_URL, "https://api.openai.com/v1"),
            (ENV_OPENROUTER_BASE_URL, "http://ignored"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_bad_numbers_are_rejected() {
        let err = PlannerConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));

        let err = PlannerConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_TIMEOUT_SECS, "0"),
        ]))
        .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");

        let err = PlannerConfig::from_lookup(lookup(&[
            (ENV_API_KEY, "sk-test"),
            (ENV_TEMPERATURE, "3.5"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains(ENV_TEMPERATURE));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", PlannerConfig::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
