use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const DEFAULT_MAX_TEXT_CHARS: usize = 4000;
pub const DEFAULT_ROW_DELAY_MS: u64 = 1200;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the chat-completions API. Calls fail without it.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub fetch_timeout: Duration,
    pub llm_timeout: Duration,
    /// Characters of extracted text kept per document
    pub max_text_chars: usize,
    /// Pause after every successfully processed row
    pub row_delay: Duration,
    pub bind_addr: String,
    pub rate_limit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            fetch_timeout: Duration::from_secs(10),
            llm_timeout: Duration::from_secs(90),
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            row_delay: Duration::from_millis(DEFAULT_ROW_DELAY_MS),
            bind_addr: "127.0.0.1:3000".to_string(),
            rate_limit: true,
        }
    }
}

impl Config {
    /// Build the config from process environment variables.
    ///
    /// Call `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Config::default();

        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        if openai_api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set; summaries will be marked as errors");
        }

        Ok(Config {
            openai_api_key,
            openai_base_url: env::var("OPENAI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openai_base_url),
            model: env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            temperature: parse_var("OPENAI_TEMPERATURE")?.unwrap_or(defaults.temperature),
            fetch_timeout: parse_var("FETCH_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            llm_timeout: parse_var("LLM_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.llm_timeout),
            max_text_chars: parse_var("MAX_TEXT_CHARS")?.unwrap_or(defaults.max_text_chars),
            row_delay: parse_var("ROW_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.row_delay),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            rate_limit: parse_var("RATE_LIMIT")?.unwrap_or(defaults.rate_limit),
        })
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::InvalidConfig(format!("{} has an invalid value: {:?}", name, raw))),
        Err(_) => Ok(None),
    }
}
