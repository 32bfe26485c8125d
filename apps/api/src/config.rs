use anyhow::{Context, Result};
use chrono_tz::Tz;

const DEFAULT_PORT: u16 = 4567;
const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";
const DEFAULT_INFERENCE_API_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
const DEFAULT_PARAPHRASE_MODEL: &str = "Vamsi/T5_Paraphrase_Paws";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a value is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Reports are kept in memory when unset.
    pub database_url: Option<String>,
    pub timezone: String,
    pub inference_api_url: String,
    pub inference_api_token: Option<String>,
    pub sentiment_model: String,
    pub paraphrase_model: String,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timezone = get("TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        timezone
            .parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("TIMEZONE '{timezone}' is not a known IANA zone"))?;

        let port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Config {
            database_url: get("DATABASE_URL"),
            timezone,
            inference_api_url: get("INFERENCE_API_URL")
                .unwrap_or_else(|| DEFAULT_INFERENCE_API_URL.to_string()),
            inference_api_token: get("INFERENCE_API_TOKEN"),
            sentiment_model: get("SENTIMENT_MODEL")
                .unwrap_or_else(|| DEFAULT_SENTIMENT_MODEL.to_string()),
            paraphrase_model: get("PARAPHRASE_MODEL")
                .unwrap_or_else(|| DEFAULT_PARAPHRASE_MODEL.to_string()),
            max_upload_bytes,
            port,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 4567);
        assert_eq!(config.timezone, "Asia/Kolkata");
        assert_eq!(config.paraphrase_model, "Vamsi/T5_Paraphrase_Paws");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.database_url.is_none());
        assert!(config.inference_api_token.is_none());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("TIMEZONE", "Europe/Berlin"),
            ("DATABASE_URL", "postgres://localhost/analyzer"),
            ("INFERENCE_API_TOKEN", "hf_token"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.timezone, "Europe/Berlin");
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/analyzer")
        );
        assert_eq!(config.inference_api_token.as_deref(), Some("hf_token"));
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("DATABASE_URL", "  "), ("TIMEZONE", "")]).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.timezone, "Asia/Kolkata");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(config_from(&[("PORT", "not-a-port")]).is_err());
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        assert!(config_from(&[("TIMEZONE", "Mars/Olympus_Mons")]).is_err());
    }
}
