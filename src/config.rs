use reqwest::Url;
use std::{env, net::SocketAddr, str::FromStr, time::Duration};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
    #[error(transparent)]
    DotEnvError(#[from] dotenvy::Error),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    // Collection endpoint of the backing store, e.g. http://localhost:3000/toys
    pub toys_api_url: Url,
    pub request_timeout: Duration,
    // How long a mutating page request waits for the store before redirecting
    pub settle_timeout: Duration,
}

impl Config {
    /// Loads configuration from a `.env` file (if present) and environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), ".env file loaded"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e.into()),
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let bind_address = SocketAddr::from_str(&bind_address_str)
            .map_err(|e| ConfigError::InvalidVar("BIND_ADDRESS".into(), e.to_string()))?;

        let toys_api_str = lookup("TOYS_API_URL")
            .unwrap_or_else(|| "http://localhost:3000/toys".to_string());
        let toys_api_url = Url::parse(&toys_api_str)
            .map_err(|e| ConfigError::InvalidVar("TOYS_API_URL".into(), e.to_string()))?;
        if toys_api_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidVar(
                "TOYS_API_URL".into(),
                "URL cannot have path segments appended".into(),
            ));
        }

        let request_timeout = Duration::from_secs(parse_number(&lookup, "TOYS_API_TIMEOUT_SECS", 10)?);
        let settle_timeout = Duration::from_millis(parse_number(&lookup, "SETTLE_TIMEOUT_MS", 2000)?);

        Ok(Config {
            bind_address,
            toys_api_url,
            request_timeout,
            settle_timeout,
        })
    }
}

fn parse_number<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| ConfigError::InvalidVar(key.into(), e.to_string())),
        None => Ok(default),
    }
}
