use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// Empty values are stored as `None`.
    pub news_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub news_api_base_url: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub outbound_timeout: Duration,
    pub summary_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            news_api_key: None,
            gemini_api_key: None,
            news_api_base_url: DEFAULT_NEWS_API_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            outbound_timeout: Duration::from_secs(10),
            summary_concurrency: 5,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let defaults = Config::default();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        let outbound_timeout = match env::var("OUTBOUND_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => defaults.outbound_timeout,
        };

        let summary_concurrency = match env::var("SUMMARY_CONCURRENCY") {
            Ok(raw) => parse_concurrency(&raw)?,
            Err(_) => defaults.summary_concurrency,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            news_api_key: non_empty_var("NEWS_API_KEY"),
            gemini_api_key: non_empty_var("GOOGLE_GEMINI_API_KEY"),
            news_api_base_url: env::var("NEWS_API_BASE_URL").unwrap_or(defaults.news_api_base_url),
            gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            outbound_timeout,
            summary_concurrency,
        })
    }

    pub fn has_api_keys(&self) -> bool {
        self.news_api_key.is_some() && self.gemini_api_key.is_some()
    }
}

/// Whole seconds, at least one.
fn parse_timeout(raw: &str) -> Result<Duration> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| AppError::Config(format!("Invalid OUTBOUND_TIMEOUT_SECS: {}", e)))?;
    Ok(Duration::from_secs(secs.max(1)))
}

fn parse_concurrency(raw: &str) -> Result<usize> {
    let limit = raw
        .trim()
        .parse::<usize>()
        .map_err(|e| AppError::Config(format!("Invalid SUMMARY_CONCURRENCY: {}", e)))?;
    Ok(limit.max(1))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
