pub mod api;
pub mod config;
pub mod digest;
pub mod error;
pub mod news;
pub mod query;
pub mod summarizer;

use std::sync::Arc;
use reqwest::{Client, ClientBuilder};
use config::Config;
use digest::DigestService;
use error::{AppError, Result};
use news::NewsApiClient;
use summarizer::GeminiClient;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// `None` when either provider credential is missing.
    pub digest: Option<Arc<DigestService>>,
}

impl AppState {
    pub fn new(digest: Option<DigestService>) -> Self {
        Self {
            digest: digest.map(Arc::new),
        }
    }

    /// Wires the real provider clients from `config`.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = build_http_client(&config)?;

        let digest = match (&config.news_api_key, &config.gemini_api_key) {
            (Some(news_key), Some(gemini_key)) => {
                let news = NewsApiClient::new(
                    client.clone(),
                    config.news_api_base_url.clone(),
                    news_key.clone(),
                );
                let summarizer = GeminiClient::new(
                    client,
                    config.gemini_base_url.clone(),
                    config.gemini_model.clone(),
                    gemini_key.clone(),
                );
                Some(DigestService::new(
                    Arc::new(news),
                    Arc::new(summarizer),
                    config.summary_concurrency,
                ))
            }
            _ => None,
        };

        Ok(Self::new(digest))
    }
}

/// One client shared by both providers so connections are pooled.
fn build_http_client(config: &Config) -> Result<Client> {
    ClientBuilder::new()
        .timeout(config.outbound_timeout)
        .connect_timeout(config.outbound_timeout.min(std::time::Duration::from_secs(5)))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}
