//! Client for the full-text news search provider (NewsAPI `/v2/everything`).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::query::format_date;

/// Results requested from the provider per search.
pub const PAGE_SIZE: u32 = 10;

// "tr" routes to English results. Kept as-is until the intended mapping is confirmed.
static SEARCH_LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([("tr", "en"), ("en", "en"), ("de", "de")])
});

/// Maps a request language to a code the search provider accepts.
pub fn search_language(language: &str) -> &'static str {
    SEARCH_LANGUAGES.get(language).copied().unwrap_or("en")
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArticleSource {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub source: ArticleSource,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl RawArticle {
    /// Description, if present and not blank.
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|description| !description.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub language: &'static str,
    pub from: NaiveDate,
}

#[async_trait]
pub trait NewsSearch: Send + Sync {
    /// Returns articles newest first, in provider order.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawArticle>>;
}

#[derive(Deserialize)]
struct EverythingResponse {
    articles: Vec<RawArticle>,
}

#[derive(Deserialize)]
struct ProviderError {
    code: Option<String>,
    message: Option<String>,
}

pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl NewsSearch for NewsApiClient {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RawArticle>> {
        let url = format!("{}/v2/everything", self.base_url);
        let from = format_date(query.from);
        let page_size = PAGE_SIZE.to_string();

        debug!(q = %query.text, language = query.language, from = %from, "Querying NewsAPI");

        let res = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .query(&[
                ("q", query.text.as_str()),
                ("sortBy", "publishedAt"),
                ("language", query.language),
                ("from", from.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let detail = res
                .json::<ProviderError>()
                .await
                .ok()
                .and_then(|err| match (err.code, err.message) {
                    (_, Some(message)) => Some(message),
                    (Some(code), None) => Some(code),
                    (None, None) => None,
                });
            warn!(%status, ?detail, "NewsAPI returned an error");
            return Err(AppError::Upstream(match detail {
                Some(detail) => format!("NewsAPI error: {}", detail),
                None => format!("NewsAPI error: {}", status),
            }));
        }

        let body: EverythingResponse = res
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Invalid NewsAPI response: {}", e)))?;

        Ok(body.articles)
    }
}
