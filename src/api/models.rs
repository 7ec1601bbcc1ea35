use serde::{Deserialize, Serialize};

/// Body of `POST /api/news`. Every field is optional on the wire so that a
/// missing topic is reported as a validation error rather than a parse error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsRequest {
    pub topic: Option<String>,
    pub language: Option<String>,
    pub category: Option<String>,
    pub date_range: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestItem {
    pub title: String,
    pub summary: String,
    pub source: String,
    pub author: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsResponse {
    pub news: Vec<DigestItem>,
    pub topic: String,
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
