//! Localized article summaries from the Gemini `generateContent` API.

use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Serialize;

use crate::error::SummarizeError;
use crate::news::RawArticle;

pub const MAX_OUTPUT_TOKENS: u32 = 1000;
pub const TEMPERATURE: f64 = 0.7;

static DISPLAY_LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([("tr", "Turkish"), ("en", "English"), ("de", "German")])
});

/// Human-readable name of the summary language. Unknown codes get English.
pub fn display_language(language: &str) -> &'static str {
    DISPLAY_LANGUAGES.get(language).copied().unwrap_or("English")
}

pub fn build_prompt(article: &RawArticle, language: &str) -> String {
    format!(
        "Summarize this news article in {} in 6-8 sentences:\n\nTitle: {}\nDescription: {}\n\nWrite only the summary.",
        display_language(language),
        article.title.as_deref().unwrap_or_default(),
        article.description_text().unwrap_or("N/A"),
    )
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        article: &RawArticle,
        language: &str,
    ) -> std::result::Result<String, SummarizeError>;
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    pub fn for_article(article: &RawArticle, language: &str) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(article, language),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                temperature: TEMPERATURE,
            },
        }
    }
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Summarizer for GeminiClient {
    async fn summarize(
        &self,
        article: &RawArticle,
        language: &str,
    ) -> std::result::Result<String, SummarizeError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateContentRequest::for_article(article, language);

        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(SummarizeError::Status(res.status()));
        }

        let json: serde_json::Value = res.json().await?;
        extract_text(&json)
    }
}

/// Pulls `candidates[0].content.parts[0].text` out of a generation response.
pub fn extract_text(json: &serde_json::Value) -> std::result::Result<String, SummarizeError> {
    let text = json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| SummarizeError::Malformed("missing candidate text".to_string()))?
        .trim();

    if text.is_empty() {
        return Err(SummarizeError::Malformed("empty candidate text".to_string()));
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn article(description: Option<&str>) -> RawArticle {
        RawArticle {
            title: Some("Headline".into()),
            description: description.map(str::to_string),
            ..RawArticle::default()
        }
    }

    #[test]
    fn display_language_defaults_to_english() {
        assert_eq!(display_language("tr"), "Turkish");
        assert_eq!(display_language("de"), "German");
        assert_eq!(display_language("xx"), "English");
    }

    #[test]
    fn prompt_uses_placeholder_without_description() {
        let prompt = build_prompt(&article(None), "de");
        assert!(prompt.contains("in German in 6-8 sentences"));
        assert!(prompt.contains("Title: Headline"));
        assert!(prompt.contains("Description: N/A"));
        assert!(prompt.ends_with("Write only the summary."));
    }

    #[test]
    fn prompt_includes_description() {
        let prompt = build_prompt(&article(Some("Body text")), "en");
        assert!(prompt.contains("Description: Body text"));
    }

    #[test]
    fn request_body_matches_generate_content_shape() {
        let body = serde_json::to_value(GenerateContentRequest::for_article(&article(None), "tr")).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "parts": [{ "text": build_prompt(&article(None), "tr") }] }],
                "generationConfig": { "maxOutputTokens": 1000, "temperature": 0.7 }
            })
        );
    }

    #[test]
    fn extracts_first_candidate_text() {
        let json = json!({
            "candidates": [{ "content": { "parts": [{ "text": " A summary. \n" }] } }]
        });
        assert_eq!(extract_text(&json).unwrap(), "A summary.");
    }

    #[test]
    fn rejects_missing_or_empty_text() {
        assert!(matches!(
            extract_text(&json!({ "candidates": [] })),
            Err(SummarizeError::Malformed(_))
        ));
        let blank = json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
        });
        assert!(matches!(extract_text(&blank), Err(SummarizeError::Malformed(_))));
    }
}
