//! The per-request pipeline: search, summarize each article, assemble.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

use crate::api::models::{DigestItem, NewsResponse};
use crate::error::{Result, SummarizeError};
use crate::news::{NewsSearch, RawArticle, SearchQuery, search_language};
use crate::query::DigestQuery;
use crate::summarizer::Summarizer;

/// Upper bound on items in one digest.
pub const MAX_ARTICLES: usize = 5;

const NO_SUMMARY: &str = "No summary";
const UNKNOWN_AUTHOR: &str = "Unknown";

pub struct DigestService {
    news: Arc<dyn NewsSearch>,
    summarizer: Arc<dyn Summarizer>,
    concurrency: usize,
}

impl DigestService {
    pub fn new(
        news: Arc<dyn NewsSearch>,
        summarizer: Arc<dyn Summarizer>,
        concurrency: usize,
    ) -> Self {
        Self {
            news,
            summarizer,
            concurrency: concurrency.max(1),
        }
    }

    #[instrument(skip(self, query), fields(topic = %query.topic, language = %query.language))]
    pub async fn digest(&self, query: DigestQuery) -> Result<NewsResponse> {
        let search = SearchQuery {
            text: query.search_text(),
            language: search_language(&query.language),
            from: query.date_range.from_date(Utc::now()),
        };

        let mut articles = self.news.search(&search).await?;
        articles.truncate(MAX_ARTICLES);
        info!(count = articles.len(), "Search returned articles");

        if articles.is_empty() {
            return Ok(NewsResponse {
                news: Vec::new(),
                topic: query.topic,
                language: query.language,
            });
        }

        let summarizer = &self.summarizer;
        let language = query.language.as_str();

        // `buffered` yields in input order regardless of completion order.
        let news = stream::iter(articles)
            .map(move |article| async move {
                let outcome = summarizer.summarize(&article, language).await;
                assemble_item(article, outcome)
            })
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        Ok(NewsResponse {
            news,
            topic: query.topic,
            language: query.language,
        })
    }
}

/// Summary used when generation fails.
pub fn fallback_summary(article: &RawArticle) -> String {
    article.description_text().unwrap_or(NO_SUMMARY).to_string()
}

/// Builds one digest item, applying the fallback policy to a failed summary.
pub fn assemble_item(
    article: RawArticle,
    outcome: std::result::Result<String, SummarizeError>,
) -> DigestItem {
    let summary = match outcome {
        Ok(summary) => summary,
        Err(err) => {
            warn!(url = %article.url, error = %err, "Summarization failed, using fallback");
            fallback_summary(&article)
        }
    };

    DigestItem {
        title: article.title.unwrap_or_default(),
        summary,
        source: article.source.name.unwrap_or_default(),
        author: article
            .author
            .filter(|author| !author.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        url: article.url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::ArticleSource;

    fn article(description: Option<&str>, author: Option<&str>) -> RawArticle {
        RawArticle {
            title: Some("Title".into()),
            description: description.map(str::to_string),
            author: author.map(str::to_string),
            source: ArticleSource {
                name: Some("Wire".into()),
            },
            url: "https://example.com/story".into(),
            published_at: None,
        }
    }

    #[test]
    fn uses_generated_summary() {
        let item = assemble_item(article(Some("desc"), Some("Ada")), Ok("generated".into()));
        assert_eq!(item.summary, "generated");
        assert_eq!(item.author, "Ada");
        assert_eq!(item.source, "Wire");
        assert_eq!(item.url, "https://example.com/story");
    }

    #[test]
    fn falls_back_to_description() {
        let failure = SummarizeError::Malformed("boom".into());
        let item = assemble_item(article(Some("desc"), None), Err(failure));
        assert_eq!(item.summary, "desc");
        assert_eq!(item.author, "Unknown");
    }

    #[test]
    fn falls_back_to_placeholder() {
        let item = assemble_item(
            article(Some(""), None),
            Err(SummarizeError::Malformed("boom".into())),
        );
        assert_eq!(item.summary, "No summary");

        let item = assemble_item(
            article(None, None),
            Err(SummarizeError::Malformed("boom".into())),
        );
        assert_eq!(item.summary, "No summary");
    }
}
