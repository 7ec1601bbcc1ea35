//! Request validation and date-range resolution.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::api::models::NewsRequest;
use crate::error::{AppError, Result};

pub const DEFAULT_LANGUAGE: &str = "en";

/// How far back the search reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    OneDay,
    #[default]
    SevenDays,
    ThirtyDays,
}

impl DateRange {
    /// Unrecognised values fall back to seven days instead of failing.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "1d" => DateRange::OneDay,
            "30d" => DateRange::ThirtyDays,
            _ => DateRange::SevenDays,
        }
    }

    pub fn days(self) -> i64 {
        match self {
            DateRange::OneDay => 1,
            DateRange::SevenDays => 7,
            DateRange::ThirtyDays => 30,
        }
    }

    pub fn from_date(self, now: DateTime<Utc>) -> NaiveDate {
        (now - Duration::days(self.days())).date_naive()
    }
}

/// A validated request with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestQuery {
    pub topic: String,
    pub language: String,
    pub category: String,
    pub date_range: DateRange,
}

impl DigestQuery {
    pub fn from_request(req: NewsRequest) -> Result<Self> {
        let topic = match req.topic {
            Some(topic) if !topic.trim().is_empty() => topic,
            _ => return Err(AppError::Validation("Topic required".to_string())),
        };

        Ok(DigestQuery {
            topic,
            language: req.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            category: req.category.unwrap_or_default(),
            date_range: req
                .date_range
                .as_deref()
                .map(DateRange::parse)
                .unwrap_or_default(),
        })
    }

    /// Free text sent to the search provider.
    pub fn search_text(&self) -> String {
        if self.category.is_empty() {
            self.topic.clone()
        } else {
            format!("{} {}", self.topic, self.category)
        }
    }
}

/// Formats the lower bound the way the search provider expects it.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
