use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use super::date::parse_date;
use crate::TARGET_NEWS;

/// A record exactly as the ingestion collaborator supplies it: every field a string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawNewsRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub date: String,
}

/// An immutable news item consumed read-only by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub link: String,
    pub source: String,
    pub date: Option<NaiveDate>,
}

impl NewsRecord {
    pub fn new(title: &str, summary: &str, link: &str, source: &str, date: Option<NaiveDate>) -> Self {
        NewsRecord {
            title: title.trim().to_string(),
            summary: summary.trim().to_string(),
            content: None,
            link: link.trim().to_string(),
            source: source.trim().to_string(),
            date,
        }
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    /// Converts a boundary record. Malformed dates and links degrade instead of failing.
    pub fn from_raw(raw: RawNewsRecord) -> Self {
        let date = parse_date(&raw.date);
        if date.is_none() && !raw.date.trim().is_empty() {
            warn!(target: TARGET_NEWS, "Unparseable date '{}' for '{}'", raw.date, raw.title);
        }

        if !raw.link.trim().is_empty() && Url::parse(raw.link.trim()).is_err() {
            warn!(target: TARGET_NEWS, "Link '{}' is not an absolute URL", raw.link);
        }

        let content = raw
            .content
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        NewsRecord {
            content,
            ..NewsRecord::new(&raw.title, &raw.summary, &raw.link, &raw.source, date)
        }
    }

    /// Title and summary (plus content, when present) joined for entity analysis.
    pub fn analysis_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.summary);
        if let Some(content) = &self.content {
            text.push(' ');
            text.push_str(content);
        }
        text
    }

    /// Title and summary joined into the document used for vectorisation.
    pub fn document(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }

    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.summary.is_empty()
    }
}

impl From<RawNewsRecord> for NewsRecord {
    fn from(raw: RawNewsRecord) -> Self {
        NewsRecord::from_raw(raw)
    }
}
