use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news item as served to clients and embedded in the newsletter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    #[serde(rename = "urlToImage")]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source: NewsSource,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NewsSource {
    pub name: String,
}

impl NewsArticle {
    pub fn source_name(&self) -> &str {
        &self.source.name
    }
}
