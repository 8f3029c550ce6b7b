use crate::clients::endpoint;
use crate::domain::{NewsArticle, NewsSource};
use anyhow::Context;
use chrono::{DateTime, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

const DEFAULT_QUERY: &str = "european football and soccer";

/// Client for the GNews v4 search API.
#[derive(Clone)]
pub struct NewsClient {
    pub base_url: String,
    api_key: Secret<String>,
    http_client: Client,
}

impl NewsClient {
    pub fn new(
        base_url: String,
        api_key: Secret<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, anyhow::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            http_client,
        })
    }

    #[tracing::instrument(name = "Fetching football news", skip(self))]
    pub async fn get_football_news(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<NewsArticle>, anyhow::Error> {
        let url = endpoint(&self.base_url, &["search"])?;
        let query = search_term(category);

        let response: SearchResponse = self
            .http_client
            .get(url)
            .query(&[
                ("q", query.as_str()),
                ("lang", "en"),
                ("sortby", "publishedAt"),
                ("apikey", self.api_key.expose_secret()),
            ])
            .send()
            .await
            .context("Failed to reach the news service.")?
            .error_for_status()
            .context("The news service rejected the request.")?
            .json()
            .await
            .context("Failed to read the news service response.")?;

        let articles = response
            .articles
            .context("The news service response has no articles.")?;
        tracing::info!("Fetched {} news articles", articles.len());

        Ok(articles.into_iter().map(NewsArticle::from).collect())
    }
}

fn search_term(category: Option<&str>) -> String {
    match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => format!("european football {}", category),
        None => DEFAULT_QUERY.to_string(),
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    articles: Option<Vec<SearchArticle>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArticle {
    title: String,
    description: Option<String>,
    url: String,
    image: Option<String>,
    published_at: DateTime<Utc>,
    source: SearchSource,
}

#[derive(Deserialize)]
struct SearchSource {
    name: String,
}

impl From<SearchArticle> for NewsArticle {
    fn from(article: SearchArticle) -> Self {
        Self {
            title: article.title,
            description: article.description,
            url: article.url,
            image_url: article.image,
            published_at: article.published_at,
            source: NewsSource {
                name: article.source.name,
            },
        }
    }
}
