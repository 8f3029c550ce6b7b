use crate::clients::news_client::NewsClient;
use crate::domain::NewsArticle;
use crate::utils::e500;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
pub struct NewsParams {
    category: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct NewsFeed {
    pub articles: Vec<NewsArticle>,
}

#[get("/news")]
#[tracing::instrument(name = "Retrieving football news", skip(news_client))]
pub async fn get(
    params: web::Query<NewsParams>,
    news_client: web::Data<NewsClient>,
) -> Result<HttpResponse, actix_web::Error> {
    let articles = news_client
        .get_football_news(params.category.as_deref())
        .await
        .context("Failed to fetch news")
        .map_err(e500)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(NewsFeed { articles }))
}
