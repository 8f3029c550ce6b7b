use crate::clients::football_client::FootballClient;
use crate::utils::e500;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use anyhow::Context;
use chrono::{Days, Utc};

const MATCH_WINDOW_DAYS: u64 = 10;

#[get("/matches")]
#[tracing::instrument(name = "Retrieving recent matches", skip_all)]
pub async fn get(
    football_client: web::Data<FootballClient>,
) -> Result<HttpResponse, actix_web::Error> {
    let date_to = Utc::now().date_naive();
    let date_from = date_to
        .checked_sub_days(Days::new(MATCH_WINDOW_DAYS))
        .unwrap_or(date_to);
    let matches = football_client
        .get_matches(date_from, date_to)
        .await
        .context("Failed to fetch matches")
        .map_err(e500)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(matches))
}
