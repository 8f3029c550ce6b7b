use crate::clients::football_client::FootballClient;
use crate::domain::ResourceId;
use crate::utils::{e400, e500};
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use anyhow::Context;

#[get("/match/{match_id:[^/]*}")]
#[tracing::instrument(name = "Retrieving match details", skip(football_client))]
pub async fn get(
    path: web::Path<(String,)>,
    football_client: web::Data<FootballClient>,
) -> Result<HttpResponse, actix_web::Error> {
    let match_id = ResourceId::parse(path.into_inner().0)
        .map_err(|_| e400("Match ID is required"))?;
    let match_details = football_client
        .get_match(&match_id)
        .await
        .context("Failed to fetch match details")
        .map_err(e500)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(match_details))
}
