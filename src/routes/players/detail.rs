use crate::clients::football_client::FootballClient;
use crate::domain::ResourceId;
use crate::utils::{e400, e500};
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use anyhow::Context;

// Players are "persons" upstream.
#[get("/player/{person_id:[^/]*}")]
#[tracing::instrument(name = "Retrieving player details", skip(football_client))]
pub async fn get(
    path: web::Path<(String,)>,
    football_client: web::Data<FootballClient>,
) -> Result<HttpResponse, actix_web::Error> {
    let person_id = ResourceId::parse(path.into_inner().0)
        .map_err(|_| e400("Person ID is required"))?;
    let player = football_client
        .get_person(&person_id)
        .await
        .context("Failed to fetch player data")
        .map_err(e500)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(player))
}
