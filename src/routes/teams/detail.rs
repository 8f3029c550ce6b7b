use crate::clients::football_client::FootballClient;
use crate::domain::ResourceId;
use crate::utils::{e400, e500};
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize, Debug)]
pub struct TeamOverview {
    pub team: Value,
    pub matches: Value,
}

impl TeamOverview {
    // Only the `matches` array of the upstream listing is kept.
    fn new(team: Value, mut recent_matches: Value) -> Self {
        let matches = match recent_matches.get_mut("matches") {
            Some(matches) => matches.take(),
            None => Value::Array(vec![]),
        };

        Self { team, matches }
    }
}

#[get("/team/{team_id:[^/]*}")]
#[tracing::instrument(name = "Retrieving team details", skip(football_client))]
pub async fn get(
    path: web::Path<(String,)>,
    football_client: web::Data<FootballClient>,
) -> Result<HttpResponse, actix_web::Error> {
    let team_id =
        ResourceId::parse(path.into_inner().0).map_err(|_| e400("Team ID is required"))?;
    let (team, recent_matches) = tokio::try_join!(
        football_client.get_team(&team_id),
        football_client.get_recent_team_matches(&team_id),
    )
    .context("Failed to fetch team details")
    .map_err(e500)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(TeamOverview::new(team, recent_matches)))
}
