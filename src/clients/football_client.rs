use crate::clients::endpoint;
use crate::domain::ResourceId;
use anyhow::Context;
use chrono::NaiveDate;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

const AUTH_HEADER: &str = "X-Auth-Token";
const RECENT_MATCHES_LIMIT: &str = "5";

/// Read-only client for the football-data.org v4 API. Bodies are relayed
/// untouched as `serde_json::Value`.
#[derive(Clone)]
pub struct FootballClient {
    pub base_url: String,
    api_key: Secret<String>,
    http_client: Client,
}

impl FootballClient {
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

    #[tracing::instrument(name = "Fetching matches", skip(self))]
    pub async fn get_matches(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Value, anyhow::Error> {
        let date_from = date_from.format("%Y-%m-%d").to_string();
        let date_to = date_to.format("%Y-%m-%d").to_string();

        self.get(
            &["matches"],
            &[("dateFrom", date_from.as_str()), ("dateTo", date_to.as_str())],
        )
        .await
    }

    #[tracing::instrument(name = "Fetching match", skip(self))]
    pub async fn get_match(&self, match_id: &ResourceId) -> Result<Value, anyhow::Error> {
        self.get(&["matches", match_id.as_ref()], &[]).await
    }

    #[tracing::instrument(name = "Fetching person", skip(self))]
    pub async fn get_person(&self, person_id: &ResourceId) -> Result<Value, anyhow::Error> {
        self.get(&["persons", person_id.as_ref()], &[]).await
    }

    #[tracing::instrument(name = "Fetching team", skip(self))]
    pub async fn get_team(&self, team_id: &ResourceId) -> Result<Value, anyhow::Error> {
        self.get(&["teams", team_id.as_ref()], &[]).await
    }

    #[tracing::instrument(name = "Fetching recent team matches", skip(self))]
    pub async fn get_recent_team_matches(
        &self,
        team_id: &ResourceId,
    ) -> Result<Value, anyhow::Error> {
        self.get(
            &["teams", team_id.as_ref(), "matches"],
            &[("limit", RECENT_MATCHES_LIMIT), ("status", "FINISHED")],
        )
        .await
    }

    async fn get(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Value, anyhow::Error> {
        let url = endpoint(&self.base_url, segments)?;

        let body: Value = self
            .http_client
            .get(url)
            .header(AUTH_HEADER, self.api_key.expose_secret())
            .query(query)
            .send()
            .await
            .context("Failed to reach the football data service.")?
            .error_for_status()
            .context("The football data service rejected the request.")?
            .json()
            .await
            .context("Failed to read the football data response.")?;

        Ok(body)
    }
}
