use crate::clients::news_client::NewsClient;
use crate::configuration::NewsletterSettings;
use crate::email_client::EmailClient;
use crate::newsletter_dispatcher::{DeliveryResult, DispatchOutcome, run_dispatch};
use crate::utils::{ResponseErrorMessage, error_chain_fmt};
use actix_web::http::StatusCode;
use actix_web::http::header::{ContentType, HeaderMap};
use actix_web::{HttpRequest, HttpResponse, ResponseError, get, web};
use anyhow::Context;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use sqlx::PgPool;
use subtle::ConstantTimeEq;

#[derive(Serialize, Debug)]
pub struct DispatchSummary {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<DeliveryResult>>,
}

impl From<DispatchOutcome> for DispatchSummary {
    fn from(outcome: DispatchOutcome) -> Self {
        match outcome {
            DispatchOutcome::NoSubscribers => Self::message("No subscribers found"),
            DispatchOutcome::NoNews => Self::message("No news found for today"),
            DispatchOutcome::Delivered(report) => {
                let (sent, failed) = (report.sent(), report.failed());
                Self {
                    success: true,
                    message: format!(
                        "Newsletter sent to {} subscribers, {} failed",
                        sent, failed
                    ),
                    sent: Some(sent),
                    failed: Some(failed),
                    results: Some(report.results),
                }
            }
        }
    }
}

impl DispatchSummary {
    fn message(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            sent: None,
            failed: None,
            results: None,
        }
    }
}

#[get("/cron")]
#[tracing::instrument(name = "Triggering newsletter dispatch", skip_all)]
pub async fn get(
    request: HttpRequest,
    pool: web::Data<PgPool>,
    news_client: web::Data<NewsClient>,
    email_client: web::Data<EmailClient>,
    settings: web::Data<NewsletterSettings>,
) -> Result<HttpResponse, DispatchError> {
    let token = bearer_token(request.headers()).map_err(DispatchError::AuthError)?;
    if !matches_secret(&token, &settings.cron_secret) {
        return Err(DispatchError::AuthError(anyhow::anyhow!(
            "Invalid dispatch credentials."
        )));
    }

    let outcome = run_dispatch(&pool, &news_client, &email_client, settings.batch_size).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(DispatchSummary::from(outcome)))
}

fn bearer_token(headers: &HeaderMap) -> Result<Secret<String>, anyhow::Error> {
    let header_value = headers
        .get("Authorization")
        .context("The 'Authorization' header was missing.")?
        .to_str()
        .context("The 'Authorization' header was not a valid UTF8 string.")?;
    let token = header_value
        .strip_prefix("Bearer ")
        .context("The authorization scheme was not 'Bearer'.")?;

    Ok(Secret::new(token.to_string()))
}

// Compared in constant time.
fn matches_secret(token: &Secret<String>, expected: &Secret<String>) -> bool {
    token
        .expose_secret()
        .as_bytes()
        .ct_eq(expected.expose_secret().as_bytes())
        .into()
}

#[derive(thiserror::Error)]
pub enum DispatchError {
    #[error("Unauthorized")]
    AuthError(#[source] anyhow::Error),
    #[error("Newsletter dispatch failed")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Serialize)]
struct FailedDispatch {
    success: bool,
    error: String,
}

impl ResponseError for DispatchError {
    fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::AuthError(_) => StatusCode::UNAUTHORIZED,
            DispatchError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        response.content_type(ContentType::json());
        match self {
            DispatchError::AuthError(_) => response.json(ResponseErrorMessage {
                error: self.to_string(),
            }),
            DispatchError::UnexpectedError(_) => response.json(FailedDispatch {
                success: false,
                error: self.to_string(),
            }),
        }
    }
}
