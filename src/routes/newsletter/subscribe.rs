use crate::domain::{NewSubscriber, SubscriberEmail};
use crate::email_client::EmailClient;
use crate::models::{StoreSubscriberError, Subscriber};
use crate::newsletter_content::{WELCOME_SUBJECT, welcome_html, welcome_text};
use crate::utils::{ResponseMessage, error_chain_fmt};
use actix_web::http::StatusCode;
use actix_web::error::JsonPayloadError;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, ResponseError, post, web};
use anyhow::Context;
use serde::Deserialize;
use sqlx::PgPool;

const SUCCESS_MESSAGE: &str = "Successfully subscribed";

#[derive(Deserialize, Debug)]
pub struct SubscribeParams {
    email: Option<String>,
}

#[post("/newsletter")]
#[tracing::instrument(
    name = "Adding a new newsletter subscriber",
    skip_all,
    fields(subscriber_email = params.email.as_deref().unwrap_or_default())
)]
pub async fn post(
    params: web::Json<SubscribeParams>,
    pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
) -> Result<HttpResponse, SignupError> {
    let email = params
        .0
        .email
        .ok_or_else(|| String::from("An email address is required."))
        .and_then(SubscriberEmail::parse)
        .map_err(SignupError::ValidationError)?;

    if Subscriber::exists(&email, &pool)
        .await
        .context("Failed to check for an existing subscriber.")?
    {
        return Err(SignupError::AlreadySubscribed);
    }

    let new_subscriber = NewSubscriber::new(email);
    new_subscriber.store(&pool).await.map_err(|e| match e {
        StoreSubscriberError::AlreadySubscribed => SignupError::AlreadySubscribed,
        StoreSubscriberError::UnexpectedError(e) => SignupError::UnexpectedError(e),
    })?;

    send_welcome_email(&email_client, &new_subscriber)
        .await
        .context("Failed to send a welcome email.")?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(ResponseMessage::from(SUCCESS_MESSAGE)))
}

/// Bodies that cannot be read as `SubscribeParams` get the same answer as a bad address.
pub fn json_payload_error(error: JsonPayloadError, _request: &HttpRequest) -> actix_web::Error {
    SignupError::ValidationError(error.to_string()).into()
}

#[tracing::instrument(name = "Send a welcome email to a new subscriber", skip_all)]
async fn send_welcome_email(
    email_client: &EmailClient,
    new_subscriber: &NewSubscriber,
) -> Result<(), reqwest::Error> {
    email_client
        .send_email(
            &new_subscriber.email,
            WELCOME_SUBJECT,
            &welcome_html(),
            Some(welcome_text()),
        )
        .await
}

#[derive(thiserror::Error)]
pub enum SignupError {
    #[error("Invalid email address")]
    ValidationError(String),
    #[error("Email already subscribed")]
    AlreadySubscribed,
    #[error("Internal server error")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SignupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignupError::ValidationError(reason) => writeln!(f, "{}: {}", self, reason),
            _ => error_chain_fmt(self, f),
        }
    }
}

impl ResponseError for SignupError {
    fn status_code(&self) -> StatusCode {
        match self {
            SignupError::ValidationError(_) | SignupError::AlreadySubscribed => {
                StatusCode::BAD_REQUEST
            }
            SignupError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::json())
            .json(ResponseMessage::from(self.to_string().as_str()))
    }
}
