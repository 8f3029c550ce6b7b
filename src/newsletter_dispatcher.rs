use crate::clients::news_client::NewsClient;
use crate::domain::SubscriberEmail;
use crate::email_client::EmailClient;
use crate::models::Subscriber;
use crate::newsletter_content::{newsletter_subject, render_newsletter};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use serde::Serialize;
use sqlx::PgPool;

pub const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed { reason: String },
}

#[derive(Serialize, Debug, Clone)]
pub struct DeliveryResult {
    pub email: String,
    #[serde(flatten)]
    pub status: DeliveryStatus,
}

#[derive(Debug)]
pub struct DispatchReport {
    pub batches: usize,
    pub results: Vec<DeliveryResult>,
}

impl DispatchReport {
    pub fn sent(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == DeliveryStatus::Sent)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.sent()
    }
}

#[derive(Debug)]
pub enum DispatchOutcome {
    NoSubscribers,
    NoNews,
    Delivered(DispatchReport),
}

/// Loads every subscriber and runs a dispatch for them.
#[tracing::instrument(name = "Running newsletter dispatch", skip_all)]
pub async fn run_dispatch(
    pool: &PgPool,
    news_client: &NewsClient,
    email_client: &EmailClient,
    batch_size: usize,
) -> Result<DispatchOutcome, anyhow::Error> {
    let subscribers = Subscriber::all(pool)
        .await
        .context("Failed to retrieve subscribers.")?;
    let subscribers = Subscriber::into_emails(subscribers);

    dispatch_newsletter(
        subscribers,
        news_client,
        email_client,
        batch_size,
        Utc::now().date_naive(),
    )
    .await
}

#[tracing::instrument(
    name = "Dispatching newsletter",
    skip_all,
    fields(subscriber_count = subscribers.len(), batch_size = batch_size)
)]
pub async fn dispatch_newsletter(
    subscribers: Vec<SubscriberEmail>,
    news_client: &NewsClient,
    email_client: &EmailClient,
    batch_size: usize,
    today: NaiveDate,
) -> Result<DispatchOutcome, anyhow::Error> {
    if subscribers.is_empty() {
        tracing::info!("No subscribers found");
        return Ok(DispatchOutcome::NoSubscribers);
    }

    let articles = news_client
        .get_football_news(None)
        .await
        .context("Failed to fetch news for the newsletter.")?;
    if articles.is_empty() {
        tracing::info!("No news found for today");
        return Ok(DispatchOutcome::NoNews);
    }

    let subject = newsletter_subject(today);
    let html = render_newsletter(&articles, today);
    let report = deliver_in_batches(&subscribers, email_client, &subject, &html, batch_size).await;
    tracing::info!(
        sent = report.sent(),
        failed = report.failed(),
        batches = report.batches,
        "Newsletter dispatch completed"
    );

    Ok(DispatchOutcome::Delivered(report))
}

// Batches go out one after the other; sends inside a batch run concurrently.
async fn deliver_in_batches(
    subscribers: &[SubscriberEmail],
    email_client: &EmailClient,
    subject: &str,
    html: &str,
    batch_size: usize,
) -> DispatchReport {
    let mut results = Vec::with_capacity(subscribers.len());
    let mut batches = 0;

    for batch in subscribers.chunks(batch_size.max(1)) {
        batches += 1;
        let sends = batch
            .iter()
            .map(|recipient| deliver(recipient, email_client, subject, html));
        results.extend(join_all(sends).await);
    }

    DispatchReport { batches, results }
}

async fn deliver(
    recipient: &SubscriberEmail,
    email_client: &EmailClient,
    subject: &str,
    html: &str,
) -> DeliveryResult {
    let status = match email_client.send_email(recipient, subject, html, None).await {
        Ok(()) => DeliveryStatus::Sent,
        Err(e) => {
            tracing::warn!(
                error.cause_chain = ?e,
                error.message = %e,
                recipient = %recipient,
                "Failed to deliver newsletter to a subscriber."
            );
            DeliveryStatus::Failed {
                reason: e.to_string(),
            }
        }
    };

    DeliveryResult {
        email: recipient.as_ref().to_string(),
        status,
    }
}
