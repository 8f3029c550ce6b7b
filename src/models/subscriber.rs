use crate::domain::{NewSubscriber, SubscriberEmail};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[derive(Debug)]
pub struct Subscriber {
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

impl TryFrom<PgRow> for Subscriber {
    type Error = sqlx::Error;

    fn try_from(row: PgRow) -> Result<Self, Self::Error> {
        Ok(Self {
            email: row.try_get("email")?,
            subscribed_at: row.try_get("subscribed_at")?,
        })
    }
}

impl Subscriber {
    #[tracing::instrument(name = "Retrieving all subscribers", skip_all)]
    pub async fn all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query(
            r#"
              SELECT email, subscribed_at
              FROM subscribers
              ORDER BY subscribed_at
            "#,
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(Subscriber::try_from)
        .collect()
    }

    #[tracing::instrument(name = "Checking for an existing subscriber", skip(pool))]
    pub async fn exists(email: &SubscriberEmail, pool: &PgPool) -> Result<bool, sqlx::Error> {
        let row = sqlx::query(
            r#"
              SELECT 1 AS found
              FROM subscribers
              WHERE email = $1
              LIMIT 1
            "#,
        )
        .bind(email.as_ref())
        .fetch_optional(pool)
        .await?;

        Ok(row.is_some())
    }

    /// Parses the stored addresses, logging and skipping any that no longer validate.
    pub fn into_emails(subscribers: Vec<Self>) -> Vec<SubscriberEmail> {
        subscribers
            .into_iter()
            .filter_map(|s| match SubscriberEmail::parse(s.email) {
                Ok(email) => Some(email),
                Err(error) => {
                    tracing::warn!(
                        error.message = %error,
                        "Skipping a subscriber. Their stored email address is invalid."
                    );
                    None
                }
            })
            .collect()
    }
}

impl NewSubscriber {
    #[tracing::instrument(name = "Saving new subscriber in the database", skip_all)]
    pub async fn store(&self, pool: &PgPool) -> Result<(), StoreSubscriberError> {
        sqlx::query(
            r#"
              INSERT INTO subscribers (id, email, subscribed_at)
              VALUES ($1, $2, $3)
            "#,
        )
        .bind(self.id)
        .bind(self.email.as_ref())
        .bind(self.subscribed_at)
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_error) if db_error.is_unique_violation() => {
                StoreSubscriberError::AlreadySubscribed
            }
            e => StoreSubscriberError::UnexpectedError(
                anyhow::Error::new(e).context("Failed to insert new subscriber."),
            ),
        })?;

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StoreSubscriberError {
    #[error("Email already subscribed")]
    AlreadySubscribed,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}
