use crate::clients::football_client::FootballClient;
use crate::clients::news_client::NewsClient;
use crate::domain::SubscriberEmail;
use crate::email_client::EmailClient;
use crate::newsletter_dispatcher::DEFAULT_BATCH_SIZE;
use secrecy::{ExposeSecret, Secret};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::ConnectOptions;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email_client: EmailClientSettings,
    pub football_api: FootballApiSettings,
    pub news_api: NewsApiSettings,
    pub newsletter: NewsletterSettings,
}

impl Settings {
    /// Reject configurations the service cannot run with, before anything is bound.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        require_secret(&self.football_api.api_key, "football_api.api_key")?;
        require_secret(&self.news_api.api_key, "news_api.api_key")?;
        require_secret(
            &self.email_client.authorization_token,
            "email_client.authorization_token",
        )?;
        require_secret(&self.newsletter.cron_secret, "newsletter.cron_secret")?;
        self.email_client
            .sender()
            .map_err(|e| ConfigurationError::InvalidValue("email_client.sender_email", e))?;
        if self.newsletter.batch_size == 0 {
            return Err(ConfigurationError::InvalidValue(
                "newsletter.batch_size",
                "batch size must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

fn require_secret(value: &Secret<String>, key: &'static str) -> Result<(), ConfigurationError> {
    if value.expose_secret().trim().is_empty() {
        return Err(ConfigurationError::MissingValue(key));
    }

    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("Missing required configuration value `{0}`.")]
    MissingValue(&'static str),
    #[error("Invalid configuration value `{0}`: {1}")]
    InvalidValue(&'static str, String),
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub client_url: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
            .database(&self.database_name)
            .log_statements(tracing_log::log::LevelFilter::Trace)
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub sender_name: String,
    pub authorization_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<SubscriberEmail, String> {
        SubscriberEmail::parse(self.sender_email.clone())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }

    pub fn client(&self) -> Result<EmailClient, anyhow::Error> {
        let sender = self.sender().map_err(anyhow::Error::msg)?;

        EmailClient::new(
            self.base_url.clone(),
            sender,
            self.sender_name.clone(),
            self.authorization_token.clone(),
            self.timeout(),
        )
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct FootballApiSettings {
    pub base_url: String,
    pub api_key: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl FootballApiSettings {
    pub fn client(&self) -> Result<FootballClient, anyhow::Error> {
        FootballClient::new(
            self.base_url.clone(),
            self.api_key.clone(),
            std::time::Duration::from_millis(self.timeout_milliseconds),
        )
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct NewsApiSettings {
    pub base_url: String,
    pub api_key: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl NewsApiSettings {
    pub fn client(&self) -> Result<NewsClient, anyhow::Error> {
        NewsClient::new(
            self.base_url.clone(),
            self.api_key.clone(),
            std::time::Duration::from_millis(self.timeout_milliseconds),
        )
    }
}

#[derive(serde::Deserialize, Clone)]
pub struct NewsletterSettings {
    pub cron_secret: Secret<String>,
    #[serde(
        default = "default_batch_size",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {e}"))
    })?;
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment, defaulting to `local`.
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // E.g. `APP_NEWSLETTER__CRON_SECRET=s3cr3t` sets `Settings.newsletter.cron_secret`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
