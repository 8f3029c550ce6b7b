pub mod clients;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod models;
pub mod newsletter_content;
pub mod newsletter_dispatcher;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
