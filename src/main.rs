use anyhow::Context;
use footstats_api::configuration::get_configuration;
use footstats_api::startup::Application;
use footstats_api::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = get_subscriber("footstats_api".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let configuration = get_configuration().context("Failed to read configuration.")?;
    if let Err(e) = configuration.validate() {
        tracing::error!(error.message = %e, "Refusing to start with an invalid configuration.");
        return Err(e).context("Invalid configuration.");
    }

    let application = Application::build(configuration).await?;
    tracing::info!(port = application.port(), "Application started");
    application.run_until_stopped().await?;

    Ok(())
}
