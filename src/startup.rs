use crate::clients::football_client::FootballClient;
use crate::clients::news_client::NewsClient;
use crate::configuration::{DatabaseSettings, NewsletterSettings, Settings};
use crate::email_client::EmailClient;
use crate::routes::{health_check, matches, news, newsletter, players, teams};
use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::web::Data;
use actix_web::{App, HttpServer, web};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        configuration.validate()?;

        let connection_pool = get_connection_pool(&configuration.database);
        let email_client = configuration.email_client.client()?;
        let football_client = configuration.football_api.client()?;
        let news_client = configuration.news_api.client()?;
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            connection_pool,
            ApiClients {
                email_client,
                football_client,
                news_client,
            },
            configuration.newsletter,
            configuration.application.client_url,
        )?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(configuration.connect_options())
}

pub struct ApiClients {
    pub email_client: EmailClient,
    pub football_client: FootballClient,
    pub news_client: NewsClient,
}

fn run(
    listener: TcpListener,
    db_pool: PgPool,
    clients: ApiClients,
    newsletter_settings: NewsletterSettings,
    client_url: String,
) -> Result<Server, anyhow::Error> {
    let db_pool = Data::new(db_pool);
    let email_client = Data::new(clients.email_client);
    let football_client = Data::new(clients.football_client);
    let news_client = Data::new(clients.news_client);
    let newsletter_settings = Data::new(newsletter_settings);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(client_url.as_str())
            .allowed_methods(vec!["GET", "POST", "OPTIONS", "HEAD"])
            .allowed_headers(&[
                actix_web::http::header::ACCEPT,
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(TracingLogger::default())
            .service(health_check::get)
            .service(
                web::scope("/api")
                    .service(matches::get)
                    .service(matches::detail::get)
                    .service(players::detail::get)
                    .service(teams::detail::get)
                    .service(news::get)
                    .service(newsletter::subscribe::post)
                    .service(newsletter::dispatch::get),
            )
            .app_data(
                web::JsonConfig::default().error_handler(newsletter::subscribe::json_payload_error),
            )
            .app_data(db_pool.clone())
            .app_data(email_client.clone())
            .app_data(football_client.clone())
            .app_data(news_client.clone())
            .app_data(newsletter_settings.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
