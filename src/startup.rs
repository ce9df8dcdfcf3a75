use crate::configuration::Configuration;
use crate::newsletter_pipeline::RelaySettings;
use crate::routes::{health_check, newsletter_routes, status, webhook_routes};
use crate::telegram_client::TelegramClient;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: Configuration) -> Result<Self, anyhow::Error> {
        let telegram_client = config
            .telegram
            .client()
            .context("Failed to build the Telegram client")?;
        let relay_settings = config.relay_settings();

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address)
            .with_context(|| "Failed to bind TCP listener for application")?;
        let port = listener
            .local_addr()
            .with_context(|| "Failed to read local address of TCP listener")?
            .port();
        let server = run(
            listener,
            telegram_client,
            relay_settings,
            config.application.max_payload_bytes,
        )
        .context("Failed to run Actix web server")?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        self.server.await.context("Server stopped with an error")
    }
}

fn run(
    tcp_listener: TcpListener,
    telegram_client: TelegramClient,
    relay_settings: RelaySettings,
    max_payload_bytes: usize,
) -> Result<Server, anyhow::Error> {
    let telegram_client = web::Data::new(telegram_client);
    let relay_settings = web::Data::new(relay_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().limit(max_payload_bytes))
            .configure(configure_routes)
            .app_data(telegram_client.clone())
            .app_data(relay_settings.clone())
    })
    .listen(tcp_listener)
    .with_context(|| "Failed to bind Actix server to TCP listener")?
    .run();

    Ok(server)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health_check", web::get().to(health_check))
        .service(
            web::scope("/api")
                .route("/status", web::get().to(status))
                .service(web::scope("/webhooks").configure(webhook_routes))
                .service(web::scope("/newsletter").configure(newsletter_routes)),
        );
}
