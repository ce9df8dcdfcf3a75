use newsletter_relay::configuration::get_config;
use newsletter_relay::startup::Application;
use newsletter_relay::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber(
        "newsletter-relay".into(),
        "info".into(),
        std::io::stdout,
    );
    init_subscriber(subscriber);

    let config = get_config()?;
    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
