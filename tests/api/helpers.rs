use newsletter_relay::configuration::{Configuration, get_config};
use newsletter_relay::startup::Application;
use newsletter_relay::telemetry;
use serde_json::Value;
use std::sync::OnceLock;
use wiremock::MockServer;

pub const BOT_TOKEN: &str = "424242:integration-test-token";
pub const CHAT_ID: &str = "-1001234567890";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub telegram_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_newsletter_webhook(&self, payload: &Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/webhooks/newsletter", &self.address))
            .json(payload)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_newsletter_preview(&self, payload: &Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/newsletter/preview", &self.address))
            .json(payload)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_status(&self) -> reqwest::Response {
        self.api_client
            .get(format!("{}/api/status", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Bot API methods called on the mock server, in arrival order.
    pub async fn telegram_calls(&self) -> Vec<(String, Value)> {
        self.telegram_server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .map(|request| {
                let method = request
                    .url
                    .path()
                    .rsplit('/')
                    .next()
                    .unwrap()
                    .to_string();
                let body: Value = serde_json::from_slice(&request.body).unwrap();
                (method, body)
            })
            .collect()
    }

    pub fn method_path(method: &str) -> String {
        format!("/bot{BOT_TOKEN}/{method}")
    }
}

// Ensure that the `tracing` stack is only initialised once using `OnceLock`
static TRACING: OnceLock<()> = OnceLock::new();

pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let default_filter_level = "info".to_string();
        let subscriber_name = "test".to_string();

        // If TEST_LOG env variable is set then output the logs to stdout while running tests
        if std::env::var("TEST_LOG").is_ok() {
            let subscriber = telemetry::get_subscriber(
                subscriber_name,
                default_filter_level,
                std::io::stdout,
            );
            telemetry::init_subscriber(subscriber);
        } else {
            let subscriber =
                telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::sink);
            telemetry::init_subscriber(subscriber);
        };
    });
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(customise: impl FnOnce(&mut Configuration)) -> TestApp {
    init_tracing();

    let telegram_server = MockServer::start().await;

    // Randomise configuration to ensure test isolation
    let configuration = {
        let mut c = get_config().expect("Failed to read configuration.");
        // Use a random OS port
        c.application.port = 0;
        // Use the mock server as the Bot API
        c.telegram.base_url = telegram_server.uri();
        c.telegram.bot_token = secrecy::Secret::new(BOT_TOKEN.to_string());
        c.telegram.chat_id = CHAT_ID.to_string();
        c.telegram.timeout_milliseconds = 500;
        customise(&mut c);
        c
    };

    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let application_port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{application_port}"),
        port: application_port,
        telegram_server,
        api_client: reqwest::Client::new(),
    }
}
