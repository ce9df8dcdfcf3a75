use crate::newsletter_delivery::DeliveryOptions;
use crate::newsletter_pipeline::RelaySettings;
use crate::telegram_client::TelegramClient;
use reqwest::Url;
use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Clone)]
pub struct Configuration {
    pub application: ApplicationConfigs,
    pub telegram: TelegramConfigs,
    pub newsletter: NewsletterConfigs,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationConfigs {
    pub host: String,
    pub port: u16,
    pub max_payload_bytes: usize,
}

#[derive(Deserialize, Clone)]
pub struct TelegramConfigs {
    pub base_url: String,
    pub bot_token: Secret<String>,
    pub chat_id: String,
    pub timeout_milliseconds: u64,
}

impl TelegramConfigs {
    pub fn client(&self) -> Result<TelegramClient, anyhow::Error> {
        let base_url = Url::parse(&self.base_url)?;
        let client = TelegramClient::new(base_url, self.bot_token.clone(), self.timeout())?;
        Ok(client)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Deserialize, Clone)]
pub struct NewsletterConfigs {
    pub message_limit: usize,
    pub disable_notification: bool,
    pub disable_link_preview: bool,
}

impl Configuration {
    pub fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            message_limit: self.newsletter.message_limit,
            delivery: DeliveryOptions {
                chat_id: self.telegram.chat_id.clone(),
                disable_notification: self.newsletter.disable_notification,
                disable_link_preview: self.newsletter.disable_link_preview,
            },
        }
    }
}

pub fn get_config() -> Result<Configuration, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to read current dir: {e}")))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let configs = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // e.g. `APP_TELEGRAM__CHAT_ID=-100123` sets `telegram.chat_id`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    configs.try_deserialize::<Configuration>()
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

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
