use crate::newsletter_delivery::{DeliveryError, MessageDelivery, PhotoMessage, TextMessage};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

/// Bot API formatting mode for the allow-listed rich-text tags.
const RICH_TEXT_PARSE_MODE: &str = "HTML";

#[derive(Debug)]
pub struct TelegramClient {
    http_client: Client,
    base_url: Url,
    bot_token: Secret<String>,
}

#[derive(serde::Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_notification: bool,
    disable_web_page_preview: bool,
}

#[derive(serde::Serialize)]
struct SendPhotoRequest<'a> {
    chat_id: &'a str,
    photo: &'a str,
}

#[derive(Deserialize)]
struct ErrorResponse {
    description: String,
}

impl TelegramClient {
    pub fn new(
        mut base_url: Url,
        bot_token: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        // Method paths are joined relative to the base, keeping any prefix.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http_client,
            base_url,
            bot_token,
        })
    }

    fn method_url(&self, method: &str) -> Result<Url, url::ParseError> {
        self.base_url
            // `./` keeps `bot<id>:` from being read as a URL scheme
            .join(&format!("./bot{}/{method}", self.bot_token.expose_secret()))
    }

    async fn call<B: serde::Serialize>(&self, method: &str, body: &B) -> Result<(), DeliveryError> {
        let url = self.method_url(method)?;

        // The bot token is part of the URL and must not end up in error messages.
        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let description = match response.json::<ErrorResponse>().await {
            Ok(body) => body.description,
            Err(_) => status.to_string(),
        };
        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            description,
        })
    }
}

#[async_trait::async_trait]
impl MessageDelivery for TelegramClient {
    #[tracing::instrument(
        name = "Send text message",
        skip_all,
        fields(chat_id = %message.chat_id, text_len = message.text.chars().count())
    )]
    async fn send_text(&self, message: &TextMessage) -> Result<(), DeliveryError> {
        let request_body = SendMessageRequest {
            chat_id: &message.chat_id,
            text: &message.text,
            parse_mode: RICH_TEXT_PARSE_MODE,
            disable_notification: message.disable_notification,
            disable_web_page_preview: message.disable_link_preview,
        };

        self.call("sendMessage", &request_body).await
    }

    #[tracing::instrument(name = "Send photo", skip_all, fields(chat_id = %message.chat_id))]
    async fn send_photo(&self, message: &PhotoMessage) -> Result<(), DeliveryError> {
        let request_body = SendPhotoRequest {
            chat_id: &message.chat_id,
            photo: &message.photo_url,
        };

        self.call("sendPhoto", &request_body).await
    }
}
